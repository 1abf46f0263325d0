//! Fish Dynamics – mass-spring soft body integration for simulated fish.
//!
//! A fish body is a graph of point masses joined by damped springs. Muscles change
//! spring target lengths, skin faces push against the water, and one of two
//! interchangeable integrators advances the body every tick: a sub-stepped explicit
//! scheme or an implicit scheme that solves a sparse symmetric system built from the
//! spring network.

pub mod body;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod fluid;
pub mod school;
pub mod simulation;
pub mod utils;

pub use glam::Vec3;

pub use body::FishBody;
pub use config::{SolverConfig, SolverKind, DEFAULT_SUBSTEPS, DEFAULT_TIME_STEP};
pub use core::{
    graph::{GraphData, MassSpringGraph},
    node::{Node, NodeIndex},
    spring::Spring,
};
pub use dynamics::{
    explicit::ExplicitSolver,
    implicit::ImplicitSolver,
    solver::FishSolver,
    sparse::{LdltFactorization, SymmetricSparseMatrix},
};
pub use error::SimulationError;
pub use fluid::{FluidFace, TriangleFace};
pub use school::School;
pub use simulation::FishSimulation;
