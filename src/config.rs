//! Configuration constants and solver selection for the fish simulation.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::dynamics::{explicit::ExplicitSolver, implicit::ImplicitSolver, solver::FishSolver};

/// Default simulation tick (in simulation time units).
pub const DEFAULT_TIME_STEP: f32 = 0.055;

/// Number of substeps the explicit integrator splits each tick into.
pub const DEFAULT_SUBSTEPS: u32 = 10;

/// Lower bound for the fluid force scale.
pub const MIN_FLUID_FORCE_SCALE: f32 = 0.01;

/// Upper bound for the fluid force scale.
pub const MAX_FLUID_FORCE_SCALE: f32 = 1.0;

/// Default global velocity damping used by the explicit integrator.
pub const DEFAULT_DAMPING: f32 = 0.0;

/// Which integrator advances the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverKind {
    /// Sub-stepped semi-implicit Euler with per-node damping.
    Explicit,
    /// One sparse linear solve per tick.
    #[default]
    Implicit,
}

/// Solver parameters. Passed explicitly so tests can vary every knob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub kind: SolverKind,
    pub time_step: f32,
    /// Only used by the explicit integrator; the implicit one always takes one step.
    pub substeps: u32,
    pub fluid_force_scale: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            kind: SolverKind::default(),
            time_step: DEFAULT_TIME_STEP,
            substeps: DEFAULT_SUBSTEPS,
            fluid_force_scale: MAX_FLUID_FORCE_SCALE,
        }
    }
}

impl SolverConfig {
    pub fn explicit() -> Self {
        Self {
            kind: SolverKind::Explicit,
            ..Self::default()
        }
    }

    pub fn implicit() -> Self {
        Self {
            kind: SolverKind::Implicit,
            ..Self::default()
        }
    }

    pub fn with_fluid_force_scale(mut self, scale: f32) -> Self {
        self.fluid_force_scale = scale;
        self
    }

    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    /// Instantiates the configured integrator.
    pub fn build(&self) -> Box<dyn FishSolver> {
        match self.kind {
            SolverKind::Explicit => Box::new(ExplicitSolver::new(
                self.fluid_force_scale,
                self.substeps,
            )),
            SolverKind::Implicit => Box::new(ImplicitSolver::new(self.fluid_force_scale)),
        }
    }
}

/// Clamps a fluid force scale into its supported range.
pub fn clamp_fluid_force_scale(scale: f32) -> f32 {
    if !scale.is_finite() {
        warn!("Non-finite fluid force scale {scale}, using {MAX_FLUID_FORCE_SCALE}");
        return MAX_FLUID_FORCE_SCALE;
    }
    let clamped = scale.clamp(MIN_FLUID_FORCE_SCALE, MAX_FLUID_FORCE_SCALE);
    if clamped != scale {
        warn!("Fluid force scale {scale} out of range, clamped to {clamped}");
    }
    clamped
}
