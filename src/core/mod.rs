//! Core types describing the mass-spring body: nodes, springs and their graph.

pub mod node;
pub mod spring;
pub mod graph;

pub use node::{Node, NodeIndex};
pub use spring::Spring;
pub use graph::{GraphData, MassSpringGraph};
