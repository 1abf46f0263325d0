//! Fluid surfaces that push drag forces into the body's nodes.

pub mod face;

pub use face::TriangleFace;

use glam::Vec3;

use crate::core::node::{Node, NodeIndex};

/// Surface element that injects fluid force into the nodes it covers.
///
/// The integrators treat faces as opaque: they only call [`apply_force`](Self::apply_force)
/// once per force phase with the solver's fluid force scale.
pub trait FluidFace: Send + Sync {
    /// Nodes whose forces this face writes.
    fn nodes(&self) -> &[NodeIndex];

    /// Outward unit normal for the current node positions.
    fn normal(&self, nodes: &[Node]) -> Vec3;

    /// Adds this face's fluid force, multiplied by `scale`, into its nodes.
    fn apply_force(&self, nodes: &mut [Node], scale: f32);
}
