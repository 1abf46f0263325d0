use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::FluidFace;
use crate::{
    core::node::{Node, NodeIndex},
    utils::math::{normal, projection_on_vector},
};

/// Triangular patch of skin resisting motion along its normal.
///
/// The force follows `f = -drag · area · |v| · max(0, n·v̂) · n`, where `v` is the mean
/// node velocity relative to the surrounding water. Only the side moving into the water
/// is resisted, which is what lets a tail stroke produce thrust.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleFace {
    pub nodes: [NodeIndex; 3],
    pub drag_coefficient: f32,
    /// Velocity of the surrounding water.
    pub fluid_velocity: Vec3,
}

impl TriangleFace {
    pub fn new(nodes: [NodeIndex; 3], drag_coefficient: f32) -> Self {
        Self {
            nodes,
            drag_coefficient,
            fluid_velocity: Vec3::ZERO,
        }
    }

    pub fn with_fluid_velocity(mut self, fluid_velocity: Vec3) -> Self {
        self.fluid_velocity = fluid_velocity;
        self
    }

    fn corners(&self, nodes: &[Node]) -> Option<[Node; 3]> {
        let a = *nodes.get(self.nodes[0].index())?;
        let b = *nodes.get(self.nodes[1].index())?;
        let c = *nodes.get(self.nodes[2].index())?;
        Some([a, b, c])
    }

    pub fn area(&self, nodes: &[Node]) -> f32 {
        self.corners(nodes)
            .map(|[a, b, c]| 0.5 * (b.position - a.position).cross(c.position - a.position).length())
            .unwrap_or(0.0)
    }

    /// Drag force before it is split over the three nodes.
    pub fn drag_force(&self, nodes: &[Node]) -> Vec3 {
        let Some([a, b, c]) = self.corners(nodes) else {
            return Vec3::ZERO;
        };
        let n = normal(b.position - a.position, c.position - a.position);
        if n == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let velocity = (a.velocity + b.velocity + c.velocity) / 3.0 - self.fluid_velocity;
        let speed = velocity.length();
        if speed < 1e-6 {
            return Vec3::ZERO;
        }

        let along_normal = projection_on_vector(velocity, n) / speed;
        let magnitude = self.drag_coefficient * self.area(nodes) * speed * along_normal.max(0.0);
        -magnitude * n
    }
}

impl FluidFace for TriangleFace {
    fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    fn normal(&self, nodes: &[Node]) -> Vec3 {
        self.corners(nodes)
            .map(|[a, b, c]| normal(b.position - a.position, c.position - a.position))
            .unwrap_or(Vec3::ZERO)
    }

    fn apply_force(&self, nodes: &mut [Node], scale: f32) {
        let share = self.drag_force(nodes) * scale / 3.0;
        if share == Vec3::ZERO {
            return;
        }
        for index in self.nodes {
            if let Some(node) = nodes.get_mut(index.index()) {
                node.apply_force(share);
            }
        }
    }
}
