use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Dense node identifier. Doubles as the node's row in the implicit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

impl NodeIndex {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Point mass of the fish body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub index: NodeIndex,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Accumulated force for the current phase sequence. Reset by every `pre_solve`.
    #[serde(skip)]
    pub force: Vec3,
    pub mass: f32,
}

impl Node {
    pub fn new(index: NodeIndex, position: Vec3, mass: f32) -> Self {
        Self {
            index,
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}
