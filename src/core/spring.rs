use serde::{Deserialize, Serialize};

use super::node::NodeIndex;

/// Shortest a muscle may pull a spring, as a fraction of its rest length.
pub const MAX_CONTRACTION: f32 = 0.9;

/// Furthest a muscle may extend a spring, as a fraction of its rest length.
pub const MAX_EXTENSION: f32 = 0.5;

/// Damped spring between two nodes, oriented `left -> right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub left: NodeIndex,
    pub right: NodeIndex,
    /// Authored length.
    pub rest_length: f32,
    /// Length the force law pulls toward. Muscles move this between ticks.
    pub current_length: f32,
    /// Stiffness `c`.
    pub stiffness: f32,
    /// Damping `k`.
    pub damping: f32,
}

impl Spring {
    pub fn new(
        left: NodeIndex,
        right: NodeIndex,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            left,
            right,
            rest_length,
            current_length: rest_length,
            stiffness,
            damping,
        }
    }

    /// Contracts (positive) or extends (negative) the spring relative to its rest length.
    pub fn actuate(&mut self, contraction: f32) {
        let contraction = contraction.clamp(-MAX_EXTENSION, MAX_CONTRACTION);
        self.current_length = self.rest_length * (1.0 - contraction);
    }

    pub fn relax(&mut self) {
        self.current_length = self.rest_length;
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.stiffness.is_finite()
            && self.stiffness > 0.0
            && self.damping.is_finite()
            && self.damping >= 0.0
            && self.rest_length.is_finite()
            && self.rest_length >= 0.0
            && self.current_length.is_finite()
            && self.current_length >= 0.0
    }
}
