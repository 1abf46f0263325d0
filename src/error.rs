//! Error type shared by graph construction and the integrators.

use thiserror::Error;

use crate::core::node::NodeIndex;

/// Errors raised while assembling a fish body or advancing it in time.
///
/// Topology and geometry errors are not recoverable mid-tick: a `step` that returns
/// an error leaves the body in an unspecified state that the caller must reset.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum SimulationError {
    /// A spring was requested between two nodes that are not connected.
    #[error("no spring between nodes {a} and {b}")]
    MissingSpring { a: NodeIndex, b: NodeIndex },
    #[error("node {index} is not part of the graph")]
    UnknownNode { index: NodeIndex },
    #[error("spring {id} is not part of the graph")]
    UnknownSpring { id: usize },
    /// The unordered pair already carries a spring.
    #[error("nodes {a} and {b} are already connected")]
    DuplicateSpring { a: NodeIndex, b: NodeIndex },
    /// Spring endpoints coincide, so the spring has no direction.
    #[error("spring between nodes {a} and {b} has zero length")]
    DegenerateSpring { a: NodeIndex, b: NodeIndex },
    /// Node mass must be finite and strictly positive.
    #[error("invalid node mass {mass}")]
    InvalidMass { mass: f32 },
    /// Spring stiffness must be positive, damping and lengths non-negative.
    #[error("invalid coefficients for spring {a}-{b}")]
    InvalidSpring { a: NodeIndex, b: NodeIndex },
    #[error("node {index} has a non-finite position")]
    InvalidPosition { index: NodeIndex },
    /// Linear system size does not match the node count.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// A zero or non-finite pivot appeared during factorization.
    #[error("singular pivot at row {row}")]
    SingularPivot { row: usize },
    #[error("node {node} state became NaN or infinite")]
    NonFinite { node: NodeIndex },
    #[error("invalid time step {dt}")]
    InvalidTimeStep { dt: f32 },
}
