//! Integration: spring forces, the sparse solver, and the two integrators.

pub mod explicit;
pub mod forces;
pub mod implicit;
pub mod solver;
pub mod sparse;

pub use explicit::ExplicitSolver;
pub use forces::{accumulate_spring_forces, force_scalar, spring_force};
pub use implicit::{assemble_system, ImplicitSolver, ImplicitSystem};
pub use solver::FishSolver;
pub use sparse::{LdltFactorization, SymmetricSparseMatrix};
