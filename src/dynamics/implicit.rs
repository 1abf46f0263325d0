use glam::Vec3;
use log::debug;

use super::{
    forces::{apply_fluid_forces, force_scalar},
    solver::FishSolver,
    sparse::SymmetricSparseMatrix,
};
use crate::{
    body::FishBody, config::clamp_fluid_force_scale, core::graph::MassSpringGraph,
    error::SimulationError, utils::logging::PhaseTimer,
};

/// Linear system `A·v' = G` for one implicit tick.
#[derive(Debug, Clone)]
pub struct ImplicitSystem {
    pub matrix: SymmetricSparseMatrix,
    pub rhs: Vec<Vec3>,
}

/// Builds the system from springs, masses and the forces already accumulated.
///
/// Each spring contributes its force scalar `n_ij` as a scalar stiffness along the
/// connecting vector, so the three axes share one coefficient matrix.
pub fn assemble_system(graph: &MassSpringGraph, dt: f32) -> Result<ImplicitSystem, SimulationError> {
    let dim = graph.node_count();
    let (rows, cols) = graph.adjacency_dimensions();
    if rows != dim || cols != dim {
        return Err(SimulationError::DimensionMismatch {
            expected: dim,
            found: if rows != dim { rows } else { cols },
        });
    }

    let mut matrix = SymmetricSparseMatrix::new(dim);
    let mut rhs = vec![Vec3::ZERO; dim];

    for spring in graph.springs() {
        let left = graph.node(spring.left)?;
        let right = graph.node(spring.right)?;
        let (i, j) = (left.index.index(), right.index.index());

        let n_ij = force_scalar(left, right, spring)?;
        let r_ij = right.position - left.position;

        matrix.add_diagonal(i, n_ij * dt)?;
        matrix.add_diagonal(j, n_ij * dt)?;
        matrix.add_symmetric(i, j, -n_ij * dt)?;

        rhs[i] += n_ij * r_ij;
        rhs[j] -= n_ij * r_ij;
    }

    for node in graph.nodes() {
        let i = node.index.index();
        let inertia = node.mass / dt;
        matrix.add_diagonal(i, inertia)?;
        rhs[i] += node.force + inertia * node.velocity;
    }

    Ok(ImplicitSystem { matrix, rhs })
}

/// Integrator solving one sparse symmetric system per tick for the new velocities.
///
/// Springs are handled implicitly, fluid forces explicitly through the right-hand side.
#[derive(Debug, Clone)]
pub struct ImplicitSolver {
    fluid_force_scale: f32,
}

impl Default for ImplicitSolver {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ImplicitSolver {
    pub fn new(fluid_force_scale: f32) -> Self {
        let solver = Self {
            fluid_force_scale: clamp_fluid_force_scale(fluid_force_scale),
        };
        debug!("implicit solver: fluid scale {}", solver.fluid_force_scale);
        solver
    }

    /// Velocities the next tick would produce, without touching the body.
    pub fn solve_velocities(&self, body: &FishBody, dt: f32) -> Result<Vec<Vec3>, SimulationError> {
        let system = {
            let _timer = PhaseTimer::new("implicit::assemble", body.graph());
            assemble_system(body.graph(), dt)?
        };
        log::trace!(
            "implicit system: {} rows, {} off-diagonal pairs",
            system.matrix.dim(),
            system.matrix.off_diagonal_count()
        );
        let _timer = PhaseTimer::new("implicit::solve", body.graph());
        let factor = system.matrix.factorize()?;
        factor.solve(&system.rhs)
    }
}

impl FishSolver for ImplicitSolver {
    fn name(&self) -> &str {
        "implicit"
    }

    fn substeps(&self) -> u32 {
        1
    }

    fn fluid_force_scale(&self) -> f32 {
        self.fluid_force_scale
    }

    fn apply_forces(&self, body: &mut FishBody) -> Result<(), SimulationError> {
        apply_fluid_forces(body, self.fluid_force_scale);
        Ok(())
    }

    fn integrate(&self, body: &mut FishBody, dt: f32) -> Result<(), SimulationError> {
        let velocities = self.solve_velocities(body, dt)?;
        for node in body.graph_mut().nodes_mut() {
            node.velocity = velocities[node.index.index()];
            node.position += node.velocity * dt;
        }
        body.ensure_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spring::Spring;
    use approx::assert_relative_eq;

    fn stretched_pair() -> MassSpringGraph {
        let mut graph = MassSpringGraph::new();
        let a = graph.add_node(Vec3::ZERO, 1.0).unwrap();
        let b = graph.add_node(Vec3::X * 2.0, 2.0).unwrap();
        graph.add_spring(Spring::new(a, b, 1.0, 10.0, 0.0)).unwrap();
        graph
    }

    #[test]
    fn assembly_matches_hand_computation() {
        let dt = 0.1;
        let system = assemble_system(&stretched_pair(), dt).unwrap();
        // n = c * stretch / length = 10 * 1 / 2 = 5.
        let n = 5.0;
        assert_relative_eq!(system.matrix.get(0, 0), n * dt + 1.0 / dt);
        assert_relative_eq!(system.matrix.get(1, 1), n * dt + 2.0 / dt);
        assert_relative_eq!(system.matrix.get(0, 1), -n * dt);
        assert_relative_eq!(system.matrix.get(1, 0), -n * dt);
        assert_relative_eq!(system.rhs[0].x, 10.0);
        assert_relative_eq!(system.rhs[1].x, -10.0);
    }

    #[test]
    fn external_force_enters_the_rhs() {
        let mut graph = stretched_pair();
        graph.nodes_mut()[1].force = Vec3::Y * 3.0;
        graph.nodes_mut()[1].velocity = Vec3::Y;
        let system = assemble_system(&graph, 0.5).unwrap();
        assert_relative_eq!(system.rhs[1].y, 3.0 + 4.0);
    }

    #[test]
    fn solved_velocities_satisfy_the_system() {
        let body = FishBody::new(stretched_pair());
        let dt = 0.055;
        let velocities = ImplicitSolver::default().solve_velocities(&body, dt).unwrap();
        let system = assemble_system(body.graph(), dt).unwrap();
        let residual = system.matrix.mul_vec(&velocities).unwrap();
        for (lhs, rhs) in residual.iter().zip(&system.rhs) {
            assert!((*lhs - *rhs).length() < 1e-3);
        }
        // Momentum is preserved by the spring terms.
        let momentum = velocities[0] * 1.0 + velocities[1] * 2.0;
        assert!(momentum.length() < 1e-5);
    }

    #[test]
    fn failed_solve_leaves_body_untouched() {
        let mut graph = MassSpringGraph::new();
        let a = graph.add_node(Vec3::ONE, 1.0).unwrap();
        let b = graph.add_node(Vec3::X, 1.0).unwrap();
        graph.add_spring(Spring::new(a, b, 1.0, 10.0, 0.0)).unwrap();
        graph.nodes_mut()[1].position = Vec3::ONE;
        let mut body = FishBody::new(graph);

        let result = ImplicitSolver::default().integrate(&mut body, 0.055);
        assert_eq!(result, Err(SimulationError::DegenerateSpring { a, b }));
        assert_eq!(body.graph().nodes()[0].position, Vec3::ONE);
        assert_eq!(body.graph().nodes()[0].velocity, Vec3::ZERO);
    }
}
