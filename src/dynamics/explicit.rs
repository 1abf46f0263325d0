use log::debug;

use super::{
    forces::{accumulate_spring_forces, apply_fluid_forces},
    solver::FishSolver,
};
use crate::{
    body::FishBody,
    config::{clamp_fluid_force_scale, DEFAULT_SUBSTEPS},
    error::SimulationError,
};

/// Sub-stepped semi-implicit Euler with a velocity damping term between the two
/// velocity updates.
#[derive(Debug, Clone)]
pub struct ExplicitSolver {
    fluid_force_scale: f32,
    substeps: u32,
}

impl Default for ExplicitSolver {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_SUBSTEPS)
    }
}

impl ExplicitSolver {
    pub fn new(fluid_force_scale: f32, substeps: u32) -> Self {
        let solver = Self {
            fluid_force_scale: clamp_fluid_force_scale(fluid_force_scale),
            substeps: substeps.max(1),
        };
        debug!(
            "explicit solver: {} substeps, fluid scale {}",
            solver.substeps, solver.fluid_force_scale
        );
        solver
    }
}

impl FishSolver for ExplicitSolver {
    fn name(&self) -> &str {
        "explicit"
    }

    fn substeps(&self) -> u32 {
        self.substeps
    }

    fn fluid_force_scale(&self) -> f32 {
        self.fluid_force_scale
    }

    fn apply_forces(&self, body: &mut FishBody) -> Result<(), SimulationError> {
        accumulate_spring_forces(body.graph_mut())?;
        apply_fluid_forces(body, self.fluid_force_scale);
        Ok(())
    }

    fn integrate(&self, body: &mut FishBody, dt: f32) -> Result<(), SimulationError> {
        let damping = body.damping();
        for node in body.graph_mut().nodes_mut() {
            // Damping is taken from the velocity predicted by the undamped force.
            let new_velocity = node.velocity + (node.force / node.mass) * dt;
            node.force += -damping * new_velocity;

            node.velocity += (node.force / node.mass) * dt;
            node.position += node.velocity * dt;
        }
        body.ensure_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{graph::MassSpringGraph, spring::Spring};
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn single_node(force: Vec3, velocity: Vec3, damping: f32) -> FishBody {
        let mut graph = MassSpringGraph::new();
        let index = graph.add_node(Vec3::ZERO, 2.0).unwrap();
        let node = graph.node_mut(index).unwrap();
        node.force = force;
        node.velocity = velocity;
        FishBody::new(graph).with_damping(damping)
    }

    #[test]
    fn integrate_applies_damping_between_velocity_updates() {
        let mut body = single_node(Vec3::X * 4.0, Vec3::X, 1.0);
        ExplicitSolver::default().integrate(&mut body, 0.5).unwrap();

        // new_velocity = 1 + 2 * 0.5 = 2; force = 4 - 2 = 2; velocity = 1 + 1 * 0.5.
        let node = body.graph().nodes()[0];
        assert_relative_eq!(node.force.x, 2.0);
        assert_relative_eq!(node.velocity.x, 1.5);
        assert_relative_eq!(node.position.x, 0.75);
    }

    #[test]
    fn pre_solve_clears_forces() {
        let mut body = single_node(Vec3::new(3.0, -1.0, 8.0), Vec3::ZERO, 0.0);
        let solver = ExplicitSolver::default();
        solver.pre_solve(&mut body);
        solver.pre_solve(&mut body);
        assert_eq!(body.graph().nodes()[0].force, Vec3::ZERO);
    }

    #[test]
    fn step_runs_every_substep() {
        let mut graph = MassSpringGraph::new();
        let a = graph.add_node(Vec3::ZERO, 1.0).unwrap();
        let b = graph.add_node(Vec3::X * 1.5, 1.0).unwrap();
        graph.add_spring(Spring::new(a, b, 1.0, 100.0, 0.0)).unwrap();
        let mut once = FishBody::new(graph.clone());
        let mut many = FishBody::new(graph);

        ExplicitSolver::new(1.0, 1).step(&mut once, 0.055).unwrap();
        ExplicitSolver::new(1.0, 10).step(&mut many, 0.055).unwrap();

        let once_x = once.graph().nodes()[0].position.x;
        let many_x = many.graph().nodes()[0].position.x;
        assert!(once_x > 0.0 && many_x > 0.0);
        assert!((once_x - many_x).abs() > 1e-4);
    }

    #[test]
    fn rejects_bad_time_step() {
        let mut body = single_node(Vec3::ZERO, Vec3::ZERO, 0.0);
        assert_eq!(
            ExplicitSolver::default().step(&mut body, 0.0),
            Err(SimulationError::InvalidTimeStep { dt: 0.0 })
        );
    }
}
