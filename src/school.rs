#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{error::SimulationError, simulation::FishSimulation};

/// Independent fish stepped together.
///
/// Bodies never share nodes, so with the `parallel` feature each one can be stepped on
/// its own rayon worker. A single body's solve always stays on one thread.
#[derive(Debug, Default)]
pub struct School {
    members: Vec<FishSimulation>,
    parallel: bool,
}

impl School {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fish: FishSimulation) -> usize {
        self.members.push(fish);
        self.members.len() - 1
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FishSimulation> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FishSimulation> {
        self.members.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FishSimulation> {
        self.members.iter()
    }

    /// Has no effect unless the crate is built with the `parallel` feature.
    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    /// Steps every member by `dt`. Every member is stepped even if one fails; the first
    /// failure by member order is returned with its index.
    pub fn step_all(&mut self, dt: f32) -> Result<(), (usize, SimulationError)> {
        let results: Vec<Result<(), SimulationError>> = if self.parallel() {
            self.step_parallel(dt)
        } else {
            self.members.iter_mut().map(|fish| fish.step(dt)).collect()
        };

        match results.into_iter().enumerate().find_map(|(i, r)| r.err().map(|e| (i, e))) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    #[cfg(feature = "parallel")]
    fn step_parallel(&mut self, dt: f32) -> Vec<Result<(), SimulationError>> {
        self.members.par_iter_mut().map(|fish| fish.step(dt)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn step_parallel(&mut self, dt: f32) -> Vec<Result<(), SimulationError>> {
        self.members.iter_mut().map(|fish| fish.step(dt)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{body::FishBody, config::SolverConfig, core::graph::MassSpringGraph};
    use glam::Vec3;

    fn fish(offset: f32, stretch: f32) -> FishSimulation {
        let mut graph = MassSpringGraph::new();
        let a = graph.add_node(Vec3::Y * offset, 1.0).unwrap();
        let b = graph.add_node(Vec3::Y * offset + Vec3::X, 1.0).unwrap();
        graph.connect(a, b, 40.0, 2.0).unwrap();
        graph.nodes_mut()[1].position.x = stretch;
        FishSimulation::new(FishBody::new(graph), SolverConfig::implicit())
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let mut sequential = School::new();
        let mut parallel = School::new();
        for i in 0..4 {
            sequential.add(fish(i as f32, 1.1 + 0.1 * i as f32));
            parallel.add(fish(i as f32, 1.1 + 0.1 * i as f32));
        }
        parallel.set_parallel(true);

        for _ in 0..20 {
            sequential.step_all(0.055).unwrap();
            parallel.step_all(0.055).unwrap();
        }

        for (a, b) in sequential.iter().zip(parallel.iter()) {
            assert_eq!(a.ticks(), 20);
            assert_eq!(
                a.body().graph().nodes()[1].position,
                b.body().graph().nodes()[1].position
            );
        }
    }

    #[test]
    fn reports_failing_member() {
        let mut school = School::new();
        school.add(fish(0.0, 1.2));
        let broken = school.add(fish(1.0, 1.2));
        if let Some(member) = school.get_mut(broken) {
            member.body_mut().graph_mut().nodes_mut()[1].position = Vec3::Y;
        }

        let err = school.step_all(0.055).unwrap_err();
        assert_eq!(err.0, broken);
        assert_eq!(school.get(0).map(FishSimulation::ticks), Some(1));
    }
}
