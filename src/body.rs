use crate::{
    config::DEFAULT_DAMPING,
    core::graph::MassSpringGraph,
    error::SimulationError,
    fluid::FluidFace,
};

/// Everything a solver needs to advance one fish: its spring graph, the skin faces
/// that push against the water, and a global velocity damping coefficient.
pub struct FishBody {
    graph: MassSpringGraph,
    faces: Vec<Box<dyn FluidFace>>,
    damping: f32,
}

impl Default for FishBody {
    fn default() -> Self {
        Self::new(MassSpringGraph::new())
    }
}

impl std::fmt::Debug for FishBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FishBody")
            .field("nodes", &self.graph.node_count())
            .field("springs", &self.graph.spring_count())
            .field("faces", &self.faces.len())
            .field("damping", &self.damping)
            .finish()
    }
}

impl FishBody {
    pub fn new(graph: MassSpringGraph) -> Self {
        Self {
            graph,
            faces: Vec::new(),
            damping: DEFAULT_DAMPING,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.set_damping(damping);
        self
    }

    /// Registers a fluid face. Faces referencing unknown nodes are rejected.
    pub fn add_face<F: FluidFace + 'static>(&mut self, face: F) -> Result<(), SimulationError> {
        if let Some(&index) = face
            .nodes()
            .iter()
            .find(|index| index.index() >= self.graph.node_count())
        {
            return Err(SimulationError::UnknownNode { index });
        }
        self.faces.push(Box::new(face));
        Ok(())
    }

    pub fn graph(&self) -> &MassSpringGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut MassSpringGraph {
        &mut self.graph
    }

    pub fn faces(&self) -> &[Box<dyn FluidFace>] {
        &self.faces
    }

    pub(crate) fn graph_and_faces_mut(&mut self) -> (&mut MassSpringGraph, &[Box<dyn FluidFace>]) {
        (&mut self.graph, &self.faces)
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Negative or non-finite values fall back to no damping.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = if damping.is_finite() && damping >= 0.0 {
            damping
        } else {
            log::warn!("Invalid body damping {damping}, using 0");
            0.0
        };
    }

    /// Contracts (positive) or extends (negative) a spring's target length.
    pub fn actuate(&mut self, spring: usize, contraction: f32) -> Result<(), SimulationError> {
        self.graph
            .spring_mut(spring)
            .ok_or(SimulationError::UnknownSpring { id: spring })?
            .actuate(contraction);
        Ok(())
    }

    /// Returns every spring to its authored length.
    pub fn relax_all(&mut self) {
        for id in 0..self.graph.spring_count() {
            if let Some(spring) = self.graph.spring_mut(id) {
                spring.relax();
            }
        }
    }

    /// Returns the first node whose position or velocity is not finite.
    pub fn ensure_finite(&self) -> Result<(), SimulationError> {
        match self.graph.nodes().iter().find(|node| !node.is_finite()) {
            Some(node) => Err(SimulationError::NonFinite { node: node.index }),
            None => Ok(()),
        }
    }
}
