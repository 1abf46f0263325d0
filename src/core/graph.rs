use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{
    node::{Node, NodeIndex},
    spring::Spring,
};
use crate::error::SimulationError;

/// Serialized form of a [`MassSpringGraph`]: the arenas without derived lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub springs: Vec<Spring>,
}

/// Node arena plus the springs connecting them.
///
/// Nodes are addressed by dense [`NodeIndex`] in insertion order. Springs store index
/// pairs; the neighbor lists and the pair lookup are derived views rebuilt whenever a
/// spring is added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct MassSpringGraph {
    nodes: Vec<Node>,
    springs: Vec<Spring>,
    neighbors: Vec<Vec<NodeIndex>>,
    pairs: HashMap<(NodeIndex, NodeIndex), usize>,
}

fn pair_key(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MassSpringGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, springs: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            springs: Vec::with_capacity(springs),
            neighbors: Vec::with_capacity(nodes),
            pairs: HashMap::with_capacity(springs),
        }
    }

    pub fn add_node(&mut self, position: Vec3, mass: f32) -> Result<NodeIndex, SimulationError> {
        let index = NodeIndex(self.nodes.len());
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimulationError::InvalidMass { mass });
        }
        if !position.is_finite() {
            return Err(SimulationError::InvalidPosition { index });
        }
        self.nodes.push(Node::new(index, position, mass));
        self.neighbors.push(Vec::new());
        Ok(index)
    }

    /// Adds a spring and returns its position in [`springs`](Self::springs).
    pub fn add_spring(&mut self, spring: Spring) -> Result<usize, SimulationError> {
        let (a, b) = (spring.left, spring.right);
        for index in [a, b] {
            if index.index() >= self.nodes.len() {
                return Err(SimulationError::UnknownNode { index });
            }
        }
        if a == b {
            return Err(SimulationError::DegenerateSpring { a, b });
        }
        if !spring.is_valid() {
            return Err(SimulationError::InvalidSpring { a, b });
        }
        let key = pair_key(a, b);
        if self.pairs.contains_key(&key) {
            return Err(SimulationError::DuplicateSpring { a, b });
        }

        let id = self.springs.len();
        self.springs.push(spring);
        self.pairs.insert(key, id);
        self.neighbors[a.index()].push(b);
        self.neighbors[b.index()].push(a);
        Ok(id)
    }

    /// Connects two nodes with a spring whose rest length is their current distance.
    pub fn connect(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        stiffness: f32,
        damping: f32,
    ) -> Result<usize, SimulationError> {
        let rest_length = self.node(a)?.position.distance(self.node(b)?.position);
        self.add_spring(Spring::new(a, b, rest_length, stiffness, damping))
    }

    pub fn node(&self, index: NodeIndex) -> Result<&Node, SimulationError> {
        self.nodes
            .get(index.index())
            .ok_or(SimulationError::UnknownNode { index })
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Result<&mut Node, SimulationError> {
        self.nodes
            .get_mut(index.index())
            .ok_or(SimulationError::UnknownNode { index })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn spring(&self, id: usize) -> Option<&Spring> {
        self.springs.get(id)
    }

    /// Mutable spring access. Only the lengths and coefficients should change here;
    /// endpoints are part of the topology.
    pub fn spring_mut(&mut self, id: usize) -> Option<&mut Spring> {
        self.springs.get_mut(id)
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Nodes sharing a spring with `index`. Empty for unknown nodes.
    pub fn neighbors(&self, index: NodeIndex) -> &[NodeIndex] {
        self.neighbors
            .get(index.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The spring joining `a` and `b`, in either orientation.
    pub fn edge(&self, a: NodeIndex, b: NodeIndex) -> Result<&Spring, SimulationError> {
        self.pairs
            .get(&pair_key(a, b))
            .and_then(|&id| self.springs.get(id))
            .ok_or(SimulationError::MissingSpring { a, b })
    }

    /// Size of the implicit system matrix.
    pub fn adjacency_dimensions(&self) -> (usize, usize) {
        (self.neighbors.len(), self.neighbors.len())
    }

    pub fn reset_forces(&mut self) {
        for node in &mut self.nodes {
            node.force = Vec3::ZERO;
        }
    }

    pub fn spring_length(&self, id: usize) -> Option<f32> {
        let spring = self.springs.get(id)?;
        let left = self.nodes.get(spring.left.index())?;
        let right = self.nodes.get(spring.right.index())?;
        Some(left.position.distance(right.position))
    }

    pub fn total_momentum(&self) -> Vec3 {
        self.nodes.iter().map(Node::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes.iter().map(Node::kinetic_energy).sum()
    }

    pub fn center_of_mass(&self) -> Vec3 {
        let total_mass: f32 = self.nodes.iter().map(|n| n.mass).sum();
        if total_mass <= 0.0 {
            return Vec3::ZERO;
        }
        self.nodes
            .iter()
            .map(|n| n.position * n.mass)
            .sum::<Vec3>()
            / total_mass
    }
}

impl TryFrom<GraphData> for MassSpringGraph {
    type Error = SimulationError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let mut graph = Self::with_capacity(data.nodes.len(), data.springs.len());
        for (i, node) in data.nodes.into_iter().enumerate() {
            if node.index.index() != i {
                return Err(SimulationError::UnknownNode { index: node.index });
            }
            let index = graph.add_node(node.position, node.mass)?;
            graph.nodes[index.index()].velocity = node.velocity;
        }
        for spring in data.springs {
            graph.add_spring(spring)?;
        }
        Ok(graph)
    }
}

impl From<MassSpringGraph> for GraphData {
    fn from(graph: MassSpringGraph) -> Self {
        Self {
            nodes: graph.nodes,
            springs: graph.springs,
        }
    }
}
