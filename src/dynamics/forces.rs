use glam::Vec3;

use crate::{
    body::FishBody,
    core::{
        graph::MassSpringGraph,
        node::{Node, NodeIndex},
        spring::Spring,
    },
    error::SimulationError,
};

/// Scalar `n_ij` of the damped spring law acting on `i` from `j`.
///
/// The force on `i` is `n_ij * (p_j - p_i)`. The implicit integrator uses the same
/// scalar as its stiffness coefficient.
pub fn force_scalar(i: &Node, j: &Node, spring: &Spring) -> Result<f32, SimulationError> {
    let r = j.position - i.position;
    let r_len = r.length();
    if !r_len.is_finite() || r_len <= f32::MIN_POSITIVE {
        return Err(SimulationError::DegenerateSpring {
            a: i.index,
            b: j.index,
        });
    }

    let stretch = r_len - spring.current_length;
    let relative_velocity = (j.velocity - i.velocity).dot(r) / r_len;

    Ok((spring.stiffness * stretch + spring.damping * relative_velocity) / r_len)
}

/// Force the spring exerts on `i`.
pub fn spring_force(i: &Node, j: &Node, spring: &Spring) -> Result<Vec3, SimulationError> {
    let n_ij = force_scalar(i, j, spring)?;
    Ok(n_ij * (j.position - i.position))
}

/// Sum of spring forces acting on a single node from all of its neighbors.
pub fn net_spring_force(
    graph: &MassSpringGraph,
    index: NodeIndex,
) -> Result<Vec3, SimulationError> {
    let node = graph.node(index)?;
    graph
        .neighbors(index)
        .iter()
        .try_fold(Vec3::ZERO, |total, &other| -> Result<Vec3, SimulationError> {
            let spring = graph.edge(index, other)?;
            let neighbor = graph.node(other)?;
            Ok(total + spring_force(node, neighbor, spring)?)
        })
}

/// Adds every node's net spring force to its accumulator.
///
/// All forces are evaluated on the same state before any accumulator is touched.
pub fn accumulate_spring_forces(graph: &mut MassSpringGraph) -> Result<(), SimulationError> {
    let forces = graph
        .nodes()
        .iter()
        .map(|node| net_spring_force(graph, node.index))
        .collect::<Result<Vec<_>, _>>()?;

    for (node, force) in graph.nodes_mut().iter_mut().zip(forces) {
        node.apply_force(force);
    }
    Ok(())
}

/// Lets every fluid face push its nodes, scaled by `scale`.
pub fn apply_fluid_forces(body: &mut FishBody, scale: f32) {
    let (graph, faces) = body.graph_and_faces_mut();
    let nodes = graph.nodes_mut();
    for face in faces {
        face.apply_force(nodes, scale);
    }
}
