use fish_dynamics::*;

/// Two unit masses on a stiff zero-rest-length spring, released from rest.
fn stiff_pair(stiffness: f32) -> Result<FishBody, SimulationError> {
    let mut graph = MassSpringGraph::new();
    let a = graph.add_node(Vec3::new(-0.75, 0.0, 0.0), 1.0)?;
    let b = graph.add_node(Vec3::new(0.75, 0.0, 0.0), 1.0)?;
    graph.add_spring(Spring::new(a, b, 0.0, stiffness, 0.0))?;
    Ok(FishBody::new(graph))
}

fn main() -> Result<(), SimulationError> {
    for stiffness in [1.0e2_f32, 1.0e3, 1.0e5] {
        println!("stiffness {stiffness:e}");
        for kind in [SolverKind::Explicit, SolverKind::Implicit] {
            let config = SolverConfig {
                kind,
                ..SolverConfig::default()
            };
            let mut sim = FishSimulation::new(stiff_pair(stiffness)?, config);
            let outcome = sim.run(20);
            let extent = sim
                .body()
                .graph()
                .nodes()
                .iter()
                .map(|n| n.position.length())
                .fold(0.0_f32, f32::max);
            match outcome {
                Ok(()) => println!("  {:>8}: max |position| {extent:.3e}", sim.solver().name()),
                Err(err) => println!(
                    "  {:>8}: failed after {} ticks ({err})",
                    sim.solver().name(),
                    sim.ticks()
                ),
            }
        }
    }
    Ok(())
}
