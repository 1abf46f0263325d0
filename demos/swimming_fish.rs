use fish_dynamics::*;

const SEGMENTS: usize = 6;
const TICKS: u32 = 240;

struct Muscles {
    left: Vec<usize>,
    right: Vec<usize>,
}

/// A tube of triangular cross-sections along +X with skin faces on both flanks.
fn build_fish() -> Result<(FishBody, Muscles), SimulationError> {
    let mut graph = MassSpringGraph::with_capacity(SEGMENTS * 3, SEGMENTS * 6);
    let mut sections = Vec::with_capacity(SEGMENTS);
    for s in 0..SEGMENTS {
        let x = s as f32 * 0.8;
        let top = graph.add_node(Vec3::new(x, 0.5, 0.0), 0.4)?;
        let left = graph.add_node(Vec3::new(x, -0.3, -0.4), 0.3)?;
        let right = graph.add_node(Vec3::new(x, -0.3, 0.4), 0.3)?;
        graph.connect(top, left, 60.0, 2.0)?;
        graph.connect(left, right, 60.0, 2.0)?;
        graph.connect(right, top, 60.0, 2.0)?;
        sections.push([top, left, right]);
    }

    let mut muscles = Muscles {
        left: Vec::new(),
        right: Vec::new(),
    };
    for pair in sections.windows(2) {
        let ([top0, left0, right0], [top1, left1, right1]) = (pair[0], pair[1]);
        graph.connect(top0, top1, 40.0, 1.5)?;
        muscles.left.push(graph.connect(left0, left1, 40.0, 1.5)?);
        muscles.right.push(graph.connect(right0, right1, 40.0, 1.5)?);
    }

    let mut body = FishBody::new(graph).with_damping(0.05);
    for pair in sections.windows(2) {
        let ([top0, left0, right0], [top1, left1, right1]) = (pair[0], pair[1]);
        body.add_face(TriangleFace::new([top0, left1, left0], 1.2))?;
        body.add_face(TriangleFace::new([top0, top1, left1], 1.2))?;
        body.add_face(TriangleFace::new([top0, right0, right1], 1.2))?;
        body.add_face(TriangleFace::new([top0, right1, top1], 1.2))?;
    }
    Ok((body, muscles))
}

fn main() -> Result<(), SimulationError> {
    let (body, muscles) = build_fish()?;
    println!(
        "Fish: {} nodes, {} springs, {} faces",
        body.graph().node_count(),
        body.graph().spring_count(),
        body.faces().len()
    );

    let mut sim = FishSimulation::new(body, SolverConfig::implicit().with_fluid_force_scale(0.5));
    let start = sim.body().graph().center_of_mass();

    for tick in 0..TICKS {
        // Travelling wave: each segment lags the one ahead of it.
        let phase = tick as f32 * DEFAULT_TIME_STEP * 4.0;
        for (segment, (&left, &right)) in muscles.left.iter().zip(&muscles.right).enumerate() {
            let wave = (phase - segment as f32 * 0.9).sin() * 0.25;
            sim.body_mut().actuate(left, wave.max(0.0))?;
            sim.body_mut().actuate(right, (-wave).max(0.0))?;
        }
        sim.tick()?;

        if tick % 40 == 0 {
            let com = sim.body().graph().center_of_mass();
            println!(
                "tick {tick:>3}: center ({:.3}, {:.3}, {:.3}), kinetic energy {:.4}",
                com.x,
                com.y,
                com.z,
                sim.body().graph().kinetic_energy()
            );
        }
    }

    let travelled = sim.body().graph().center_of_mass() - start;
    println!("Displacement after {TICKS} ticks: {travelled:?}");
    sim.profiler().report();
    Ok(())
}
