use fish_dynamics::*;

fn chain(positions: &[f32], stiffness: f32, damping: f32) -> FishBody {
    let mut graph = MassSpringGraph::new();
    let nodes: Vec<NodeIndex> = positions
        .iter()
        .map(|&x| graph.add_node(Vec3::new(x, 0.0, 0.0), 1.0).expect("valid node"))
        .collect();
    for pair in nodes.windows(2) {
        graph
            .add_spring(Spring::new(pair[0], pair[1], 1.0, stiffness, damping))
            .expect("valid spring");
    }
    FishBody::new(graph)
}

fn spring_lengths(body: &FishBody) -> Vec<f32> {
    (0..body.graph().spring_count())
        .filter_map(|id| body.graph().spring_length(id))
        .collect()
}

#[test]
fn three_node_chain_settles_under_implicit_solver() {
    let body = chain(&[0.0, 1.5, 3.0], 100.0, 5.0);
    let mut sim = FishSimulation::new(body, SolverConfig::implicit());

    sim.run(200).expect("chain should stay well conditioned");

    for length in spring_lengths(sim.body()) {
        assert!((length - 1.0).abs() < 0.01, "spring length {length}");
    }
    for node in sim.body().graph().nodes() {
        assert!(node.velocity.length() < 0.01, "velocity {:?}", node.velocity);
    }
    // The spring system exerts no net force, so the chain stays centred.
    let com = sim.body().graph().center_of_mass();
    assert!((com.x - 1.5).abs() < 1e-3, "center of mass {com:?}");
}

#[test]
fn three_node_chain_settles_under_explicit_solver() {
    let body = chain(&[0.0, 1.5, 3.0], 100.0, 5.0);
    let mut sim = FishSimulation::new(body, SolverConfig::explicit());

    sim.run(200).expect("explicit steps should stay finite");

    for length in spring_lengths(sim.body()) {
        assert!((length - 1.0).abs() < 0.01, "spring length {length}");
    }
}

#[test]
fn undamped_spring_oscillates_without_drift() {
    let mut body = chain(&[0.0, 1.5], 100.0, 0.0);
    let solver = ExplicitSolver::default();
    let (mut shortest, mut longest) = (f32::MAX, f32::MIN);

    for _ in 0..200 {
        solver.step(&mut body, DEFAULT_TIME_STEP).expect("step");
        let length = spring_lengths(&body)[0];
        shortest = shortest.min(length);
        longest = longest.max(length);
        assert!(body.graph().total_momentum().length() < 1e-5);
    }

    // Released at +0.5 stretch: swings to about -0.5 and back, never beyond.
    assert!(shortest > 0.45 && shortest < 0.6, "shortest {shortest}");
    assert!(longest > 1.4 && longest < 1.55, "longest {longest}");
}

#[test]
fn damped_spring_reaches_rest_length_with_both_solvers() {
    for config in [SolverConfig::explicit(), SolverConfig::implicit()] {
        let solver = config.build();
        let mut body = chain(&[0.0, 1.5], 100.0, 5.0);
        for _ in 0..200 {
            solver.step(&mut body, DEFAULT_TIME_STEP).expect("step");
        }
        let length = spring_lengths(&body)[0];
        assert!(
            (length - 1.0).abs() < 0.01,
            "{} solver ended at {length}",
            solver.name()
        );
    }
}

#[test]
fn pre_solve_zeroes_forces_for_both_solvers() {
    for config in [SolverConfig::explicit(), SolverConfig::implicit()] {
        let solver = config.build();
        let mut body = chain(&[0.0, 1.5, 3.0], 100.0, 5.0);
        for node in body.graph_mut().nodes_mut() {
            node.apply_force(Vec3::new(1.0, -2.0, 3.0));
        }
        solver.pre_solve(&mut body);
        assert!(body.graph().nodes().iter().all(|n| n.force == Vec3::ZERO));
    }
}

#[test]
fn spring_forces_swap_sign_with_roles() {
    let mut graph = MassSpringGraph::new();
    let a = graph.add_node(Vec3::new(0.2, -0.1, 0.4), 1.0).unwrap();
    let b = graph.add_node(Vec3::new(1.3, 0.8, -0.2), 3.0).unwrap();
    graph.add_spring(Spring::new(a, b, 0.8, 60.0, 4.0)).unwrap();
    graph.node_mut(b).unwrap().velocity = Vec3::new(0.5, 0.0, -1.0);

    let spring = graph.edge(a, b).unwrap();
    let (na, nb) = (graph.node(a).unwrap(), graph.node(b).unwrap());
    let on_a = fish_dynamics::dynamics::spring_force(na, nb, spring).unwrap();
    let on_b = fish_dynamics::dynamics::spring_force(nb, na, spring).unwrap();
    assert_eq!(on_a, -on_b);
}

#[test]
fn muscle_contraction_shortens_the_spring() {
    let mut sim = FishSimulation::new(chain(&[0.0, 1.0], 100.0, 5.0), SolverConfig::implicit());
    sim.body_mut().actuate(0, 0.3).unwrap();
    sim.run(200).unwrap();
    let length = spring_lengths(sim.body())[0];
    assert!((length - 0.7).abs() < 0.01, "contracted length {length}");
}

#[test]
fn fluid_drag_is_scaled_per_solver() {
    fn swimming_triangle() -> FishBody {
        let mut graph = MassSpringGraph::new();
        let a = graph.add_node(Vec3::ZERO, 1.0).unwrap();
        let b = graph.add_node(Vec3::X, 1.0).unwrap();
        let c = graph.add_node(Vec3::Y, 1.0).unwrap();
        graph.connect(a, b, 50.0, 1.0).unwrap();
        graph.connect(b, c, 50.0, 1.0).unwrap();
        graph.connect(c, a, 50.0, 1.0).unwrap();
        for node in graph.nodes_mut() {
            node.velocity = Vec3::Z;
        }
        let mut body = FishBody::new(graph);
        body.add_face(TriangleFace::new([a, b, c], 2.0)).unwrap();
        body
    }

    for kind in [SolverKind::Explicit, SolverKind::Implicit] {
        let mut strong = swimming_triangle();
        let mut weak = swimming_triangle();
        let base = SolverConfig {
            kind,
            ..SolverConfig::default()
        };
        base.with_fluid_force_scale(1.0)
            .build()
            .step(&mut strong, DEFAULT_TIME_STEP)
            .unwrap();
        base.with_fluid_force_scale(0.01)
            .build()
            .step(&mut weak, DEFAULT_TIME_STEP)
            .unwrap();

        let strong_vz = strong.graph().nodes()[0].velocity.z;
        let weak_vz = weak.graph().nodes()[0].velocity.z;
        assert!(strong_vz < weak_vz, "{kind:?}: {strong_vz} vs {weak_vz}");
        assert!(weak_vz < 1.0);
        assert!(strong_vz > 0.9);
    }
}

#[test]
fn missing_spring_is_a_topology_error() {
    let body = chain(&[0.0, 1.0, 2.0], 10.0, 0.0);
    let err = body.graph().edge(NodeIndex(0), NodeIndex(2)).unwrap_err();
    assert_eq!(
        err,
        SimulationError::MissingSpring {
            a: NodeIndex(0),
            b: NodeIndex(2)
        }
    );
}

#[test]
fn coincident_nodes_stop_the_tick() {
    for config in [SolverConfig::explicit(), SolverConfig::implicit()] {
        let mut body = chain(&[0.0, 1.0], 10.0, 0.0);
        body.graph_mut().nodes_mut()[1].position = Vec3::ZERO;
        let err = config.build().step(&mut body, DEFAULT_TIME_STEP).unwrap_err();
        assert!(matches!(err, SimulationError::DegenerateSpring { .. }));
    }
}
