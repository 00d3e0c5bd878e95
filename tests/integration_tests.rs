use float_cmp::assert_approx_eq;
use itertools::{assert_equal, Itertools};
use neurite::{
    axon::{Axon, AxonPhase},
    canvas::{DrawCommand, NullCanvas, RecordingCanvas},
    driver::{input_channel, Driver, InputEvent},
    neuron::Neuron,
    params::WorldParams,
    svg::SvgCanvas,
    ticker::CountdownTicker,
    world::{create_world, FrameContext, World},
    NeuronId, Point,
};
use rand::{rngs::StdRng, SeedableRng};

const FAR_AWAY: Point = Point::new(-10_000.0, -10_000.0);

fn make_world(seed: u64) -> World {
    let mut params = WorldParams::default();
    params.technical_params.seed_override = Some(seed);
    create_world(params).unwrap()
}

fn step_n(world: &mut World, n: usize) {
    for _ in 0..n {
        world.step();
    }
}

#[test]
fn empty_world() {
    let mut world = make_world(0);
    let mut canvas = RecordingCanvas::new();

    let stats = world.frame(&mut canvas);

    assert_eq!(stats.population, 0);
    assert_eq!(canvas.commands.len(), 1);
    assert!(matches!(canvas.commands[0], DrawCommand::FillRect { .. }));
}

#[test]
fn default_seed_count() {
    let mut world = make_world(1);
    let seed_count = world.params().population_params.seed_count;

    assert_eq!(world.seed(seed_count), 50);
    assert_eq!(world.len(), 50);
}

#[test]
fn ids_are_not_reused() {
    let mut world = make_world(2);
    let first = world.spawn_neuron(10.0, 10.0).unwrap();
    world.neuron_mut(first).unwrap().set_activity(0.0);
    world.cull();

    let second = world.spawn_neuron(10.0, 10.0).unwrap();

    assert_ne!(first, second);
    assert!(world.neuron(first).is_none());
}

#[test]
fn explicit_connection_search_creates_exactly_one_axon() {
    let mut world = make_world(3);
    let a = world.spawn_neuron(100.0, 100.0).unwrap();
    let b = world.spawn_neuron(100.0, 200.0).unwrap();
    let c = world.spawn_neuron(100.0, 40.0).unwrap();

    assert_eq!(world.find_potential_connections(a), Some(b));
    assert_equal(
        world.neuron(a).unwrap().axons().iter().map(Axon::target),
        [b],
    );

    assert_eq!(world.find_potential_connections(a), Some(c));
    assert_equal(
        world.neuron(a).unwrap().axons().iter().map(Axon::target),
        [b, c],
    );
}

#[test]
fn axon_reaches_target_scenario() {
    let params = WorldParams::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut target = Neuron::new(
        NeuronId(2),
        Point::new(100.0, 200.0),
        &params.neuron_params,
        &mut rng,
    );
    target.set_activity(0.3);
    let source = Point::new(100.0, 100.0);
    let mut axon = Axon::new(source, target.id(), target.position());
    let ctx = FrameContext {
        mouse: FAR_AWAY,
        width: 1280.0,
        height: 720.0,
        params: &params,
    };

    let transitions = (0..350)
        .filter_map(|_| axon.update(source, Some(&mut target), &ctx, &mut rng))
        .collect_vec();

    assert_equal(transitions, [AxonPhase::Complete]);
    assert!(axon.path().len() <= 230);
    assert!(axon.tip().distance(Point::new(100.0, 200.0)) < 10.0);
    assert_approx_eq!(f64, target.activity(), 0.8);
}

#[test]
fn world_axon_reaches_target_and_boosts_it() {
    let mut params = WorldParams::default();
    params.technical_params.seed_override = Some(6);
    params.neuron_params.velocity_nudge_probability = 0.0;
    params.neuron_params.connection_search_probability = 0.0;
    let mut world = create_world(params).unwrap();
    world.on_pointer_move(FAR_AWAY.x, FAR_AWAY.y);

    let a = world.spawn_neuron(100.0, 100.0).unwrap();
    let b = world.spawn_neuron(100.0, 200.0).unwrap();
    for id in [a, b] {
        world.neuron_mut(id).unwrap().set_velocity(Point::default());
    }

    let mut completed = 0;
    for _ in 0..300 {
        completed += world.step().axons_completed;
    }

    assert_eq!(completed, 1);
    let axon = &world.neuron(b).unwrap().axons()[0];
    assert_eq!(axon.phase(), AxonPhase::Complete);
    assert_eq!(axon.target(), a);

    // a decayed for 300 frames but received one +0.5 boost, capped at 1
    let a_activity = world.neuron(a).unwrap().activity();
    assert!(a_activity > 1.0 - 300.0 * 0.0005);
    let b_activity = world.neuron(b).unwrap().activity();
    assert_approx_eq!(f64, b_activity, 1.0 - 300.0 * 0.0005, epsilon = 1e-9);
}

#[test]
fn decay_only_neuron_is_culled_after_1980_updates() {
    let mut world = make_world(7);
    world.on_pointer_move(FAR_AWAY.x, FAR_AWAY.y);
    let id = world.spawn_neuron(300.0, 300.0).unwrap();

    step_n(&mut world, 1980);
    assert!(world.neuron(id).unwrap().activity() <= 0.01 + 1e-9);

    let stats = world.step();
    assert_eq!(stats.neurons_culled, 1);
    assert!(world.is_empty());
}

#[test]
fn mouse_keeps_neurons_alive() {
    let mut world = make_world(8);
    let id = world.spawn_neuron(640.0, 360.0).unwrap();

    // at most 0.2 px per frame, so it cannot leave the 250 px influence radius
    step_n(&mut world, 1000);

    assert_approx_eq!(f64, world.neuron(id).unwrap().activity(), 1.0);
}

#[test]
fn click_cap_scenarios() {
    let mut world = make_world(9);
    world.seed(148);
    assert_eq!(world.on_click(500.0, 300.0), 2);
    assert_eq!(world.on_click(500.0, 300.0), 0);
    assert_eq!(world.len(), 150);
}

#[test]
fn driver_with_input_thread() {
    let world = make_world(10);
    let (tx, rx) = input_channel();
    let mut driver = Driver::new(world, rx);

    std::thread::spawn(move || {
        for i in 0..4 {
            tx.send(InputEvent::Click {
                x: 100.0 + 100.0 * i as f64,
                y: 300.0,
            })
            .unwrap();
        }
    })
    .join()
    .unwrap();

    let summary = driver.run(&mut NullCanvas, &mut CountdownTicker::new(10));

    assert_eq!(summary.frames, 10);
    assert_eq!(summary.events_applied, 4);
    assert_eq!(summary.neurons_spawned, 20);

    let world = driver.into_world();
    assert_eq!(world.len(), 20);
    assert_eq!(world.frame_count(), 10);
}

#[test]
fn long_run_invariants() {
    let mut world = make_world(11);
    world.seed(50);
    let mut canvas = RecordingCanvas::new();

    for frame in 0..1500u64 {
        if frame % 100 == 0 {
            world.on_click((frame % 1280) as f64, 360.0);
        }
        world.on_pointer_move((frame % 1280) as f64, 360.0);

        canvas.clear();
        world.frame(&mut canvas);

        assert!(world.len() <= 150);

        for neuron in world.neurons() {
            assert!(neuron.activity() <= 1.0);
            for axon in neuron.axons() {
                assert!(!axon.path().is_empty());
            }
        }

        for (_, color) in canvas.polylines() {
            assert!(color.a >= 0.0 && color.a <= 0.3);
        }
    }
}

#[test]
fn same_seed_same_snapshot() {
    let run = |seed| {
        let mut world = make_world(seed);
        world.seed(50);
        step_n(&mut world, 200);
        serde_json::to_string(&world.snapshot()).unwrap()
    };

    assert_eq!(run(12), run(12));
    assert_ne!(run(12), run(13));
}

#[test]
fn svg_of_running_world() {
    let mut world = make_world(14);
    world.seed(50);
    let mut canvas = SvgCanvas::new(1280.0, 720.0);

    for _ in 0..100 {
        world.frame(&mut canvas);
    }

    let svg = canvas.to_string();
    assert!(svg.starts_with("<svg"));
    assert!(svg.matches("<circle").count() >= world.len());
}

#[test]
fn yaml_config_round_trip_into_world() {
    let params: WorldParams = serde_yaml::from_str(
        r#"
canvas_params:
  width: 400.0
  height: 300.0
population_params:
  max_neurons: 10
  seed_count: 20
technical_params:
  seed_override: 3
"#,
    )
    .unwrap();

    let mut world = create_world(params).unwrap();
    let seed_count = world.params().population_params.seed_count;

    assert_eq!(world.seed(seed_count), 10);
    assert_eq!(world.mouse(), Point::new(200.0, 150.0));
}
