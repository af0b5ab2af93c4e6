//! End-to-end behavior of the simulation controller without a window

use bevy::math::Vec2;
use orrery::components::{Body, TrailBuffer};
use orrery::config::SimulationConfig;
use orrery::events::SimulationCommand;
use orrery::physics::math::Vector;
use orrery::render::{BatchLimits, BatchRenderer, MemoryDevice, PrimitiveTopology};
use orrery::simulation::scenario::{ASTRONOMICAL_UNIT, SOLAR_MASS, Scenario};
use orrery::simulation::{BodySelector, SimulationController};
use orrery::states::RunState;

fn seeded_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.physics.initial_seed = Some(1234);
    config
}

fn three_bodies() -> Vec<Body> {
    vec![
        Body::new("Sun", SOLAR_MASS, Vector::ZERO, Vector::ZERO).as_reference(),
        Body::new(
            "Earth",
            5.97e24,
            Vector::new(ASTRONOMICAL_UNIT, 0.0),
            Vector::new(0.0, 29_800.0),
        ),
        Body::new(
            "Mars",
            6.42e23,
            Vector::new(1.52 * ASTRONOMICAL_UNIT, 0.0),
            Vector::new(0.0, 24_100.0),
        ),
    ]
}

#[test]
fn test_restart_restores_snapshot_exactly() {
    let config = seeded_config();
    let mut controller = SimulationController::new(&Scenario::default(), &config);

    for _ in 0..25 {
        controller.advance(1.0 / 60.0);
    }
    controller.pan_camera(Vec2::new(50.0, -20.0));
    controller.set_timestep(3600.0);
    controller.restart();

    assert_eq!(controller.bodies().len(), controller.snapshot().len());
    for (body, original) in controller.bodies().iter().zip(controller.snapshot()) {
        assert_eq!(body.position, original.position);
        assert_eq!(body.velocity, original.velocity);
        assert_eq!(body.mass, original.mass);
    }
    assert_eq!(controller.settings().timestep, config.physics.timestep_seconds);
    assert_eq!(controller.settings().camera_offset(), Vec2::ZERO);
    assert_eq!(controller.simulated_seconds(), 0.0);
}

#[test]
fn test_deleting_reference_leaves_no_reference() {
    let mut controller = SimulationController::from_bodies(three_bodies(), &seeded_config());

    let removed = controller.delete_body(BodySelector::Reference);

    assert_eq!(removed.map(|body| body.name), Some("Sun".to_string()));
    assert_eq!(controller.bodies().len(), 2);
    assert!(controller.bodies().iter().all(|body| !body.is_reference));

    // Nothing left to delete by reference
    assert!(controller.delete_body(BodySelector::Reference).is_none());
    assert_eq!(controller.bodies().len(), 2);
}

#[test]
fn test_random_deletion_is_reproducible_with_seed() {
    let config = seeded_config();
    let mut first = SimulationController::new(&Scenario::default(), &config);
    let mut second = SimulationController::new(&Scenario::default(), &config);

    for _ in 0..4 {
        let a = first.delete_body(BodySelector::RandomNonReference);
        let b = second.delete_body(BodySelector::RandomNonReference);
        assert_eq!(a.map(|body| body.name), b.map(|body| body.name));
    }
    assert!(first.bodies().iter().any(|body| body.is_reference));
}

#[test]
fn test_random_deletion_spares_lone_reference() {
    let bodies = vec![Body::new("Sun", SOLAR_MASS, Vector::ZERO, Vector::ZERO).as_reference()];
    let mut controller = SimulationController::from_bodies(bodies, &seeded_config());

    assert!(
        controller
            .delete_body(BodySelector::RandomNonReference)
            .is_none()
    );
    assert_eq!(controller.bodies().len(), 1);
}

#[test]
fn test_paused_frames_leave_bodies_untouched() {
    let mut controller = SimulationController::from_bodies(three_bodies(), &seeded_config());
    controller.apply(SimulationCommand::SetPaused(true));
    assert_eq!(controller.state(), RunState::Paused);

    let before: Vec<(Vector, Vector)> = controller
        .bodies()
        .iter()
        .map(|body| (body.position, body.velocity))
        .collect();

    for _ in 0..100 {
        assert!(!controller.advance(1.0 / 60.0));
    }

    let after: Vec<(Vector, Vector)> = controller
        .bodies()
        .iter()
        .map(|body| (body.position, body.velocity))
        .collect();
    assert_eq!(before, after);
    assert!(controller.elapsed_seconds() > 1.0);
    assert_eq!(controller.simulated_seconds(), 0.0);
}

#[test]
fn test_trail_keeps_newest_points_in_order() {
    let capacity = 16;
    let extra = 5;
    let mut trail = TrailBuffer::new(capacity);

    for i in 0..capacity + extra {
        trail.push(Vec2::new(i as f32, 0.0));
    }

    let xs: Vec<f32> = trail.iter().map(|point| point.x).collect();
    let expected: Vec<f32> = (extra..capacity + extra).map(|i| i as f32).collect();
    assert_eq!(xs, expected);
}

#[test]
fn test_frame_draws_trails_before_bodies() {
    let mut config = seeded_config();
    config.rendering.trails_enabled = true;
    let mut controller = SimulationController::from_bodies(three_bodies(), &config);
    let mut device = MemoryDevice::new();
    let mut renderer = BatchRenderer::new(&mut device, BatchLimits::default()).unwrap();
    let viewport = Vec2::new(1280.0, 800.0);

    for _ in 0..3 {
        device.take_draws();
        controller
            .frame(1.0 / 60.0, &mut renderer, &mut device, viewport)
            .unwrap();
    }

    let topologies: Vec<PrimitiveTopology> =
        device.draws().iter().map(|draw| draw.topology).collect();
    assert_eq!(topologies.len(), 6);
    assert!(topologies[..3].iter().all(|t| *t == PrimitiveTopology::LineStrip));
    assert!(topologies[3..].iter().all(|t| *t == PrimitiveTopology::TriangleList));
    assert!(controller.bodies().iter().all(|body| body.trail.len() == 3));
}

#[test]
fn test_empty_scenario_runs_and_renders_nothing() {
    let mut controller = SimulationController::new(&Scenario::empty(), &seeded_config());
    let mut device = MemoryDevice::new();
    let mut renderer = BatchRenderer::new(&mut device, BatchLimits::default()).unwrap();

    controller
        .frame(1.0 / 60.0, &mut renderer, &mut device, Vec2::new(640.0, 480.0))
        .unwrap();

    assert!(device.draws().is_empty());
    assert_eq!(controller.steps(), 1);
}

#[test]
fn test_oversized_rendering_config_renders_without_panicking() {
    let mut config = seeded_config();
    config.rendering.trails_enabled = true;
    config.rendering.trail_capacity = 10;
    config.rendering.max_strip_vertices = 4;
    config.rendering.polygon_sides = 2000;

    let mut controller = SimulationController::new(&Scenario::default(), &config);
    assert_eq!(controller.rendering_config().trail_capacity, 4);
    assert_eq!(controller.rendering_config().polygon_sides, 1023);

    let mut device = MemoryDevice::new();
    let mut renderer =
        BatchRenderer::new(&mut device, BatchLimits::from(&config.rendering)).unwrap();
    for _ in 0..6 {
        controller
            .frame(1.0 / 60.0, &mut renderer, &mut device, Vec2::new(800.0, 600.0))
            .unwrap();
    }

    let draws = device.take_draws();
    let longest_strip = draws
        .iter()
        .filter(|draw| draw.topology == PrimitiveTopology::LineStrip)
        .map(|draw| draw.vertices.len())
        .max();
    assert_eq!(longest_strip, Some(4));
    assert_eq!(renderer.stats().truncations, 0);
}

#[test]
fn test_explicit_long_trails_are_rebuilt_to_fit() {
    let mut config = seeded_config();
    config.rendering.trail_capacity = 16;
    config.rendering.max_strip_vertices = 8;
    let bodies = three_bodies()
        .into_iter()
        .map(|body| body.with_trail_capacity(100))
        .collect();

    let controller = SimulationController::from_bodies(bodies, &config);
    assert!(
        controller
            .bodies()
            .iter()
            .all(|body| body.trail.capacity() == 8)
    );
}
