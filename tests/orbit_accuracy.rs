//! Accuracy tests for the physics step
//!
//! A light planet around a heavy star should trace a circle and come back to
//! its start after one analytical period. Momentum of an isolated pair should
//! not drift.

use orrery::components::Body;
use orrery::physics::forces::ForceConstants;
use orrery::physics::integrators::{Integrator, SemiImplicitEuler};
use orrery::physics::math::{Scalar, Vector, distance};
use orrery::physics::{advance, barycenter, total_momentum};
use orrery::simulation::scenario::{ASTRONOMICAL_UNIT, SOLAR_MASS};

const PI: Scalar = std::f64::consts::PI;

fn circular_orbit() -> (Vec<Body>, Scalar) {
    let constants = ForceConstants::default();
    let mu = constants.gravitational_constant * SOLAR_MASS;
    let speed = (mu / ASTRONOMICAL_UNIT).sqrt();
    let period = 2.0 * PI * (ASTRONOMICAL_UNIT.powi(3) / mu).sqrt();

    let bodies = vec![
        Body::new("Star", SOLAR_MASS, Vector::ZERO, Vector::ZERO).as_reference(),
        Body::new(
            "Planet",
            1.0,
            Vector::new(ASTRONOMICAL_UNIT, 0.0),
            Vector::new(0.0, speed),
        ),
    ];
    (bodies, period)
}

fn run(bodies: &mut [Body], steps: usize, dt: Scalar) {
    let integrator = SemiImplicitEuler;
    let constants = ForceConstants::default();
    let mut forces = Vec::new();
    for _ in 0..steps {
        advance(bodies, &mut forces, &integrator, &constants, dt);
    }
}

#[test]
fn test_circular_orbit_returns_to_start() {
    let (mut bodies, period) = circular_orbit();
    let start = bodies[1].position;

    let dt = 3600.0;
    let steps = (period / dt).round() as usize;
    run(&mut bodies, steps, dt);

    let error = distance(bodies[1].position, start);
    assert!(
        error < 0.01 * ASTRONOMICAL_UNIT,
        "planet ended {:.3e} m from its start",
        error
    );
}

#[test]
fn test_circular_orbit_keeps_radius() {
    let (mut bodies, period) = circular_orbit();

    let dt = 3600.0;
    let steps = (period / dt) as usize;
    let mut forces = Vec::new();
    let constants = ForceConstants::default();
    for _ in 0..steps {
        advance(
            &mut bodies,
            &mut forces,
            &SemiImplicitEuler,
            &constants,
            dt,
        );
        let radius = bodies[1].distance_to(&bodies[0]);
        assert!((radius / ASTRONOMICAL_UNIT - 1.0).abs() < 0.01);
    }

    // Tracked against the reference before each step
    let tracked = bodies[1].distance_from_reference / ASTRONOMICAL_UNIT;
    assert!((tracked - 1.0).abs() < 0.01);
}

#[test]
fn test_two_body_center_of_mass_velocity_is_constant() {
    let mut bodies = vec![
        Body::new(
            "A",
            5.0e24,
            Vector::new(-1.0e9, 0.0),
            Vector::new(0.0, -300.0),
        ),
        Body::new("B", 3.0e24, Vector::new(2.0e9, 5.0e8), Vector::new(150.0, 500.0)),
    ];
    let total_mass: Scalar = bodies.iter().map(|body| body.mass).sum();
    let initial = total_momentum(&bodies) / total_mass;
    let initial_center = barycenter(&bodies).unwrap();

    let steps = 2000;
    let dt = 600.0;
    run(&mut bodies, steps, dt);

    let final_velocity = total_momentum(&bodies) / total_mass;
    let scale = bodies[0].speed().max(bodies[1].speed());
    assert!(
        (final_velocity - initial).length() < 1e-6 * scale,
        "centre of mass velocity drifted from {:?} to {:?}",
        initial,
        final_velocity
    );

    let expected_center = initial_center + initial * (steps as Scalar * dt);
    let center = barycenter(&bodies).unwrap();
    assert!(distance(center, expected_center) < 1e-6 * 1.0e9);
}

#[test]
fn test_semi_implicit_euler_is_first_order() {
    let integrator = SemiImplicitEuler;
    assert_eq!(integrator.order(), 1);
    assert_eq!(integrator.name(), "Semi-implicit Euler");
}
