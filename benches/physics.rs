use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

use orrery::components::Body;
use orrery::physics::advance;
use orrery::physics::forces::{ForceConstants, accumulate_forces};
use orrery::physics::integrators::SemiImplicitEuler;
use orrery::physics::math::{Scalar, Vector};
use orrery::simulation::scenario::{ASTRONOMICAL_UNIT, SOLAR_MASS, Scenario};

/// A star plus `count - 1` planets on random circular-ish orbits.
fn generate_bodies(count: usize, seed: u64) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bodies = Vec::with_capacity(count);
    bodies.push(Body::new("Star", SOLAR_MASS, Vector::ZERO, Vector::ZERO).as_reference());

    let mu = ForceConstants::default().gravitational_constant * SOLAR_MASS;
    for i in 1..count {
        let angle: Scalar = rng.random_range(0.0..2.0 * std::f64::consts::PI);
        let radius = rng.random_range(0.3..40.0) * ASTRONOMICAL_UNIT;
        let speed = (mu / radius).sqrt();
        let direction = Vector::new(angle.cos(), angle.sin());

        bodies.push(Body::new(
            format!("Body {i}"),
            rng.random_range(1.0e22..1.0e27),
            direction * radius,
            direction.perp() * speed,
        ));
    }

    bodies
}

fn bench_force_accumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_accumulation");
    let constants = ForceConstants::default();

    for &count in &[10, 50, 100, 500, 1_000] {
        let bodies = generate_bodies(count, 42);
        let mut forces = Vec::with_capacity(count);
        group.throughput(Throughput::Elements((count * count) as u64));

        group.bench_with_input(BenchmarkId::new("bodies", count), &count, |b, _| {
            b.iter(|| {
                accumulate_forces(black_box(&bodies), &constants, &mut forces);
                black_box(&forces);
            });
        });
    }

    group.finish();
}

fn bench_physics_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("physics_step");
    let constants = ForceConstants::default();

    let mut solar_system = Scenario::default().build_bodies(0);
    let mut forces = Vec::new();
    group.bench_function("solar_system", |b| {
        b.iter(|| {
            advance(
                black_box(&mut solar_system),
                &mut forces,
                &SemiImplicitEuler,
                &constants,
                86400.0,
            )
        });
    });

    for &count in &[100, 1_000] {
        let mut bodies = generate_bodies(count, 7);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("bodies", count), &count, |b, _| {
            b.iter(|| {
                advance(
                    black_box(&mut bodies),
                    &mut forces,
                    &SemiImplicitEuler,
                    &constants,
                    3600.0,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_force_accumulation, bench_physics_step);
criterion_main!(benches);
