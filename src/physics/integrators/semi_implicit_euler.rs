//! Semi-implicit Euler integration method

use super::Integrator;
use crate::physics::math::{Scalar, Vector};

/// Semi-implicit Euler integrator
///
/// First order. Velocity is updated before position, so the position step
/// already sees this step's acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step(&self, position: &mut Vector, velocity: &mut Vector, acceleration: Vector, dt: Scalar) {
        // v(t+dt) = v(t) + a(t) * dt
        *velocity += acceleration * dt;

        // x(t+dt) = x(t) + v(t+dt) * dt
        *position += *velocity * dt;
    }

    fn name(&self) -> &str {
        "Semi-implicit Euler"
    }

    fn order(&self) -> usize {
        1
    }
}
