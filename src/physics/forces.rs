//! Pairwise Newtonian gravity
//!
//! Forces are computed for every ordered pair from a single snapshot of
//! positions, O(n²) per step. That is plenty for a hand-built system of tens
//! of bodies.

use crate::components::Body;
use crate::config::PhysicsConfig;
use crate::physics::math::{Scalar, Vector, distance};

/// Constants the force pass reads every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceConstants {
    pub gravitational_constant: Scalar,
    /// Separations below this (but above zero) are clamped up to it
    pub min_force_distance: Scalar,
}

impl Default for ForceConstants {
    fn default() -> Self {
        Self::from(&PhysicsConfig::default())
    }
}

impl From<&PhysicsConfig> for ForceConstants {
    fn from(config: &PhysicsConfig) -> Self {
        Self {
            gravitational_constant: config.gravitational_constant,
            min_force_distance: config.min_force_distance,
        }
    }
}

/// Force exerted on `a` by `b`.
///
/// The magnitude is `G·m₁·m₂ / d²`. Its direction comes from the angle of
/// `a − b`, negated so the force pulls `a` toward `b`. Coincident or
/// non-finite positions contribute nothing.
pub fn pairwise_force(a: &Body, b: &Body, constants: &ForceConstants) -> Vector {
    let delta = a.position - b.position;
    let d = distance(a.position, b.position);
    if d == 0.0 || !d.is_finite() {
        return Vector::ZERO;
    }

    let d = d.max(constants.min_force_distance);
    let magnitude = constants.gravitational_constant * (a.mass * b.mass) / (d * d);
    let theta = libm::atan2(delta.y, delta.x);
    let force = -Vector::new(magnitude * libm::cos(theta), magnitude * libm::sin(theta));

    if force.is_finite() {
        force
    } else {
        Vector::ZERO
    }
}

/// Fills `out[i]` with the net force on body `i` from every other body.
///
/// Only the positions present at call time are read, so every body sees the
/// same snapshot regardless of iteration order.
pub fn accumulate_forces(bodies: &[Body], constants: &ForceConstants, out: &mut Vec<Vector>) {
    out.clear();
    out.resize(bodies.len(), Vector::ZERO);

    for (i, body) in bodies.iter().enumerate() {
        let mut sum = Vector::ZERO;
        for (j, other) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            sum += pairwise_force(body, other, constants);
        }
        out[i] = sum;
    }
}

/// Index of the body that reference distances are measured from.
///
/// With several reference bodies the last one in list order wins.
pub fn reference_index(bodies: &[Body]) -> Option<usize> {
    bodies.iter().rposition(|body| body.is_reference)
}

/// Refreshes `distance_from_reference` on every non-reference body.
///
/// Without a reference body the stored values are left as they were.
pub fn update_reference_distances(bodies: &mut [Body]) {
    let Some(reference) = reference_index(bodies) else {
        return;
    };

    let origin = bodies[reference].position;
    for body in bodies.iter_mut().filter(|body| !body.is_reference) {
        body.distance_from_reference = distance(body.position, origin);
    }
}
