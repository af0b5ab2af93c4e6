//! Physics step: force accumulation followed by integration

pub mod forces;
pub mod integrators;
pub mod math;

use crate::components::Body;
use bevy::log::debug;
use forces::{ForceConstants, accumulate_forces, update_reference_distances};
use integrators::Integrator;
use math::{Scalar, Vector};

/// Advances every body by one step of `dt` seconds.
///
/// All forces are computed from the positions at entry before any body moves.
/// A body whose step produces a non-finite position or velocity keeps its
/// previous position and has its velocity zeroed. Returns the number of
/// bodies frozen this way.
pub fn advance(
    bodies: &mut [Body],
    forces: &mut Vec<Vector>,
    integrator: &dyn Integrator,
    constants: &ForceConstants,
    dt: Scalar,
) -> usize {
    update_reference_distances(bodies);
    accumulate_forces(bodies, constants, forces);

    let mut frozen = 0;
    for (body, force) in bodies.iter_mut().zip(forces.iter()) {
        let acceleration = *force / body.mass;
        let previous_position = body.position;

        integrator.step(&mut body.position, &mut body.velocity, acceleration, dt);

        if !body.is_finite() {
            debug!(
                "Freezing {} after non-finite step (mass {:e}, force {:?})",
                body.name, body.mass, force
            );
            body.position = previous_position;
            body.velocity = Vector::ZERO;
            frozen += 1;
        }
    }

    frozen
}

/// Total linear momentum of the system.
pub fn total_momentum(bodies: &[Body]) -> Vector {
    bodies.iter().map(Body::momentum).sum()
}

/// Mass-weighted mean position, or `None` when total mass is not positive.
pub fn barycenter(bodies: &[Body]) -> Option<Vector> {
    let (weighted, total_mass) = bodies
        .iter()
        .fold((Vector::ZERO, 0.0), |(pos_acc, mass_acc), body| {
            (pos_acc + body.position * body.mass, mass_acc + body.mass)
        });

    (total_mass > 0.0).then(|| weighted / total_mass)
}
