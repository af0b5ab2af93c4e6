//! Numerical integration methods for the n-body step

use crate::physics::math::{Scalar, Vector};

pub mod semi_implicit_euler;

pub use semi_implicit_euler::SemiImplicitEuler;

/// Advances one body's kinematic state by a fixed time step.
pub trait Integrator: Send + Sync {
    /// Advance a single body's state by one time step
    ///
    /// # Arguments
    /// * `position` - Mutable reference to position
    /// * `velocity` - Mutable reference to velocity vector
    /// * `acceleration` - Acceleration computed from the step's force snapshot
    /// * `dt` - Time step in seconds
    fn step(&self, position: &mut Vector, velocity: &mut Vector, acceleration: Vector, dt: Scalar);

    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the order of this integrator
    fn order(&self) -> usize;
}
