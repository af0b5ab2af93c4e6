//! Orrery prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across the Orrery application to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;
pub use rand::Rng;

// Internal re-exports - Math
pub use crate::physics::math::{Scalar, Vector};

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - States
pub use crate::states::RunState;

// Internal re-exports - Resources
pub use crate::resources::SharedRng;

// Internal re-exports - Components
pub use crate::components::Body;

// Internal re-exports - Simulation
pub use crate::events::SimulationCommand;
pub use crate::simulation::SimulationController;
