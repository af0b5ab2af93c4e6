//! Centralized event definitions
//!
//! Keyboard shortcuts and panel buttons never touch the simulation directly.
//! They emit a [`SimulationCommand`], and the simulation plugin applies the
//! queued commands to the controller once per frame.

use crate::physics::math::Scalar;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SimulationCommand {
    Restart,
    TogglePause,
    SetPaused(bool),
    ToggleTrails,
    ClearTrails,
    /// Remove the first body flagged as the reference
    DeleteReferenceBody,
    /// Remove one non-reference body chosen at random
    DeleteRandomBody,
    SetTimestep(Scalar),
    /// Multiply the current timestep
    ScaleTimestep(Scalar),
    /// Camera translation in pixels
    Pan(Vec2),
    /// Change in zoom, clamped at the configured floor
    Zoom(f32),
    SetZoom(f32),
    OverrideMass { index: usize, mass: Scalar },
    OverrideAllMasses(Scalar),
    /// Stop every body except the reference
    ZeroVelocities,
    TogglePanel,
    Quit,
}
