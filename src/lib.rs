//! Orrery library
//!
//! This provides the core functionality of orrery as a library
//! to enable integration testing and the headless runner.

pub mod cli;
pub mod components;
pub mod config;
pub mod events;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod render;
pub mod resources;
pub mod simulation;
pub mod states;
pub mod utils;

// Test utilities are public for integration tests
pub mod test_utils;
