//! Bevy plugins wiring the simulation into a window.

pub mod controls;
pub mod panel;
pub mod simulation;
pub mod visualization;

pub use controls::ControlsPlugin;
pub use panel::PanelPlugin;
pub use simulation::{SimulationPlugin, SimulationSet};
pub use visualization::VisualizationPlugin;
