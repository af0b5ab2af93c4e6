//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the [`SimulationController`] resource, applies queued
//! [`SimulationCommand`]s and advances the physics once per frame. Nothing here
//! needs a window or a renderer, so the plugin runs under `MinimalPlugins`.

use crate::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Keyboard and button handlers emit commands
    Input,
    /// Commands are applied to the controller
    Commands,
    /// One physics step plus trail recording
    Physics,
    /// The frame is drawn through the batch renderer
    Render,
    /// Panel text and button labels follow controller state
    UI,
}

pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
}

impl SimulationPlugin {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match config.to_toml() {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let controller = SimulationController::new(&config.scenario, &config);
        info!(
            "Simulating {} bodies with {} at {} s per step",
            controller.bodies().len(),
            controller.integrator_name(),
            controller.settings().timestep
        );

        app.insert_resource(config);
        app.insert_resource(controller);
        app.add_event::<SimulationCommand>();

        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Commands,
                SimulationSet::Physics,
                SimulationSet::Render,
                SimulationSet::UI,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                apply_simulation_commands.in_set(SimulationSet::Commands),
                (advance_simulation, record_trails)
                    .chain()
                    .in_set(SimulationSet::Physics),
            ),
        );
    }
}

fn apply_simulation_commands(
    mut commands: EventReader<SimulationCommand>,
    mut controller: ResMut<SimulationController>,
) {
    for command in commands.read() {
        controller.apply(*command);
    }
}

fn advance_simulation(time: Res<Time>, mut controller: ResMut<SimulationController>) {
    controller.advance(time.delta_secs_f64());
}

fn record_trails(mut controller: ResMut<SimulationController>) {
    controller.record_trails();
}
