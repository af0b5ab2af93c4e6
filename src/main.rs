use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;
use orrery::cli::{self, Args};
use orrery::plugins::{ControlsPlugin, PanelPlugin, SimulationPlugin, VisualizationPlugin};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.print_config {
        return match config.to_toml() {
            Ok(toml) => {
                print!("{toml}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if let Some(frames) = args.headless {
        return match cli::run_headless(&config, frames) {
            Ok(summary) => {
                println!("{summary}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Orrery".to_string(),
                    resolution: WindowResolution::new(1280.0, 800.0),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                level: log_level,
                ..default()
            }),
    );

    app.add_plugins((
        SimulationPlugin::with_config(config),
        VisualizationPlugin,
        ControlsPlugin,
        PanelPlugin,
    ));

    app.run();
    ExitCode::SUCCESS
}
