//! Command line interface for Orrery

use clap::Parser;
use std::fmt;

use crate::config::SimulationConfig;
use crate::physics::math::Scalar;
use crate::plugins::visualization::DEFAULT_VIEWPORT;
use crate::render::{BatchLimits, BatchRenderer, MemoryDevice};
use crate::simulation::SimulationController;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// A command-line override is out of range
    InvalidOverride(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidOverride(msg) => write!(f, "Invalid override: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Orrery - toy solar system N-body simulation
#[derive(Parser, Debug, Default)]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"), about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Seconds of simulated time per step (overrides config file)
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub timestep: Option<f64>,

    /// Gravitational constant (overrides config file)
    #[arg(short = 'g', long, value_name = "VALUE")]
    pub gravity: Option<f64>,

    /// Seed for random body deletion
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// Start with trails enabled
    #[arg(long)]
    pub trails: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Run this many frames without a window, print a summary and exit
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u64>,
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        SimulationConfig::load(config_path).map_err(|e| CliError::ConfigLoad(e.to_string()))?
    } else {
        SimulationConfig::load_from_user_config()
    };

    if let Some(timestep) = args.timestep {
        if !timestep.is_finite() || timestep <= 0.0 {
            return Err(CliError::InvalidOverride(format!(
                "timestep must be a positive number of seconds, got {timestep}"
            )));
        }
        println!("Overriding timestep to: {timestep} s");
        config.physics.timestep_seconds = timestep;
    }

    if let Some(gravity) = args.gravity {
        if !gravity.is_finite() {
            return Err(CliError::InvalidOverride(format!(
                "gravitational constant must be finite, got {gravity}"
            )));
        }
        println!("Overriding gravitational constant to: {gravity}");
        config.physics.gravitational_constant = gravity;
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.physics.initial_seed = Some(seed);
    }

    if args.paused {
        config.physics.start_paused = true;
    }

    if args.trails {
        config.rendering.trails_enabled = true;
    }

    Ok(config)
}

/// What a headless run leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub steps: u64,
    pub simulated_days: Scalar,
    pub bodies: usize,
    pub draw_calls: usize,
}

impl fmt::Display for HeadlessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {} steps, {:.1} simulated days, {} bodies, {} draw calls",
            self.frames, self.steps, self.simulated_days, self.bodies, self.draw_calls
        )
    }
}

/// Drives the controller for `frames` frames against an in-memory device.
pub fn run_headless(
    config: &SimulationConfig,
    frames: u64,
) -> Result<HeadlessSummary, Box<dyn std::error::Error>> {
    let mut controller = SimulationController::new(&config.scenario, config);
    let mut device = MemoryDevice::new();
    let mut renderer = BatchRenderer::new(&mut device, BatchLimits::from(&config.rendering))?;

    // Nominal 60 Hz wall clock
    let wall_dt = 1.0 / 60.0;
    let mut draw_calls = 0;
    for _ in 0..frames {
        controller.frame(wall_dt, &mut renderer, &mut device, DEFAULT_VIEWPORT)?;
        draw_calls += device.take_draws().len();
    }
    renderer.destroy(&mut device);

    Ok(HeadlessSummary {
        frames,
        steps: controller.steps(),
        simulated_days: controller.simulated_seconds() / 86400.0,
        bodies: controller.bodies().len(),
        draw_calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "orrery",
            "--timestep",
            "3600",
            "--seed",
            "9",
            "--paused",
            "--headless",
            "5",
        ]);
        assert_eq!(args.timestep, Some(3600.0));
        assert_eq!(args.seed, Some(9));
        assert!(args.paused);
        assert!(!args.trails);
        assert_eq!(args.headless, Some(5));
    }

    #[test]
    fn test_missing_config_file_errors() {
        let args = Args {
            config: Some("/nonexistent/orrery-test.toml".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            load_and_apply_config(&args),
            Err(CliError::ConfigLoad(_))
        ));
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let path = std::env::temp_dir().join("orrery_cli_invalid_timestep.toml");
        std::fs::write(&path, "").unwrap();

        let args = Args {
            config: Some(path.to_string_lossy().into_owned()),
            timestep: Some(-1.0),
            ..Default::default()
        };
        let result = load_and_apply_config(&args);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(CliError::InvalidOverride(_))));
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join("orrery_cli_flags.toml");
        std::fs::write(&path, "[physics]\ntimestep_seconds = 60.0\n").unwrap();

        let args = Args {
            config: Some(path.to_string_lossy().into_owned()),
            gravity: Some(1.0e-10),
            paused: true,
            trails: true,
            ..Default::default()
        };
        let config = load_and_apply_config(&args).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.physics.timestep_seconds, 60.0);
        assert_eq!(config.physics.gravitational_constant, 1.0e-10);
        assert!(config.physics.start_paused);
        assert!(config.rendering.trails_enabled);
    }

    #[test]
    fn test_run_headless() {
        let mut config = SimulationConfig::default();
        config.physics.initial_seed = Some(1);

        let summary = run_headless(&config, 3).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.bodies, 10);
        assert!((summary.simulated_days - 3.0).abs() < 1e-9);
        assert_eq!(summary.draw_calls, 30);
    }

    #[test]
    fn test_headless_paused_takes_no_steps() {
        let mut config = SimulationConfig::default();
        config.physics.start_paused = true;

        let summary = run_headless(&config, 4).unwrap();
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.simulated_days, 0.0);
    }
}
