use crate::physics::math::Scalar;
use crate::render::BatchLimits;
use crate::simulation::scenario::{ASTRONOMICAL_UNIT, Scenario};
use crate::utils::color::{Rgb, palette};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors raised while reading or writing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    /// A layered source (file or environment) could not be merged
    Source(::config::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid TOML: {e}"),
            ConfigError::Serialize(e) => write!(f, "could not serialize: {e}"),
            ConfigError::Source(e) => write!(f, "could not merge configuration sources: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::Source(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

impl From<::config::ConfigError> for ConfigError {
    fn from(e: ::config::ConfigError) -> Self {
        ConfigError::Source(e)
    }
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub rendering: RenderingConfig,
    pub camera: CameraConfig,
    pub ui: UiConfig,
    pub scenario: Scenario,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_constant: Scalar,
    /// Simulated seconds advanced per rendered frame
    pub timestep_seconds: Scalar,
    pub min_timestep_seconds: Scalar,
    pub min_force_distance: Scalar,
    /// Used to express distances in the settings panel
    pub astronomical_unit: Scalar,
    pub start_paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_seed: Option<u64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.6743e-11,
            timestep_seconds: 86400.0,
            min_timestep_seconds: 60.0,
            min_force_distance: 1.0,
            astronomical_unit: ASTRONOMICAL_UNIT,
            start_paused: false,
            initial_seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderingConfig {
    /// 400 px per astronomical unit
    pub meters_to_pixels: Scalar,
    pub polygon_sides: u32,
    pub trails_enabled: bool,
    pub trail_capacity: usize,
    pub max_shape_vertices: usize,
    pub max_shape_indices: usize,
    pub max_strip_vertices: usize,
    pub trail_color: Rgb,
    pub background_color: Rgb,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            meters_to_pixels: 2.67379679e-9,
            polygon_sides: 32,
            trails_enabled: false,
            trail_capacity: 65535,
            max_shape_vertices: 1024,
            max_shape_indices: 4096,
            max_strip_vertices: 65535,
            trail_color: palette::TRAIL_LINE,
            background_color: palette::BACKGROUND,
        }
    }
}

impl RenderingConfig {
    /// Caps trail length and polygon detail at what the batch buffers hold.
    ///
    /// Returns true when a value had to be lowered.
    pub fn clamp_to_batch_limits(&mut self) -> bool {
        let mut clamped = false;

        if self.trail_capacity > self.max_strip_vertices {
            warn!(
                "rendering.trail_capacity {} exceeds max_strip_vertices {}, clamping",
                self.trail_capacity, self.max_strip_vertices
            );
            self.trail_capacity = self.max_strip_vertices;
            clamped = true;
        }

        let max_sides = BatchLimits::from(&*self).max_polygon_sides();
        let max_sides = u32::try_from(max_sides).unwrap_or(u32::MAX);
        if self.polygon_sides > max_sides {
            warn!(
                "rendering.polygon_sides {} exceeds the batch limit of {}, clamping",
                self.polygon_sides, max_sides
            );
            self.polygon_sides = max_sides;
            clamped = true;
        }

        clamped
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Pixels per second
    pub pan_speed: f32,
    /// Zoom units per second
    pub zoom_speed: f32,
    /// Applied to both speeds while Shift is held
    pub fast_multiplier: f32,
    pub min_zoom: f32,
    pub default_zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pan_speed: 1000.0,
            zoom_speed: 10.0,
            fast_multiplier: 10.0,
            min_zoom: 0.5,
            default_zoom: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub panel_visible: bool,
    pub panel_width: f32,
    pub panel_margin: f32,
    pub font_size: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            panel_visible: false,
            panel_width: 460.0,
            panel_margin: 8.0,
            font_size: 12.0,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => {
                info!("Config file {} not found. Using defaults.", path);
                Self::default()
            }
            Err(e) => {
                warn!("Failed to parse config file {}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    /// Location of the per-user configuration file, if the platform has one
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "orrery")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Merge an optional TOML file with `ORRERY_*` environment overrides.
    ///
    /// Nested keys use a double underscore, so
    /// `ORRERY_PHYSICS__TIMESTEP_SECONDS=3600` sets `physics.timestep_seconds`.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("ORRERY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load the per-user configuration with environment overrides, or defaults
    pub fn load_from_user_config() -> Self {
        let path = Self::user_config_path();
        match Self::load_layered(path.as_deref()) {
            Ok(config) => {
                if let Some(path) = &path {
                    debug!("Loaded user configuration from {}", path.display());
                }
                config
            }
            Err(e) => {
                warn!("Failed to load user configuration: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("orrery-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_defaults_match_solar_system_constants() {
        let config = SimulationConfig::default();

        assert_eq!(config.physics.gravitational_constant, 6.6743e-11);
        assert_eq!(config.physics.timestep_seconds, 86400.0);
        assert_eq!(config.rendering.polygon_sides, 32);
        assert_eq!(config.rendering.max_shape_indices, 4 * config.rendering.max_shape_vertices);
        assert_eq!(config.scenario.bodies.len(), 10);
    }

    #[test]
    fn test_defaults_fit_batch_limits() {
        let mut rendering = RenderingConfig::default();
        assert!(!rendering.clamp_to_batch_limits());
        assert_eq!(rendering, RenderingConfig::default());
    }

    #[test]
    fn test_oversized_rendering_values_are_clamped() {
        let mut rendering = RenderingConfig {
            trail_capacity: 10,
            max_strip_vertices: 4,
            polygon_sides: 2000,
            ..Default::default()
        };

        assert!(rendering.clamp_to_batch_limits());
        assert_eq!(rendering.trail_capacity, 4);
        assert_eq!(rendering.polygon_sides, 1023);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = SimulationConfig::default();
        config.physics.initial_seed = Some(7);
        config.rendering.trails_enabled = true;

        let text = config.to_toml().unwrap();
        let parsed: SimulationConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let text = r#"
            [physics]
            timestep_seconds = 3600.0

            [camera]
            pan_speed = 250.0
        "#;

        let config: SimulationConfig = toml::from_str(text).unwrap();

        assert_eq!(config.physics.timestep_seconds, 3600.0);
        assert_eq!(config.physics.gravitational_constant, 6.6743e-11);
        assert_eq!(config.camera.pan_speed, 250.0);
        assert_eq!(config.camera.zoom_speed, 10.0);
        assert_eq!(config.rendering, RenderingConfig::default());
        assert_eq!(config.scenario.bodies.len(), 10);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = SimulationConfig::load_or_default("/nonexistent/orrery/config.toml");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = temp_path("broken.toml");
        std::fs::write(&path, "[physics\ntimestep_seconds = ").unwrap();

        let result = SimulationConfig::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.toml");
        let mut config = SimulationConfig::default();
        config.physics.min_force_distance = 10.0;

        config.save(&path).unwrap();
        let loaded = SimulationConfig::load(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_layered_file_source() {
        let path = temp_path("layered.toml");
        std::fs::write(&path, "[physics]\nmin_timestep_seconds = 120.0\n").unwrap();

        let result = SimulationConfig::load_layered(Some(&path));
        std::fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.physics.min_timestep_seconds, 120.0);
        assert_eq!(config.physics.timestep_seconds, 86400.0);
    }
}
