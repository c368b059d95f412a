//! Configuration loading and typed config structures for the Pasture
//! simulation.
//!
//! The canonical configuration lives in `pasture-config.yaml` at the project
//! root. Every section and field is optional; anything missing falls back to
//! the defaults below, which reproduce the classic 1280x720 pasture.

use std::path::Path;

use pasture_agents::{GrazerConfig, PredatorConfig, ShepherdConfig};
use pasture_world::{FertilizerConfig, VegetationConfig};
use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `pasture-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Viewport, grid and population settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Vegetation growth rates.
    #[serde(default)]
    pub vegetation: VegetationConfig,

    /// Fertilizer deposit lifetime.
    #[serde(default)]
    pub fertilizer: FertilizerConfig,

    /// Grazer tunables.
    #[serde(default)]
    pub grazer: GrazerConfig,

    /// Predator tunables.
    #[serde(default)]
    pub predator: PredatorConfig,

    /// Shepherd tunables.
    #[serde(default)]
    pub shepherd: ShepherdConfig,

    /// Run loop bounds and pacing.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `PASTURE_SEED` overrides `world.seed` when set to a valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.world.apply_env_overrides();
        Ok(config)
    }
}

/// Viewport, grid and population settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Viewport width in pixels.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Viewport height in pixels.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Tile edge length in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,

    /// Tile columns left free around the grid.
    #[serde(default = "default_padding_x")]
    pub padding_x: u32,

    /// Tile rows left free around the grid.
    #[serde(default = "default_padding_y")]
    pub padding_y: u32,

    /// Random seed for reproducible runs.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grazers placed at world creation.
    #[serde(default = "default_starting_grazers")]
    pub starting_grazers: u32,
}

impl WorldConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PASTURE_SEED") {
            match val.trim().parse() {
                Ok(seed) => self.seed = seed,
                Err(_) => warn!(value = %val, "Ignoring PASTURE_SEED: not an unsigned integer"),
            }
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            tile_size: default_tile_size(),
            padding_x: default_padding_x(),
            padding_y: default_padding_y(),
            seed: default_seed(),
            starting_grazers: default_starting_grazers(),
        }
    }
}

/// Run loop bounds and pacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Simulated seconds per tick.
    #[serde(default = "default_tick_dt")]
    pub tick_dt: f32,

    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Wall-clock milliseconds between ticks (0 = as fast as possible).
    #[serde(default)]
    pub tick_interval_ms: u64,

    /// End the run once no grazer is left alive.
    #[serde(default)]
    pub stop_on_extinction: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            tick_dt: default_tick_dt(),
            max_ticks: 0,
            tick_interval_ms: 0,
            stop_on_extinction: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log a JSON world snapshot every N ticks (0 = never).
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_viewport_width() -> u32 {
    1280
}

const fn default_viewport_height() -> u32 {
    720
}

const fn default_tile_size() -> u32 {
    32
}

const fn default_padding_x() -> u32 {
    3
}

const fn default_padding_y() -> u32 {
    2
}

const fn default_seed() -> u64 {
    42
}

const fn default_starting_grazers() -> u32 {
    5
}

const fn default_tick_dt() -> f32 {
    1.0 / 60.0
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_snapshot_interval_ticks() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pasture_types::TileCoord;

    use super::*;

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  viewport_width: 640
  viewport_height: 480
  tile_size: 16
  padding_x: 2
  padding_y: 2
  seed: 7
  starting_grazers: 12
vegetation:
  normal_grow_rate: 0.02
fertilizer:
  max_duration: 4
grazer:
  satiation_count: 2
predator:
  den_tile: { x: 1, y: 1 }
shepherd:
  start_tile: { x: 3, y: 4 }
simulation:
  tick_dt: 0.1
  max_ticks: 500
  tick_interval_ms: 16
  stop_on_extinction: true
logging:
  level: debug
  snapshot_interval_ticks: 50
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.viewport_width, 640);
        assert_eq!(config.world.tile_size, 16);
        assert_eq!(config.world.starting_grazers, 12);
        assert!((config.vegetation.normal_grow_rate - 0.02).abs() < f32::EPSILON);
        assert!((config.vegetation.fertilised_grow_rate - 0.05).abs() < f32::EPSILON);
        assert!((config.fertilizer.max_duration - 4.0).abs() < f32::EPSILON);
        assert_eq!(config.grazer.satiation_count, 2);
        assert_eq!(config.predator.den_tile, TileCoord::new(1, 1));
        assert_eq!(config.shepherd.start_tile, TileCoord::new(3, 4));
        assert_eq!(config.simulation.max_ticks, 500);
        assert!(config.simulation.stop_on_extinction);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.snapshot_interval_ticks, 50);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = SimulationConfig::parse("simulation:\n  max_ticks: 9\n").unwrap();
        assert_eq!(config.simulation.max_ticks, 9);
        assert_eq!(config.world.viewport_width, 1280);
        assert_eq!(config.world.padding_x, 3);
        assert_eq!(config.grazer, GrazerConfig::default());
        assert_eq!(config.predator, PredatorConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("").unwrap();
        assert_eq!(config.world.starting_grazers, 5);
        assert!((config.simulation.tick_dt - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SimulationConfig::from_file(Path::new("/nonexistent/pasture-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = SimulationConfig::parse(include_str!("../../../pasture-config.yaml")).unwrap();
        assert_eq!(config.grazer, GrazerConfig::default());
        assert_eq!(config.predator, PredatorConfig::default());
        assert_eq!(config.world.starting_grazers, 5);
        assert_eq!(config.simulation.max_ticks, 36_000);
    }
}
