//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Blend layer behaviour.
    pub layer: LayerConfig,
    /// Demo walker and tick loop.
    pub demo: DemoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Lighting layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayerConfig {
    /// Blend every category regardless of the per-category flags below.
    pub blend_all: bool,
    pub blend_skybox: bool,
    pub blend_environment_lighting: bool,
    pub blend_environment_reflections: bool,
    pub blend_mixed_lighting: bool,
    pub blend_fog: bool,
    pub blend_halo: bool,
    /// Evaluate once every `frame_skip + 1` ticks.
    pub frame_skip: u32,
    /// Re-scan volumes once every this many evaluations.
    pub rescan_interval: u32,
    /// Log volume footprints at startup.
    pub show_debug_lines: bool,
}

/// Demo scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Walker speed along the x axis in units per second.
    pub walker_speed: f32,
    /// Walker turns around this far from its start position.
    pub walker_limit: f32,
    /// Simulated run time in seconds.
    pub duration_seconds: f32,
    /// Fixed tick rate (Hz).
    pub tick_rate: u32,
    /// Seconds between status log lines.
    pub status_interval_seconds: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            blend_all: true,
            blend_skybox: true,
            blend_environment_lighting: true,
            blend_environment_reflections: true,
            blend_mixed_lighting: true,
            blend_fog: true,
            blend_halo: true,
            frame_skip: 0,
            rescan_interval: 1,
            show_debug_lines: false,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            walker_speed: 1.0,
            walker_limit: 30.0,
            duration_seconds: 120.0,
            tick_rate: 60,
            status_interval_seconds: 1.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for this tool (`<config_dir>/lumen`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("lumen"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
