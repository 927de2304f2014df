//! Tool configuration for the lighting-volume demo and its layers.
//!
//! Settings persist to disk as `config.ron`. Every section is
//! `#[serde(default)]`, so older or partial files keep loading; clap
//! arguments override selected fields after loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DemoConfig, LayerConfig, default_config_dir};
pub use error::ConfigError;
