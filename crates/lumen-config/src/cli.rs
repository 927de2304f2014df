//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Lighting-volume demo arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "lumen", about = "Walks a tracked object through blended lighting volumes")]
pub struct CliArgs {
    /// Blend every lighting category.
    #[arg(long)]
    pub blend_all: Option<bool>,

    /// Evaluate the layer once every N+1 ticks.
    #[arg(long)]
    pub frame_skip: Option<u32>,

    /// Re-scan volumes once every N evaluations.
    #[arg(long)]
    pub rescan_interval: Option<u32>,

    /// Walker speed in units per second.
    #[arg(long)]
    pub speed: Option<f32>,

    /// Simulated run time in seconds.
    #[arg(long)]
    pub duration: Option<f32>,

    /// Fixed tick rate in Hz.
    #[arg(long)]
    pub tick_rate: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(all) = args.blend_all {
            self.layer.blend_all = all;
        }
        if let Some(skip) = args.frame_skip {
            self.layer.frame_skip = skip;
        }
        if let Some(interval) = args.rescan_interval {
            self.layer.rescan_interval = interval;
        }
        if let Some(speed) = args.speed {
            self.demo.walker_speed = speed;
        }
        if let Some(duration) = args.duration {
            self.demo.duration_seconds = duration;
        }
        if let Some(rate) = args.tick_rate {
            self.demo.tick_rate = rate;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            frame_skip: Some(2),
            speed: Some(3.0),
            log_level: Some("debug".to_string()),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.layer.frame_skip, 2);
        assert_eq!(config.demo.walker_speed, 3.0);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.layer.rescan_interval, 1);
        assert_eq!(config.demo.tick_rate, 60);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "lumen",
            "--blend-all",
            "false",
            "--rescan-interval",
            "5",
            "--config",
            "/tmp/lumen",
        ]);
        assert_eq!(args.blend_all, Some(false));
        assert_eq!(args.rescan_interval, Some(5));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/lumen")));
        assert_eq!(args.duration, None);
    }
}
