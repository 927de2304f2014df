//! Walks a tracked object through a sample lighting scene and logs how the
//! lighting layer blends between volumes.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p lumen-demo -- --speed 4 --duration 30` for a short walk,
//! and `RUST_LOG=lumen_lighting=debug` to see transitions start and finish.

mod scene;
mod tick_loop;
mod walker;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use lumen_config::{CliArgs, Config, default_config_dir};
use lumen_lighting::{LightingLayer, RenderSettings, VolumeError};
use tracing::{error, info, warn};

use crate::tick_loop::TickLoop;
use crate::walker::Walker;

/// Simulated render frame length; the tick loop slices it into fixed steps.
const RENDER_FRAME_TIME: f64 = 1.0 / 30.0;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        default_config_dir().unwrap_or_else(|e| {
            eprintln!("{e}, using ./lumen");
            PathBuf::from("lumen")
        })
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    lumen_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config_dir, config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Invalid scene volume: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_dir: &Path, mut config: Config, args: &CliArgs) -> Result<(), VolumeError> {
    let mut render = RenderSettings::default();
    let mut layer = LightingLayer::from_render_settings(&render, scene::layer_settings(&config.layer));

    let volumes = scene::build_volumes()?;
    if config.layer.show_debug_lines {
        scene::log_footprints(&volumes);
    }
    info!("Registering {} lighting volumes", volumes.len());
    for volume in volumes {
        layer.register(volume);
    }
    let mut dusk = Some(scene::dusk_volume()?);

    let demo = config.demo.clone();
    let duration = f64::from(demo.duration_seconds.max(0.0));
    let status_interval = f64::from(demo.status_interval_seconds.max(0.1));
    let mut walker = Walker::new(Vec3::new(0.0, 1.0, 0.0), demo.walker_speed, demo.walker_limit);
    let mut tick_loop = TickLoop::new(demo.tick_rate);
    let mut next_status = 0.0;

    info!(
        duration_s = duration,
        tick_rate = demo.tick_rate,
        speed = demo.walker_speed,
        "Starting lighting walk"
    );

    while tick_loop.total_sim_time() < duration {
        tick_loop.advance(RENDER_FRAME_TIME, |dt, sim_time| {
            if sim_time >= duration * 0.5
                && let Some(volume) = dusk.take()
            {
                info!("Dusk is falling");
                layer.register(volume);
            }

            walker.update(dt as f32);
            layer.evaluate_tick(walker.position(), dt as f32);
            layer.apply(&mut render);

            if sim_time >= next_status {
                next_status += status_interval;
                log_status(&layer, &render, walker.position());

                match config.reload(config_dir) {
                    Ok(Some(mut reloaded)) => {
                        reloaded.apply_cli_overrides(args);
                        layer.set_settings(scene::layer_settings(&reloaded.layer));
                        config = reloaded;
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Config reload failed: {e}"),
                }
            }
        });
    }

    info!(
        frames = tick_loop.frame_count(),
        ticks = tick_loop.update_count(),
        "Walk finished, restoring initial lighting"
    );
    layer.restore_initial(&mut render);
    Ok(())
}

fn log_status(layer: &LightingLayer, render: &RenderSettings, position: Vec3) {
    let status = layer.status();
    info!(
        x = format_args!("{:.2}", position.x),
        settled = %status.settled_profile,
        target = ?status.target_profile,
        blend = format_args!("{:.3}", status.blend),
        band = ?status.band_volume,
        inside = ?status.inside_volume,
        ambient = format_args!("{:.3}", render.ambient_intensity),
        fog = render.fog,
        "Lighting status"
    );
}
