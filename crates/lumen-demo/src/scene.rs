//! Sample scene for the demo walk.
//!
//! Daylight covers everything. Walking toward -x the tracked object passes
//! through a cave with a crystal chamber inside it; toward +x it crosses a
//! rotated, stretched tunnel. A dusk global volume with higher priority is
//! registered halfway through the run.

use std::sync::Arc;

use glam::{Quat, Vec3, Vec4};
use lumen_config::LayerConfig;
use lumen_lighting::{
    AmbientMode, BlendCategories, BlendCurve, FogMode, LayerSettings, LightingProfile,
    ProfileClipboard, SkyboxHandle, Volume, VolumeDesc, VolumeError, VolumeId,
};
use lumen_math::VolumeTransform;

pub const DAY: VolumeId = VolumeId(1);
pub const CAVE: VolumeId = VolumeId(2);
pub const CRYSTAL: VolumeId = VolumeId(3);
pub const TUNNEL: VolumeId = VolumeId(4);
pub const DUSK: VolumeId = VolumeId(5);

fn day() -> LightingProfile {
    LightingProfile {
        skybox: Some(SkyboxHandle(1)),
        ambient_mode: AmbientMode::Gradient,
        ambient_sky_color: Vec4::new(0.55, 0.7, 0.95, 1.0),
        ambient_equator_color: Vec4::new(0.45, 0.5, 0.55, 1.0),
        ambient_ground_color: Vec4::new(0.2, 0.18, 0.15, 1.0),
        ambient_intensity: 1.2,
        halo_strength: 0.5,
        ..LightingProfile::named("day")
    }
}

fn cave() -> LightingProfile {
    LightingProfile {
        skybox: Some(SkyboxHandle(2)),
        ambient_mode: AmbientMode::Color,
        ambient_sky_color: Vec4::new(0.08, 0.07, 0.1, 1.0),
        ambient_intensity: 0.25,
        reflection_intensity: 0.3,
        shadow_tint: Vec4::new(0.1, 0.1, 0.15, 1.0),
        fog_enabled: true,
        fog_mode: FogMode::Exponential,
        fog_color: Vec4::new(0.05, 0.05, 0.06, 1.0),
        fog_density: 0.08,
        flare_strength: 0.0,
        ..LightingProfile::named("cave")
    }
}

fn dusk() -> LightingProfile {
    LightingProfile {
        skybox: Some(SkyboxHandle(3)),
        ambient_mode: AmbientMode::Gradient,
        ambient_sky_color: Vec4::new(0.9, 0.45, 0.25, 1.0),
        ambient_equator_color: Vec4::new(0.5, 0.3, 0.3, 1.0),
        ambient_ground_color: Vec4::new(0.12, 0.08, 0.08, 1.0),
        ambient_intensity: 0.7,
        fog_enabled: true,
        fog_mode: FogMode::Linear,
        fog_color: Vec4::new(0.6, 0.4, 0.35, 1.0),
        fog_start_distance: 20.0,
        fog_end_distance: 180.0,
        ..LightingProfile::named("dusk")
    }
}

/// Cave environment with a violet tint and strong halos.
fn crystal(clipboard: &mut ProfileClipboard, cave: &LightingProfile) -> LightingProfile {
    let mut profile = LightingProfile::named("crystal");
    clipboard.copy_environment(cave);
    clipboard.paste_environment(&mut profile);
    profile.ambient_sky_color = Vec4::new(0.45, 0.2, 0.8, 1.0);
    profile.ambient_intensity = 0.6;
    profile.halo_strength = 2.0;
    profile
}

/// Daylight environment with the cave's shadows and fog.
fn tunnel(clipboard: &mut ProfileClipboard, day: &LightingProfile, cave: &LightingProfile) -> LightingProfile {
    let mut profile = LightingProfile::named("tunnel");
    clipboard.copy_environment(day);
    clipboard.copy_lighting(cave);
    clipboard.copy_other(cave);
    clipboard.paste_environment(&mut profile);
    clipboard.paste_lighting(&mut profile);
    clipboard.paste_other(&mut profile);
    profile.ambient_intensity = 0.6;
    profile
}

/// Volumes present from the first tick.
pub fn build_volumes() -> Result<Vec<Volume>, VolumeError> {
    let mut clipboard = ProfileClipboard::new();
    let day = day();
    let cave = cave();
    let crystal = crystal(&mut clipboard, &cave);
    let tunnel = tunnel(&mut clipboard, &day, &cave);

    Ok(vec![
        Volume::new(
            DAY,
            VolumeDesc::global(Arc::new(day))
                .with_time_to_blend(2.0)
                .with_curve(BlendCurve::SmoothStep),
        )?,
        Volume::new(
            CAVE,
            VolumeDesc::local(
                VolumeTransform::from_translation(Vec3::new(-18.0, 2.0, 0.0)),
                Vec3::ZERO,
                Vec3::new(10.0, 6.0, 10.0),
                Arc::new(cave),
            )
            .with_priority(1.0)
            .with_blend_distance(4.0),
        )?,
        Volume::new(
            CRYSTAL,
            VolumeDesc::local(
                VolumeTransform::from_translation(Vec3::new(-20.0, 1.0, 0.0)),
                Vec3::ZERO,
                Vec3::splat(3.0),
                Arc::new(crystal),
            )
            .with_priority(3.0)
            .with_blend_distance(1.0),
        )?,
        Volume::new(
            TUNNEL,
            VolumeDesc::local(
                VolumeTransform::new(
                    Vec3::new(15.0, 1.0, 0.0),
                    Quat::from_rotation_y(30f32.to_radians()),
                    Vec3::new(3.0, 1.0, 1.0),
                ),
                Vec3::ZERO,
                Vec3::splat(4.0),
                Arc::new(tunnel),
            )
            .with_priority(2.0)
            .with_blend_distance(2.0),
        )?,
    ])
}

/// Higher-priority global volume that takes over from daylight.
pub fn dusk_volume() -> Result<Volume, VolumeError> {
    Volume::new(
        DUSK,
        VolumeDesc::global(Arc::new(dusk()))
            .with_priority(1.0)
            .with_time_to_blend(8.0)
            .with_curve(BlendCurve::ease_in_out()),
    )
}

pub fn layer_settings(config: &LayerConfig) -> LayerSettings {
    LayerSettings {
        blend_all: config.blend_all,
        categories: BlendCategories {
            skybox: config.blend_skybox,
            environment_lighting: config.blend_environment_lighting,
            environment_reflections: config.blend_environment_reflections,
            mixed_lighting: config.blend_mixed_lighting,
            fog: config.blend_fog,
            halo: config.blend_halo,
        },
        frame_skip: config.frame_skip,
        rescan_interval: config.rescan_interval,
    }
}

/// Log the inner and outer footprint of every local volume.
pub fn log_footprints(volumes: &[Volume]) {
    for volume in volumes {
        let (Some(inner), Some(outer)) = (volume.inner_footprint(), volume.outer_footprint()) else {
            tracing::debug!(id = %volume.id(), "global volume, no footprint");
            continue;
        };
        tracing::debug!(
            id = %volume.id(),
            center = ?inner.center,
            inner_size = ?inner.size(),
            outer_size = ?outer.size(),
            "volume footprint"
        );
        for corner in outer.corners() {
            tracing::trace!(id = %volume.id(), ?corner, "blend footprint corner");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_lighting::Placement;

    fn volume(volumes: &[Volume], id: VolumeId) -> &Volume {
        volumes.iter().find(|v| v.id() == id).unwrap()
    }

    #[test]
    fn test_scene_builds() {
        let volumes = build_volumes().unwrap();
        assert_eq!(volumes.len(), 4);
        assert!(volume(&volumes, DAY).is_global());
        assert!(dusk_volume().unwrap().priority() > volume(&volumes, DAY).priority());
    }

    #[test]
    fn test_walker_path_crosses_cave_band_and_crystal() {
        let volumes = build_volumes().unwrap();
        let cave = volume(&volumes, CAVE);
        assert_eq!(cave.placement(Vec3::new(-25.0, 1.0, 0.0)), Placement::InBlendBand);
        assert_eq!(cave.placement(Vec3::new(-16.0, 1.0, 0.0)), Placement::Inside);
        assert_eq!(cave.placement(Vec3::new(0.0, 1.0, 0.0)), Placement::Outside);

        let crystal = volume(&volumes, CRYSTAL);
        assert_eq!(crystal.placement(Vec3::new(-20.0, 1.0, 0.0)), Placement::Inside);
    }

    #[test]
    fn test_walker_path_crosses_tunnel() {
        let volumes = build_volumes().unwrap();
        let tunnel = volume(&volumes, TUNNEL);
        assert_eq!(tunnel.placement(Vec3::new(15.0, 1.0, 0.0)), Placement::Inside);
        assert_eq!(tunnel.placement(Vec3::new(29.0, 1.0, 0.0)), Placement::Outside);
    }

    #[test]
    fn test_crystal_shares_cave_environment() {
        let volumes = build_volumes().unwrap();
        let crystal = volume(&volumes, CRYSTAL).profile().unwrap();
        let cave = volume(&volumes, CAVE).profile().unwrap();
        assert_eq!(crystal.ambient_mode, cave.ambient_mode);
        assert_eq!(crystal.skybox, cave.skybox);
        assert_ne!(crystal.ambient_sky_color, cave.ambient_sky_color);
    }

    #[test]
    fn test_tunnel_mixes_day_and_cave() {
        let volumes = build_volumes().unwrap();
        let tunnel = volume(&volumes, TUNNEL).profile().unwrap();
        assert_eq!(tunnel.skybox, Some(SkyboxHandle(1)));
        assert_eq!(tunnel.shadow_tint, cave().shadow_tint);
        assert_eq!(tunnel.fog_density, cave().fog_density);
    }

    #[test]
    fn test_layer_settings_maps_flags() {
        let config = LayerConfig {
            blend_all: false,
            blend_fog: false,
            frame_skip: 2,
            rescan_interval: 4,
            ..LayerConfig::default()
        };
        let settings = layer_settings(&config);
        assert!(!settings.blend_all);
        assert!(!settings.categories.fog);
        assert!(settings.categories.skybox);
        assert_eq!(settings.frame_skip, 2);
        assert_eq!(settings.rescan_interval, 4);
    }
}
