//! Engine-facing render settings and the capture/apply bridge.
//!
//! [`RenderSettings`] mirrors the global environment state a renderer
//! exposes. Profiles are captured from it once (the initial snapshot) and
//! applied to it every time the layer emits a new blend.

use glam::Vec4;

use crate::profile::{
    AmbientMode, CubemapHandle, FogMode, LightingProfile, ReflectionMode, ReflectionResolution,
    SkyboxHandle,
};

/// The renderer's active global lighting state.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub skybox: Option<SkyboxHandle>,
    pub ambient_mode: AmbientMode,
    pub ambient_sky_color: Vec4,
    pub ambient_equator_color: Vec4,
    pub ambient_ground_color: Vec4,
    pub ambient_intensity: f32,
    pub default_reflection_mode: ReflectionMode,
    /// Edge length of the default reflection cubemap in pixels.
    pub default_reflection_resolution: u32,
    pub reflection_bounces: u32,
    pub reflection_intensity: f32,
    pub custom_reflection: Option<CubemapHandle>,
    pub subtractive_shadow_color: Vec4,
    pub fog: bool,
    pub fog_mode: FogMode,
    pub fog_color: Vec4,
    pub fog_density: f32,
    pub fog_start_distance: f32,
    pub fog_end_distance: f32,
    pub flare_fade_speed: f32,
    pub flare_strength: f32,
    pub halo_strength: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let mut settings = Self::blank();
        LightingProfile::default().apply(&mut settings);
        settings
    }
}

impl RenderSettings {
    fn blank() -> Self {
        Self {
            skybox: None,
            ambient_mode: AmbientMode::Skybox,
            ambient_sky_color: Vec4::ZERO,
            ambient_equator_color: Vec4::ZERO,
            ambient_ground_color: Vec4::ZERO,
            ambient_intensity: 0.0,
            default_reflection_mode: ReflectionMode::Skybox,
            default_reflection_resolution: 0,
            reflection_bounces: 0,
            reflection_intensity: 0.0,
            custom_reflection: None,
            subtractive_shadow_color: Vec4::ZERO,
            fog: false,
            fog_mode: FogMode::Linear,
            fog_color: Vec4::ZERO,
            fog_density: 0.0,
            fog_start_distance: 0.0,
            fog_end_distance: 0.0,
            flare_fade_speed: 0.0,
            flare_strength: 0.0,
            halo_strength: 0.0,
        }
    }
}

impl LightingProfile {
    /// Snapshot the renderer's current state into a new profile.
    pub fn capture(settings: &RenderSettings, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skybox: settings.skybox,
            ambient_mode: settings.ambient_mode,
            ambient_sky_color: settings.ambient_sky_color,
            ambient_equator_color: settings.ambient_equator_color,
            ambient_ground_color: settings.ambient_ground_color,
            ambient_intensity: settings.ambient_intensity,
            reflection_mode: settings.default_reflection_mode,
            reflection_bounces: settings.reflection_bounces,
            reflection_intensity: settings.reflection_intensity,
            custom_reflection: settings.custom_reflection,
            reflection_resolution: ReflectionResolution::from_pixels(
                settings.default_reflection_resolution,
            ),
            shadow_tint: settings.subtractive_shadow_color,
            fog_enabled: settings.fog,
            fog_mode: settings.fog_mode,
            fog_color: settings.fog_color,
            fog_density: settings.fog_density,
            fog_start_distance: settings.fog_start_distance,
            fog_end_distance: settings.fog_end_distance,
            flare_fade_speed: settings.flare_fade_speed,
            flare_strength: settings.flare_strength,
            halo_strength: settings.halo_strength,
        }
    }

    /// Write every field of this profile into the renderer state.
    pub fn apply(&self, settings: &mut RenderSettings) {
        settings.skybox = self.skybox;
        settings.ambient_mode = self.ambient_mode;
        settings.ambient_sky_color = self.ambient_sky_color;
        settings.ambient_equator_color = self.ambient_equator_color;
        settings.ambient_ground_color = self.ambient_ground_color;
        settings.ambient_intensity = self.ambient_intensity;
        settings.default_reflection_mode = self.reflection_mode;
        settings.default_reflection_resolution = self.reflection_resolution.pixels();
        settings.reflection_bounces = self.reflection_bounces;
        settings.reflection_intensity = self.reflection_intensity;
        settings.custom_reflection = self.custom_reflection;
        settings.subtractive_shadow_color = self.shadow_tint;
        settings.fog = self.fog_enabled;
        settings.fog_mode = self.fog_mode;
        settings.fog_color = self.fog_color;
        settings.fog_density = self.fog_density;
        settings.fog_start_distance = self.fog_start_distance;
        settings.fog_end_distance = self.fog_end_distance;
        settings.flare_fade_speed = self.flare_fade_speed;
        settings.flare_strength = self.flare_strength;
        settings.halo_strength = self.halo_strength;
    }
}
