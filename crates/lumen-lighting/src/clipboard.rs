//! Copy and paste of setting groups between profiles.
//!
//! Authoring tools copy one group of a profile (environment, mixed
//! lighting, or the fog/flare "other" group) and paste it onto another
//! profile without touching the remaining groups. Each group is a plain
//! value type; [`ProfileClipboard`] keeps the most recent copy of each.

use glam::Vec4;

use crate::profile::{
    AmbientMode, CubemapHandle, FogMode, LightingProfile, ReflectionMode, ReflectionResolution,
    SkyboxHandle,
};

/// Skybox, ambient and reflection terms.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentSettings {
    pub skybox: Option<SkyboxHandle>,
    pub ambient_mode: AmbientMode,
    pub ambient_sky_color: Vec4,
    pub ambient_equator_color: Vec4,
    pub ambient_ground_color: Vec4,
    pub ambient_intensity: f32,
    pub reflection_mode: ReflectionMode,
    pub reflection_resolution: ReflectionResolution,
    pub custom_reflection: Option<CubemapHandle>,
    pub reflection_intensity: f32,
    pub reflection_bounces: u32,
}

/// Mixed-lighting terms.
#[derive(Clone, Debug, PartialEq)]
pub struct MixedLightingSettings {
    pub shadow_tint: Vec4,
}

/// Fog, flare and halo terms.
#[derive(Clone, Debug, PartialEq)]
pub struct OtherSettings {
    pub fog_enabled: bool,
    pub fog_mode: FogMode,
    pub fog_color: Vec4,
    pub fog_density: f32,
    pub fog_start_distance: f32,
    pub fog_end_distance: f32,
    pub flare_fade_speed: f32,
    pub flare_strength: f32,
    pub halo_strength: f32,
}

impl LightingProfile {
    pub fn copy_environment_settings(&self) -> EnvironmentSettings {
        EnvironmentSettings {
            skybox: self.skybox,
            ambient_mode: self.ambient_mode,
            ambient_sky_color: self.ambient_sky_color,
            ambient_equator_color: self.ambient_equator_color,
            ambient_ground_color: self.ambient_ground_color,
            ambient_intensity: self.ambient_intensity,
            reflection_mode: self.reflection_mode,
            reflection_resolution: self.reflection_resolution,
            custom_reflection: self.custom_reflection,
            reflection_intensity: self.reflection_intensity,
            reflection_bounces: self.reflection_bounces,
        }
    }

    pub fn paste_environment_settings(&mut self, s: &EnvironmentSettings) {
        self.skybox = s.skybox;
        self.ambient_mode = s.ambient_mode;
        self.ambient_sky_color = s.ambient_sky_color;
        self.ambient_equator_color = s.ambient_equator_color;
        self.ambient_ground_color = s.ambient_ground_color;
        self.ambient_intensity = s.ambient_intensity;
        self.reflection_mode = s.reflection_mode;
        self.reflection_resolution = s.reflection_resolution;
        self.custom_reflection = s.custom_reflection;
        self.reflection_intensity = s.reflection_intensity;
        self.reflection_bounces = s.reflection_bounces;
    }

    pub fn copy_lighting_settings(&self) -> MixedLightingSettings {
        MixedLightingSettings {
            shadow_tint: self.shadow_tint,
        }
    }

    pub fn paste_lighting_settings(&mut self, s: &MixedLightingSettings) {
        self.shadow_tint = s.shadow_tint;
    }

    pub fn copy_other_settings(&self) -> OtherSettings {
        OtherSettings {
            fog_enabled: self.fog_enabled,
            fog_mode: self.fog_mode,
            fog_color: self.fog_color,
            fog_density: self.fog_density,
            fog_start_distance: self.fog_start_distance,
            fog_end_distance: self.fog_end_distance,
            flare_fade_speed: self.flare_fade_speed,
            flare_strength: self.flare_strength,
            halo_strength: self.halo_strength,
        }
    }

    pub fn paste_other_settings(&mut self, s: &OtherSettings) {
        self.fog_enabled = s.fog_enabled;
        self.fog_mode = s.fog_mode;
        self.fog_color = s.fog_color;
        self.fog_density = s.fog_density;
        self.fog_start_distance = s.fog_start_distance;
        self.fog_end_distance = s.fog_end_distance;
        self.flare_fade_speed = s.flare_fade_speed;
        self.flare_strength = s.flare_strength;
        self.halo_strength = s.halo_strength;
    }
}

/// Holds the last copied value of each setting group.
///
/// Owned by whoever drives the authoring workflow, so two editors never
/// share a clipboard by accident.
#[derive(Clone, Debug, Default)]
pub struct ProfileClipboard {
    environment: Option<EnvironmentSettings>,
    lighting: Option<MixedLightingSettings>,
    other: Option<OtherSettings>,
}

impl ProfileClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy_environment(&mut self, from: &LightingProfile) {
        self.environment = Some(from.copy_environment_settings());
    }

    /// Paste the copied environment group. Returns `false` (and leaves
    /// `onto` untouched) if nothing was copied yet.
    pub fn paste_environment(&self, onto: &mut LightingProfile) -> bool {
        match &self.environment {
            Some(s) => {
                onto.paste_environment_settings(s);
                true
            }
            None => false,
        }
    }

    pub fn copy_lighting(&mut self, from: &LightingProfile) {
        self.lighting = Some(from.copy_lighting_settings());
    }

    pub fn paste_lighting(&self, onto: &mut LightingProfile) -> bool {
        match &self.lighting {
            Some(s) => {
                onto.paste_lighting_settings(s);
                true
            }
            None => false,
        }
    }

    pub fn copy_other(&mut self, from: &LightingProfile) {
        self.other = Some(from.copy_other_settings());
    }

    pub fn paste_other(&self, onto: &mut LightingProfile) -> bool {
        match &self.other {
            Some(s) => {
                onto.paste_other_settings(s);
                true
            }
            None => false,
        }
    }

    /// Forget every copied group.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
