//! Lighting profiles: the bundle of environment-lighting parameters that
//! volumes carry and layers blend between.
//!
//! A [`LightingProfile`] holds continuous terms (colors, intensities,
//! distances) that are linearly interpolated, and discrete terms (modes,
//! asset handles, counts) that switch to the target's value. Which groups a
//! blend touches is selected by [`BlendCategories`].

use glam::Vec4;

/// Opaque reference to a skybox material owned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SkyboxHandle(pub u32);

/// Opaque reference to a reflection cubemap owned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubemapHandle(pub u32);

/// Source of ambient (environment) lighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AmbientMode {
    /// Ambient is derived from the skybox.
    #[default]
    Skybox,
    /// Three-color sky/equator/ground gradient.
    Gradient,
    /// Single flat color (the sky color).
    Color,
}

/// Source of the default environment reflection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReflectionMode {
    /// Reflections are baked from the skybox.
    #[default]
    Skybox,
    /// Reflections use [`LightingProfile::custom_reflection`].
    Custom,
}

/// Distance fog falloff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FogMode {
    /// Linear between start and end distance.
    #[default]
    Linear,
    /// `exp(-density * d)`.
    Exponential,
    /// `exp(-(density * d)^2)`.
    ExponentialSquared,
}

/// Edge length of the default reflection cubemap, a power of two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReflectionResolution {
    R16,
    R32,
    R64,
    R128,
    #[default]
    R256,
    R512,
    R1024,
    R2048,
    R4096,
}

impl ReflectionResolution {
    /// Every resolution, smallest first.
    pub const ALL: [ReflectionResolution; 9] = [
        Self::R16,
        Self::R32,
        Self::R64,
        Self::R128,
        Self::R256,
        Self::R512,
        Self::R1024,
        Self::R2048,
        Self::R4096,
    ];

    /// Edge length in pixels.
    pub fn pixels(self) -> u32 {
        16 << (self as u32)
    }

    /// Nearest resolution to an arbitrary pixel size, clamped to 16..=4096.
    ///
    /// Ties round up (e.g. 48 maps to 64).
    pub fn from_pixels(pixels: u32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .min_by_key(|r| {
                let d = r.pixels().abs_diff(pixels);
                // Prefer the larger option on ties.
                (d, u32::MAX - r.pixels())
            })
            .unwrap_or_default()
    }
}

/// Per-category switches for blending. Disabled categories are left
/// untouched in the destination buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlendCategories {
    /// Switch the skybox handle to the target's.
    pub skybox: bool,
    /// Ambient mode, colors and intensity.
    pub environment_lighting: bool,
    /// Reflection mode, cubemap, resolution, bounces and intensity.
    pub environment_reflections: bool,
    /// Subtractive shadow tint.
    pub mixed_lighting: bool,
    /// Fog enable, mode, color, density and distances.
    pub fog: bool,
    /// Flare fade speed, flare strength and halo strength.
    pub halo: bool,
}

impl Default for BlendCategories {
    fn default() -> Self {
        Self::all()
    }
}

impl BlendCategories {
    /// Every category enabled.
    pub const fn all() -> Self {
        Self {
            skybox: true,
            environment_lighting: true,
            environment_reflections: true,
            mixed_lighting: true,
            fog: true,
            halo: true,
        }
    }

    /// Every category disabled.
    pub const fn none() -> Self {
        Self {
            skybox: false,
            environment_lighting: false,
            environment_reflections: false,
            mixed_lighting: false,
            fog: false,
            halo: false,
        }
    }
}

/// A complete set of environment-lighting parameters.
///
/// Colors are linear RGBA.
#[derive(Clone, Debug, PartialEq)]
pub struct LightingProfile {
    /// Display name, used in status reporting and logs.
    pub name: String,

    pub skybox: Option<SkyboxHandle>,

    pub ambient_mode: AmbientMode,
    pub ambient_sky_color: Vec4,
    pub ambient_equator_color: Vec4,
    pub ambient_ground_color: Vec4,
    pub ambient_intensity: f32,

    pub reflection_mode: ReflectionMode,
    pub reflection_bounces: u32,
    pub reflection_intensity: f32,
    pub custom_reflection: Option<CubemapHandle>,
    pub reflection_resolution: ReflectionResolution,

    /// Shadow color used by subtractive mixed lighting.
    pub shadow_tint: Vec4,

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

impl Default for LightingProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            skybox: None,
            ambient_mode: AmbientMode::Skybox,
            ambient_sky_color: Vec4::new(0.212, 0.227, 0.259, 1.0),
            ambient_equator_color: Vec4::new(0.114, 0.125, 0.133, 1.0),
            ambient_ground_color: Vec4::new(0.047, 0.043, 0.035, 1.0),
            ambient_intensity: 1.0,
            reflection_mode: ReflectionMode::Skybox,
            reflection_bounces: 1,
            reflection_intensity: 1.0,
            custom_reflection: None,
            reflection_resolution: ReflectionResolution::R256,
            shadow_tint: Vec4::new(0.42, 0.478, 0.627, 1.0),
            fog_enabled: false,
            fog_mode: FogMode::ExponentialSquared,
            fog_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            fog_density: 0.01,
            fog_start_distance: 0.0,
            fog_end_distance: 300.0,
            flare_fade_speed: 3.0,
            flare_strength: 1.0,
            halo_strength: 0.5,
        }
    }
}

/// Linear interpolation, exact at both endpoints. `t` is not clamped.
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Per-channel color interpolation, exact at both endpoints. `t` is not clamped.
pub(crate) fn lerp_color(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a * (1.0 - t) + b * t
}

impl LightingProfile {
    /// Default parameters under a given display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Blend `current` toward `target` by `fraction` and write the result
    /// into `self`.
    ///
    /// Only categories enabled in `categories` are written; everything else
    /// keeps the value `self` already had. `fraction` outside `[0, 1]`
    /// extrapolates continuous terms. The name is never written.
    pub fn lerp_from(
        &mut self,
        current: &LightingProfile,
        target: &LightingProfile,
        fraction: f32,
        categories: BlendCategories,
    ) {
        if categories.skybox {
            self.set_skybox(target);
        }
        if categories.environment_lighting {
            self.set_environment_lighting(current, target, fraction);
        }
        if categories.environment_reflections {
            self.set_environment_reflections(current, target, fraction);
        }
        if categories.fog {
            self.set_fog(current, target, fraction);
        }
        if categories.halo {
            self.set_halo(current, target, fraction);
        }
        if categories.mixed_lighting {
            self.set_mixed_lighting(current, target, fraction);
        }
    }

    /// Pure form of [`lerp_from`](Self::lerp_from): disabled categories
    /// come from `current`, and the result carries `current`'s name.
    pub fn interpolate(
        current: &LightingProfile,
        target: &LightingProfile,
        fraction: f32,
        categories: BlendCategories,
    ) -> LightingProfile {
        let mut out = current.clone();
        out.lerp_from(current, target, fraction, categories);
        out
    }

    fn set_skybox(&mut self, target: &LightingProfile) {
        if self.skybox != target.skybox {
            tracing::debug!(from = ?self.skybox, to = ?target.skybox, "switching skybox");
            self.skybox = target.skybox;
        }
    }

    fn set_environment_lighting(&mut self, current: &LightingProfile, target: &LightingProfile, t: f32) {
        if self.ambient_mode != target.ambient_mode {
            tracing::debug!(from = ?self.ambient_mode, to = ?target.ambient_mode, "switching ambient source");
            self.ambient_mode = target.ambient_mode;
        }

        self.ambient_sky_color = lerp_color(current.ambient_sky_color, target.ambient_sky_color, t);
        self.ambient_equator_color =
            lerp_color(current.ambient_equator_color, target.ambient_equator_color, t);
        self.ambient_ground_color =
            lerp_color(current.ambient_ground_color, target.ambient_ground_color, t);
        self.ambient_intensity = lerp(current.ambient_intensity, target.ambient_intensity, t);
    }

    fn set_environment_reflections(
        &mut self,
        current: &LightingProfile,
        target: &LightingProfile,
        t: f32,
    ) {
        self.custom_reflection = target.custom_reflection;
        self.reflection_mode = target.reflection_mode;
        self.reflection_resolution = target.reflection_resolution;
        self.reflection_bounces = target.reflection_bounces;

        self.reflection_intensity = lerp(current.reflection_intensity, target.reflection_intensity, t);
    }

    // Fog visibility follows the target directly; it is not OR-ed with the
    // source, so a blend into a fogless profile turns fog off immediately.
    fn set_fog(&mut self, current: &LightingProfile, target: &LightingProfile, t: f32) {
        self.fog_enabled = target.fog_enabled;
        self.fog_mode = target.fog_mode;
        self.fog_color = lerp_color(current.fog_color, target.fog_color, t);
        self.fog_density = lerp(current.fog_density, target.fog_density, t);
        self.fog_start_distance = lerp(current.fog_start_distance, target.fog_start_distance, t);
        self.fog_end_distance = lerp(current.fog_end_distance, target.fog_end_distance, t);
    }

    fn set_mixed_lighting(&mut self, current: &LightingProfile, target: &LightingProfile, t: f32) {
        self.shadow_tint = lerp_color(current.shadow_tint, target.shadow_tint, t);
    }

    fn set_halo(&mut self, current: &LightingProfile, target: &LightingProfile, t: f32) {
        self.flare_fade_speed = lerp(current.flare_fade_speed, target.flare_fade_speed, t);
        self.flare_strength = lerp(current.flare_strength, target.flare_strength, t);
        self.halo_strength = lerp(current.halo_strength, target.halo_strength, t);
    }
}
