//! Lighting profiles, lighting volumes, and the layer that blends between
//! them as a tracked object moves through a scene.

pub mod clipboard;
mod curve;
mod layer;
mod profile;
mod registry;
mod render_settings;
mod volume;

pub use clipboard::{EnvironmentSettings, MixedLightingSettings, OtherSettings, ProfileClipboard};
pub use curve::{BlendCurve, CurveError, Keyframe, KeyframeCurve, smooth_step};
pub use layer::{BlendState, LayerSettings, LayerStatus, LightingLayer};
pub use profile::{
    AmbientMode, BlendCategories, CubemapHandle, FogMode, LightingProfile, ReflectionMode,
    ReflectionResolution, SkyboxHandle,
};
pub use registry::{LocalHit, PendingChanges, RegistryChange, RegistryError, VolumeRegistry};
pub use render_settings::RenderSettings;
pub use volume::{Placement, Volume, VolumeDesc, VolumeError, VolumeId, VolumeShape};
