use glam::{Quat, Vec3};

/// Smallest absolute scale component considered non-degenerate.
pub const MIN_SCALE: f32 = 1e-6;

/// World transform of a volume's owning object at activation time.
///
/// `scale` is the lossy (world) scale and may be non-uniform or negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for VolumeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl VolumeTransform {
    /// Identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform from its components. The rotation is normalized.
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
            scale,
        }
    }

    /// Translation-only transform.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Builder-style scale override.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder-style rotation override. The rotation is normalized.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.normalize();
        self
    }

    /// Map a point from the object's local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * local)
    }

    /// Returns true if any scale component is (near) zero, which collapses
    /// the footprint onto a plane or line.
    pub fn is_degenerate(&self) -> bool {
        self.scale.abs().min_element() < MIN_SCALE
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}
