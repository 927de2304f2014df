//! Lighting volumes: global or box-shaped regions that carry a profile.
//!
//! A local volume has an *inner* footprint, where its profile applies fully,
//! and an *outer* footprint grown by `blend_distance` along each of its axes.
//! The shell between the two is the blend band. Footprints are computed once
//! at construction; later transform changes require building a new volume.

use std::sync::Arc;

use glam::Vec3;
use lumen_math::{OrientedBox, VolumeTransform};
use thiserror::Error;

use crate::curve::BlendCurve;
use crate::profile::LightingProfile;

/// Caller-assigned identity of a volume, typically the owning entity's id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(pub u64);

impl std::fmt::Display for VolumeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "volume#{}", self.0)
    }
}

/// Errors returned when validating a [`VolumeDesc`].
#[derive(Debug, Error, PartialEq)]
pub enum VolumeError {
    #[error("blend distance must be >= 0, got {0}")]
    NegativeBlendDistance(f32),

    #[error("time to blend must be > 0, got {0}")]
    NonPositiveBlendTime(f32),

    #[error("volume transform has a zero scale component")]
    DegenerateScale,

    #[error("{0} is not finite")]
    NonFinite(&'static str),
}

/// Where a point sits relative to a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Beyond the outer footprint; the volume has no influence.
    Outside,
    /// Between the inner and outer footprints.
    InBlendBand,
    /// Within the inner footprint (always, for global volumes).
    Inside,
}

/// Region description used to construct a volume.
#[derive(Clone, Debug, PartialEq)]
pub enum VolumeShape {
    /// Applies everywhere.
    Global,
    /// A box collider authored in the owner's local space.
    Local {
        transform: VolumeTransform,
        /// Collider center in unscaled local units.
        center: Vec3,
        /// Collider edge lengths in unscaled local units.
        size: Vec3,
    },
}

/// Authoring parameters for a volume.
#[derive(Clone, Debug)]
pub struct VolumeDesc {
    pub shape: VolumeShape,
    /// Higher wins. Exact ties go to the most recently registered volume.
    pub priority: f32,
    /// World-unit width of the blend band. Ignored for global volumes.
    pub blend_distance: f32,
    /// Seconds a timed transition into this volume's profile takes.
    pub time_to_blend: f32,
    pub curve: BlendCurve,
    /// Volumes without a profile are never selected.
    pub profile: Option<Arc<LightingProfile>>,
}

impl Default for VolumeDesc {
    fn default() -> Self {
        Self {
            shape: VolumeShape::Global,
            priority: 0.0,
            blend_distance: 0.0,
            time_to_blend: 1.0,
            curve: BlendCurve::Linear,
            profile: None,
        }
    }
}

impl VolumeDesc {
    pub fn global(profile: Arc<LightingProfile>) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn local(
        transform: VolumeTransform,
        center: Vec3,
        size: Vec3,
        profile: Arc<LightingProfile>,
    ) -> Self {
        Self {
            shape: VolumeShape::Local {
                transform,
                center,
                size,
            },
            profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_blend_distance(mut self, blend_distance: f32) -> Self {
        self.blend_distance = blend_distance;
        self
    }

    pub fn with_time_to_blend(mut self, seconds: f32) -> Self {
        self.time_to_blend = seconds;
        self
    }

    pub fn with_curve(mut self, curve: BlendCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError`] for negative blend distances, non-positive
    /// blend times, zero-scale transforms, or non-finite inputs.
    pub fn validate(&self) -> Result<(), VolumeError> {
        if !self.priority.is_finite() {
            return Err(VolumeError::NonFinite("priority"));
        }
        if !self.blend_distance.is_finite() {
            return Err(VolumeError::NonFinite("blend distance"));
        }
        if self.blend_distance < 0.0 {
            return Err(VolumeError::NegativeBlendDistance(self.blend_distance));
        }
        if !self.time_to_blend.is_finite() {
            return Err(VolumeError::NonFinite("time to blend"));
        }
        if self.time_to_blend <= 0.0 {
            return Err(VolumeError::NonPositiveBlendTime(self.time_to_blend));
        }
        if let VolumeShape::Local {
            transform,
            center,
            size,
        } = &self.shape
        {
            if !transform.is_finite() || !center.is_finite() || !size.is_finite() {
                return Err(VolumeError::NonFinite("volume transform"));
            }
            if transform.is_degenerate() {
                return Err(VolumeError::DegenerateScale);
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Footprint {
    Global,
    Local {
        inner: OrientedBox,
        outer: OrientedBox,
    },
}

/// A registered lighting volume.
#[derive(Clone, Debug)]
pub struct Volume {
    id: VolumeId,
    footprint: Footprint,
    priority: f32,
    blend_distance: f32,
    time_to_blend: f32,
    curve: BlendCurve,
    profile: Option<Arc<LightingProfile>>,
    /// Display weight, 0..=100.
    weight: f32,
}

impl Volume {
    /// Validate `desc` and compute the footprints.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError`] if `desc` fails [`VolumeDesc::validate`].
    pub fn new(id: VolumeId, desc: VolumeDesc) -> Result<Self, VolumeError> {
        desc.validate()?;

        let footprint = match desc.shape {
            VolumeShape::Global => Footprint::Global,
            VolumeShape::Local {
                transform,
                center,
                size,
            } => {
                let inner = OrientedBox::from_collider(&transform, center, size);
                // Growing the scaled box by the blend distance is the same as
                // growing the local collider by blend_distance / scale per axis.
                let outer = inner.expand_by(desc.blend_distance);
                Footprint::Local { inner, outer }
            }
        };

        Ok(Self {
            id,
            footprint,
            priority: desc.priority,
            blend_distance: desc.blend_distance,
            time_to_blend: desc.time_to_blend,
            curve: desc.curve,
            profile: desc.profile,
            weight: 0.0,
        })
    }

    pub fn id(&self) -> VolumeId {
        self.id
    }

    pub fn is_global(&self) -> bool {
        matches!(self.footprint, Footprint::Global)
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn blend_distance(&self) -> f32 {
        self.blend_distance
    }

    pub fn time_to_blend(&self) -> f32 {
        self.time_to_blend
    }

    pub fn curve(&self) -> &BlendCurve {
        &self.curve
    }

    pub fn profile(&self) -> Option<&Arc<LightingProfile>> {
        self.profile.as_ref()
    }

    /// Display weight in percent.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Set the display weight; clamped to `0..=100`.
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = if weight.is_finite() {
            weight.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    /// Inner footprint, `None` for global volumes.
    pub fn inner_footprint(&self) -> Option<&OrientedBox> {
        match &self.footprint {
            Footprint::Global => None,
            Footprint::Local { inner, .. } => Some(inner),
        }
    }

    /// Outer (blend) footprint, `None` for global volumes.
    pub fn outer_footprint(&self) -> Option<&OrientedBox> {
        match &self.footprint {
            Footprint::Global => None,
            Footprint::Local { outer, .. } => Some(outer),
        }
    }

    /// Classify a world point against this volume.
    pub fn placement(&self, point: Vec3) -> Placement {
        self.classify(point).0
    }

    /// Positional blend fraction in `[0, 1]`: 0 on the inner boundary
    /// (and inside), 1 on the outer boundary (and outside).
    ///
    /// Global volumes report 0. With a zero blend distance there is no band,
    /// so the fraction jumps straight from 0 to 1.
    pub fn blend_fraction(&self, point: Vec3) -> f32 {
        self.classify(point).1
    }

    /// Placement and blend fraction from a single pair of distance queries.
    pub fn classify(&self, point: Vec3) -> (Placement, f32) {
        let Footprint::Local { inner, outer } = &self.footprint else {
            return (Placement::Inside, 0.0);
        };

        let d_inner = inner.distance(point);
        if d_inner == 0.0 {
            return (Placement::Inside, 0.0);
        }
        if self.blend_distance <= 0.0 {
            return (Placement::Outside, 1.0);
        }
        if outer.distance(point) == 0.0 {
            // Corner regions of the outer box lie farther than blend_distance.
            let fraction = (d_inner / self.blend_distance).clamp(0.0, 1.0);
            return (Placement::InBlendBand, fraction);
        }
        (Placement::Outside, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn profile() -> Arc<LightingProfile> {
        Arc::new(LightingProfile::named("v"))
    }

    /// Unit-half-size cube at the origin (size 2) with the given blend distance.
    fn cube(blend: f32) -> Volume {
        Volume::new(
            VolumeId(1),
            VolumeDesc::local(VolumeTransform::IDENTITY, Vec3::ZERO, Vec3::splat(2.0), profile())
                .with_blend_distance(blend),
        )
        .unwrap()
    }

    #[test]
    fn test_global_always_inside() {
        let v = Volume::new(VolumeId(0), VolumeDesc::global(profile())).unwrap();
        assert!(v.is_global());
        assert_eq!(v.placement(Vec3::splat(1.0e6)), Placement::Inside);
        assert_eq!(v.blend_fraction(Vec3::ZERO), 0.0);
        assert!(v.inner_footprint().is_none());
    }

    #[test]
    fn test_local_placements() {
        let v = cube(2.0);
        assert_eq!(v.placement(Vec3::ZERO), Placement::Inside);
        assert_eq!(v.placement(Vec3::new(1.0, 0.0, 0.0)), Placement::Inside);
        assert_eq!(v.placement(Vec3::new(2.0, 0.0, 0.0)), Placement::InBlendBand);
        assert_eq!(v.placement(Vec3::new(3.0, 0.0, 0.0)), Placement::InBlendBand);
        assert_eq!(v.placement(Vec3::new(3.01, 0.0, 0.0)), Placement::Outside);
    }

    #[test]
    fn test_blend_fraction_boundaries() {
        let v = cube(2.0);
        assert_eq!(v.blend_fraction(Vec3::new(1.0, 0.0, 0.0)), 0.0);
        assert!((v.blend_fraction(Vec3::new(2.0, 0.0, 0.0)) - 0.5).abs() < 1e-6);
        assert!((v.blend_fraction(Vec3::new(3.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_blend_fraction_monotonic_across_band() {
        let v = cube(2.0);
        let mut prev = 0.0;
        for i in 0..=50 {
            let x = 1.0 + 2.0 * i as f32 / 50.0;
            let f = v.blend_fraction(Vec3::new(x, 0.2, -0.3));
            assert!(f >= prev, "fraction decreased at x={x}: {f} < {prev}");
            prev = f;
        }
        assert!((prev - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_corner_fraction_is_clamped() {
        let v = cube(2.0);
        let corner = Vec3::splat(2.9);
        assert_eq!(v.placement(corner), Placement::InBlendBand);
        assert_eq!(v.blend_fraction(corner), 1.0);
    }

    #[test]
    fn test_zero_blend_distance_has_no_band() {
        let v = cube(0.0);
        for x in [1.0001, 1.5, 2.0, 10.0] {
            assert_eq!(v.placement(Vec3::new(x, 0.0, 0.0)), Placement::Outside);
        }
        assert_eq!(v.placement(Vec3::new(0.99, 0.0, 0.0)), Placement::Inside);
    }

    #[test]
    fn test_outer_contains_inner_under_scale_and_rotation() {
        let transform = VolumeTransform::new(
            Vec3::new(5.0, 1.0, -2.0),
            Quat::from_rotation_y(0.6),
            Vec3::new(3.0, 0.5, 2.0),
        );
        let v = Volume::new(
            VolumeId(2),
            VolumeDesc::local(transform, Vec3::new(0.2, 0.0, 0.0), Vec3::ONE, profile())
                .with_blend_distance(1.5),
        )
        .unwrap();
        let inner = v.inner_footprint().unwrap();
        let outer = v.outer_footprint().unwrap();
        assert!(outer.contains_box(inner, 1e-4));
        let grown = outer.half_extents - inner.half_extents;
        assert!((grown - Vec3::splat(1.5)).length() < 1e-5);
    }

    #[test]
    fn test_footprint_is_static_after_construction() {
        let mut desc = VolumeDesc::local(
            VolumeTransform::IDENTITY,
            Vec3::ZERO,
            Vec3::splat(2.0),
            profile(),
        );
        let v = Volume::new(VolumeId(3), desc.clone()).unwrap();
        let before = *v.inner_footprint().unwrap();
        if let VolumeShape::Local { transform, .. } = &mut desc.shape {
            transform.scale = Vec3::splat(10.0);
        }
        assert_eq!(*v.inner_footprint().unwrap(), before);
    }

    #[test]
    fn test_validation_errors() {
        let p = profile();
        let err = Volume::new(VolumeId(4), VolumeDesc::global(p.clone()).with_blend_distance(-1.0));
        assert_eq!(err.unwrap_err(), VolumeError::NegativeBlendDistance(-1.0));

        let err = Volume::new(VolumeId(4), VolumeDesc::global(p.clone()).with_time_to_blend(0.0));
        assert_eq!(err.unwrap_err(), VolumeError::NonPositiveBlendTime(0.0));

        let err = Volume::new(VolumeId(4), VolumeDesc::global(p.clone()).with_priority(f32::NAN));
        assert_eq!(err.unwrap_err(), VolumeError::NonFinite("priority"));

        let flat = VolumeTransform::IDENTITY.with_scale(Vec3::new(1.0, 0.0, 1.0));
        let err = Volume::new(VolumeId(4), VolumeDesc::local(flat, Vec3::ZERO, Vec3::ONE, p));
        assert_eq!(err.unwrap_err(), VolumeError::DegenerateScale);
    }

    #[test]
    fn test_missing_profile_is_valid() {
        let v = Volume::new(VolumeId(5), VolumeDesc::default()).unwrap();
        assert!(v.profile().is_none());
    }

    #[test]
    fn test_weight_is_clamped() {
        let mut v = cube(1.0);
        v.set_weight(150.0);
        assert_eq!(v.weight(), 100.0);
        v.set_weight(-3.0);
        assert_eq!(v.weight(), 0.0);
        v.set_weight(f32::NAN);
        assert_eq!(v.weight(), 0.0);
    }
}
