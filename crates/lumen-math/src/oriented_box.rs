use glam::{Quat, Vec3};

use crate::VolumeTransform;

/// Oriented box in world space.
///
/// Invariant: every component of `half_extents` is >= 0.
/// The constructor enforces this by taking absolute values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    pub center: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
}

impl OrientedBox {
    /// Create a box from a world center, rotation and half-extents.
    pub fn new(center: Vec3, rotation: Quat, half_extents: Vec3) -> Self {
        Self {
            center,
            rotation: rotation.normalize(),
            half_extents: half_extents.abs(),
        }
    }

    /// Create an unrotated box from a center point and half-extents.
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center, Quat::IDENTITY, half_extents)
    }

    /// World-space box of a box collider authored in the object's local space.
    ///
    /// `local_center` and `local_size` are in unscaled local units; the
    /// resulting half-extents are `|local_size * scale| / 2`.
    pub fn from_collider(transform: &VolumeTransform, local_center: Vec3, local_size: Vec3) -> Self {
        Self::new(
            transform.transform_point(local_center),
            transform.rotation,
            (local_size * transform.scale) * 0.5,
        )
    }

    /// Express a world point in the box's local (unrotated, centered) frame.
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.center)
    }

    /// Closest point on or inside the box to `point`. Returns `point` itself
    /// when it lies inside.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let local = self.to_local(point);
        let clamped = local.clamp(-self.half_extents, self.half_extents);
        self.center + self.rotation * clamped
    }

    /// Euclidean distance from `point` to the box. Exactly 0.0 inside or on
    /// the boundary.
    pub fn distance(&self, point: Vec3) -> f32 {
        let local = self.to_local(point);
        (local.abs() - self.half_extents).max(Vec3::ZERO).length()
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.distance(point) == 0.0
    }

    /// Returns a new box grown by `margin` on each of its six faces,
    /// measured in world units along the box's own axes.
    pub fn expand_by(&self, margin: f32) -> OrientedBox {
        Self::new(
            self.center,
            self.rotation,
            self.half_extents + Vec3::splat(margin.max(0.0)),
        )
    }

    /// Full edge lengths along the box's local axes.
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// The eight world-space corners.
    pub fn corners(&self) -> [Vec3; 8] {
        let h = self.half_extents;
        let mut out = [Vec3::ZERO; 8];
        for (i, corner) in out.iter_mut().enumerate() {
            let sign = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            *corner = self.center + self.rotation * (sign * h);
        }
        out
    }

    /// Returns true if every corner of `other` lies within this box, allowing
    /// `tolerance` world units of floating-point slack.
    pub fn contains_box(&self, other: &OrientedBox, tolerance: f32) -> bool {
        other
            .corners()
            .iter()
            .all(|&c| self.distance(c) <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> OrientedBox {
        OrientedBox::axis_aligned(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_contains_point_inside() {
        assert!(unit_box().contains_point(Vec3::new(0.5, -0.5, 0.9)));
    }

    #[test]
    fn test_contains_point_on_face() {
        assert!(unit_box().contains_point(Vec3::new(1.0, 0.0, 0.0)));
        assert!(unit_box().contains_point(Vec3::new(-1.0, -1.0, -1.0)));
    }

    #[test]
    fn test_contains_point_outside() {
        assert!(!unit_box().contains_point(Vec3::new(1.01, 0.0, 0.0)));
    }

    #[test]
    fn test_distance_along_axis() {
        let d = unit_box().distance(Vec3::new(3.0, 0.0, 0.0));
        assert!((d - 2.0).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_distance_to_corner_region() {
        let d = unit_box().distance(Vec3::new(2.0, 2.0, 0.0));
        assert!((d - 2.0_f32.sqrt()).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_closest_point_is_identity_inside() {
        let p = Vec3::new(0.25, 0.5, -0.75);
        assert_eq!(unit_box().closest_point(p), p);
    }

    #[test]
    fn test_closest_point_clamps_to_face() {
        let c = unit_box().closest_point(Vec3::new(5.0, 0.5, 0.0));
        assert!((c - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_rotated_box_distance() {
        // Long along local X, rotated 90 degrees about Y so it is long along world Z.
        let b = OrientedBox::new(
            Vec3::ZERO,
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(4.0, 1.0, 1.0),
        );
        assert!(b.contains_point(Vec3::new(0.0, 0.0, 3.5)));
        assert!(!b.contains_point(Vec3::new(3.5, 0.0, 0.0)));
        let d = b.distance(Vec3::new(3.0, 0.0, 0.0));
        assert!((d - 2.0).abs() < 1e-5, "got {d}");
    }

    #[test]
    fn test_from_collider_applies_non_uniform_scale() {
        let t = VolumeTransform::from_translation(Vec3::new(0.0, 10.0, 0.0))
            .with_scale(Vec3::new(2.0, 1.0, 3.0));
        let b = OrientedBox::from_collider(&t, Vec3::new(0.5, 0.0, 0.0), Vec3::ONE);
        assert!((b.center - Vec3::new(1.0, 10.0, 0.0)).length() < 1e-6);
        assert!((b.half_extents - Vec3::new(1.0, 0.5, 1.5)).length() < 1e-6);
    }

    #[test]
    fn test_negative_scale_yields_positive_extents() {
        let t = VolumeTransform::IDENTITY.with_scale(Vec3::new(-2.0, 1.0, 1.0));
        let b = OrientedBox::from_collider(&t, Vec3::ZERO, Vec3::ONE);
        assert!(b.half_extents.cmpge(Vec3::ZERO).all());
        assert!((b.half_extents.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_expand_by_contains_original() {
        let b = OrientedBox::new(
            Vec3::new(3.0, -1.0, 2.0),
            Quat::from_rotation_x(0.7),
            Vec3::new(1.0, 2.0, 0.5),
        );
        let outer = b.expand_by(1.5);
        assert!(outer.contains_box(&b, 1e-4));
        assert!(!b.contains_box(&outer, 1e-4));
    }

    #[test]
    fn test_expand_by_grows_each_axis_by_margin() {
        let outer = unit_box().expand_by(2.0);
        assert_eq!(outer.size(), Vec3::splat(6.0));
    }

    #[test]
    fn test_expand_by_zero_is_identity() {
        assert_eq!(unit_box().expand_by(0.0), unit_box());
    }

    #[test]
    fn test_distance_is_monotonic_moving_away() {
        let b = unit_box();
        let mut prev = 0.0;
        for i in 0..=40 {
            let p = Vec3::new(1.0 + i as f32 * 0.1, 0.3, 0.0);
            let d = b.distance(p);
            assert!(d >= prev, "distance decreased at step {i}: {d} < {prev}");
            prev = d;
        }
    }
}
