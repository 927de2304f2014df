//! Volume registry: the live set of volumes one layer evaluates against,
//! plus a deferred change queue for mutations requested mid-tick.

use glam::Vec3;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::volume::{Placement, Volume, VolumeId};

/// Errors returned by registry mutations.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// A volume with this id is already registered.
    #[error("{0} is already registered")]
    AlreadyRegistered(VolumeId),
}

/// A local volume that influences a queried point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalHit {
    pub id: VolumeId,
    pub priority: f32,
    /// Never [`Placement::Outside`].
    pub placement: Placement,
    /// Positional blend fraction, see [`Volume::blend_fraction`].
    pub fraction: f32,
}

struct Entry {
    volume: Volume,
    /// Registration sequence number; later registrations win priority ties.
    order: u64,
}

/// The set of currently active volumes.
///
/// Registration and removal are O(1) by [`VolumeId`]. Queries order their
/// results by `(priority, registration order)` ascending.
#[derive(Default)]
pub struct VolumeRegistry {
    entries: FxHashMap<VolumeId, Entry>,
    next_order: u64,
}

impl VolumeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] and leaves the registry
    /// unchanged if the id is already present.
    pub fn register(&mut self, volume: Volume) -> Result<(), RegistryError> {
        let id = volume.id();
        if self.entries.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        let order = self.next_order;
        self.next_order += 1;
        tracing::debug!(
            %id,
            kind = if volume.is_global() { "global" } else { "local" },
            priority = volume.priority(),
            "registered lighting volume"
        );
        self.entries.insert(id, Entry { volume, order });
        Ok(())
    }

    /// Remove a volume, returning it. Removing an unknown id is a no-op.
    pub fn unregister(&mut self, id: VolumeId) -> Option<Volume> {
        let removed = self.entries.remove(&id).map(|e| e.volume);
        if removed.is_some() {
            tracing::debug!(%id, "unregistered lighting volume");
        }
        removed
    }

    pub fn contains(&self, id: VolumeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: VolumeId) -> Option<&Volume> {
        self.entries.get(&id).map(|e| &e.volume)
    }

    pub fn get_mut(&mut self, id: VolumeId) -> Option<&mut Volume> {
        self.entries.get_mut(&id).map(|e| &mut e.volume)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All volumes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Volume> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|e| e.order);
        entries.into_iter().map(|e| &e.volume)
    }

    /// Reset every volume's display weight to zero.
    pub fn clear_weights(&mut self) {
        for entry in self.entries.values_mut() {
            entry.volume.set_weight(0.0);
        }
    }

    /// The global volume with the highest priority among those that carry a
    /// profile. Ties go to the most recently registered.
    pub fn highest_priority_global(&self) -> Option<&Volume> {
        self.entries
            .values()
            .filter(|e| e.volume.is_global() && e.volume.profile().is_some())
            .max_by(|a, b| {
                a.volume
                    .priority()
                    .total_cmp(&b.volume.priority())
                    .then(a.order.cmp(&b.order))
            })
            .map(|e| &e.volume)
    }

    /// Local volumes with a profile whose footprint influences `point`,
    /// ascending by priority (the last element is the strongest).
    pub fn volumes_containing(&self, point: Vec3) -> Vec<LocalHit> {
        let mut hits: Vec<(u64, LocalHit)> = self
            .entries
            .values()
            .filter(|e| !e.volume.is_global() && e.volume.profile().is_some())
            .filter_map(|e| {
                let (placement, fraction) = e.volume.classify(point);
                (placement != Placement::Outside).then_some((
                    e.order,
                    LocalHit {
                        id: e.volume.id(),
                        priority: e.volume.priority(),
                        placement,
                        fraction,
                    },
                ))
            })
            .collect();
        hits.sort_by(|(oa, a), (ob, b)| a.priority.total_cmp(&b.priority).then(oa.cmp(ob)));
        hits.into_iter().map(|(_, hit)| hit).collect()
    }
}

/// A registry mutation waiting for the next flush.
pub enum RegistryChange {
    Register(Volume),
    Unregister(VolumeId),
}

/// Deferred registry changes, applied in request order at a defined point
/// of the tick so a scan never observes a half-mutated registry.
#[derive(Default)]
pub struct PendingChanges {
    pending: Vec<RegistryChange>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a volume for registration on the next flush.
    pub fn enqueue_register(&mut self, volume: Volume) {
        self.pending.push(RegistryChange::Register(volume));
    }

    /// Queue a volume for removal on the next flush.
    pub fn enqueue_unregister(&mut self, id: VolumeId) {
        self.pending.push(RegistryChange::Unregister(id));
    }

    /// Apply all pending changes. Returns how many actually changed the
    /// registry; rejected duplicates and unknown removals are not counted.
    pub fn flush(&mut self, registry: &mut VolumeRegistry) -> usize {
        let mut applied = 0;
        for change in self.pending.drain(..) {
            match change {
                RegistryChange::Register(volume) => match registry.register(volume) {
                    Ok(()) => applied += 1,
                    Err(e) => tracing::warn!("ignoring volume registration: {e}"),
                },
                RegistryChange::Unregister(id) => {
                    if registry.unregister(id).is_some() {
                        applied += 1;
                    }
                }
            }
        }
        applied
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LightingProfile;
    use crate::volume::VolumeDesc;
    use lumen_math::VolumeTransform;
    use std::sync::Arc;

    fn global(id: u64, priority: f32) -> Volume {
        Volume::new(
            VolumeId(id),
            VolumeDesc::global(Arc::new(LightingProfile::named(format!("g{id}"))))
                .with_priority(priority),
        )
        .unwrap()
    }

    fn local(id: u64, x: f32, priority: f32, blend: f32) -> Volume {
        Volume::new(
            VolumeId(id),
            VolumeDesc::local(
                VolumeTransform::from_translation(Vec3::new(x, 0.0, 0.0)),
                Vec3::ZERO,
                Vec3::splat(2.0),
                Arc::new(LightingProfile::named(format!("l{id}"))),
            )
            .with_priority(priority)
            .with_blend_distance(blend),
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_unregister() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 0.0)).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(VolumeId(1)));
        assert!(reg.unregister(VolumeId(1)).is_some());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 0.0)).unwrap();
        let err = reg.register(global(1, 5.0)).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered(VolumeId(1)));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(VolumeId(1)).unwrap().priority(), 0.0);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 0.0)).unwrap();
        assert!(reg.unregister(VolumeId(42)).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_highest_priority_global_tie_goes_to_latest() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 5.0)).unwrap();
        reg.register(global(2, 5.0)).unwrap();
        reg.register(global(3, 3.0)).unwrap();
        assert_eq!(reg.highest_priority_global().unwrap().id(), VolumeId(2));
    }

    #[test]
    fn test_highest_priority_global_prefers_priority() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 10.0)).unwrap();
        reg.register(global(2, -1.0)).unwrap();
        assert_eq!(reg.highest_priority_global().unwrap().id(), VolumeId(1));
    }

    #[test]
    fn test_global_without_profile_is_skipped() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 0.0)).unwrap();
        reg.register(
            Volume::new(VolumeId(2), VolumeDesc::default().with_priority(99.0)).unwrap(),
        )
        .unwrap();
        assert_eq!(reg.highest_priority_global().unwrap().id(), VolumeId(1));
    }

    #[test]
    fn test_no_global_returns_none() {
        let mut reg = VolumeRegistry::new();
        reg.register(local(1, 0.0, 0.0, 1.0)).unwrap();
        assert!(reg.highest_priority_global().is_none());
    }

    #[test]
    fn test_reregistered_volume_moves_to_end_of_tie_order() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 5.0)).unwrap();
        reg.register(global(2, 5.0)).unwrap();
        let v1 = reg.unregister(VolumeId(1)).unwrap();
        reg.register(v1).unwrap();
        assert_eq!(reg.highest_priority_global().unwrap().id(), VolumeId(1));
    }

    #[test]
    fn test_volumes_containing_sorted_ascending() {
        let mut reg = VolumeRegistry::new();
        reg.register(local(1, 0.0, 3.0, 1.0)).unwrap();
        reg.register(local(2, 0.5, 1.0, 1.0)).unwrap();
        reg.register(local(3, 100.0, 9.0, 1.0)).unwrap();
        reg.register(global(4, 50.0)).unwrap();

        let hits = reg.volumes_containing(Vec3::ZERO);
        let ids: Vec<VolumeId> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![VolumeId(2), VolumeId(1)]);
        assert!(hits.iter().all(|h| h.placement == Placement::Inside));
    }

    #[test]
    fn test_volumes_containing_reports_band() {
        let mut reg = VolumeRegistry::new();
        reg.register(local(1, 0.0, 0.0, 2.0)).unwrap();
        let hits = reg.volumes_containing(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].placement, Placement::InBlendBand);
        assert!((hits[0].fraction - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_volumes_containing_tie_uses_registration_order() {
        let mut reg = VolumeRegistry::new();
        reg.register(local(7, 0.0, 1.0, 0.0)).unwrap();
        reg.register(local(3, 0.0, 1.0, 0.0)).unwrap();
        let hits = reg.volumes_containing(Vec3::ZERO);
        assert_eq!(hits.last().unwrap().id, VolumeId(3));
    }

    #[test]
    fn test_iter_in_registration_order() {
        let mut reg = VolumeRegistry::new();
        for id in [5, 2, 9] {
            reg.register(global(id, 0.0)).unwrap();
        }
        let ids: Vec<u64> = reg.iter().map(|v| v.id().0).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_pending_changes_apply_in_order() {
        let mut reg = VolumeRegistry::new();
        let mut pending = PendingChanges::new();
        pending.enqueue_register(global(1, 0.0));
        pending.enqueue_register(global(2, 0.0));
        pending.enqueue_unregister(VolumeId(1));
        assert_eq!(pending.len(), 3);
        assert!(reg.is_empty(), "nothing applies before flush");

        assert_eq!(pending.flush(&mut reg), 3);
        assert!(pending.is_empty());
        assert!(!reg.contains(VolumeId(1)));
        assert!(reg.contains(VolumeId(2)));
    }

    #[test]
    fn test_pending_flush_skips_rejected() {
        let mut reg = VolumeRegistry::new();
        let mut pending = PendingChanges::new();
        pending.enqueue_register(global(1, 0.0));
        pending.enqueue_register(global(1, 0.0));
        pending.enqueue_unregister(VolumeId(8));
        assert_eq!(pending.flush(&mut reg), 1);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_clear_weights() {
        let mut reg = VolumeRegistry::new();
        reg.register(global(1, 0.0)).unwrap();
        reg.get_mut(VolumeId(1)).unwrap().set_weight(100.0);
        reg.clear_weights();
        assert_eq!(reg.get(VolumeId(1)).unwrap().weight(), 0.0);
    }
}
