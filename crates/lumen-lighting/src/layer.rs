//! Lighting layer: the per-tracked-object blend controller.
//!
//! Each tick the layer
//!
//! 1. applies queued registry changes,
//! 2. re-scans the registry (on its own interval, or immediately after a
//!    change) to find the strongest global volume and the local volumes
//!    around the tracked position,
//! 3. advances the timed transition toward the selected global volume's
//!    profile using that volume's easing curve, and
//! 4. composes the emitted profile: a positional blend when the tracked
//!    object stands in a blend band, a hard apply when it stands inside a
//!    stronger local volume, or the global layer's output otherwise.
//!
//! The global layer output is the settled profile, or the in-flight blend
//! buffer while a timed transition runs. Positional blends never touch the
//! timed transition state.

use std::sync::Arc;

use glam::Vec3;

use crate::curve::BlendCurve;
use crate::profile::{BlendCategories, LightingProfile};
use crate::registry::{PendingChanges, VolumeRegistry};
use crate::render_settings::RenderSettings;
use crate::volume::{Placement, Volume, VolumeId};

/// Tuning for a [`LightingLayer`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSettings {
    /// Blend every category, ignoring `categories`.
    pub blend_all: bool,
    /// Categories to blend when `blend_all` is off.
    pub categories: BlendCategories,
    /// Evaluate once every `frame_skip + 1` ticks. Skipped ticks still
    /// count toward transition time.
    pub frame_skip: u32,
    /// Re-scan volumes once every this many evaluations (0 behaves as 1).
    /// Registry changes always force a re-scan.
    pub rescan_interval: u32,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            blend_all: true,
            categories: BlendCategories::all(),
            frame_skip: 0,
            rescan_interval: 1,
        }
    }
}

impl LayerSettings {
    /// Categories actually blended.
    pub fn effective_categories(&self) -> BlendCategories {
        if self.blend_all {
            BlendCategories::all()
        } else {
            self.categories
        }
    }
}

/// Timed transition state.
#[derive(Clone, Debug)]
pub enum BlendState {
    /// No transition; the settled profile is the global layer output.
    Settled,
    /// Blending from the settled profile toward `target`.
    Transitioning {
        target: Arc<LightingProfile>,
        /// Seconds since the transition started.
        elapsed: f32,
        /// Total duration in seconds.
        blend_time: f32,
        curve: BlendCurve,
    },
}

impl BlendState {
    pub fn is_transitioning(&self) -> bool {
        matches!(self, BlendState::Transitioning { .. })
    }
}

/// Snapshot of a layer for inspectors and logs.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStatus {
    pub transitioning: bool,
    pub settled_profile: String,
    pub target_profile: Option<String>,
    /// Fraction behind the last emitted profile, see [`LightingLayer::blend_fraction`].
    pub blend: f32,
    /// Global volume selected before the current one.
    pub source_global: Option<VolumeId>,
    pub selected_global: Option<VolumeId>,
    pub band_volume: Option<VolumeId>,
    pub inside_volume: Option<VolumeId>,
    pub volume_count: usize,
}

#[derive(Clone, Debug)]
struct GlobalSelection {
    id: VolumeId,
    profile: Arc<LightingProfile>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ScanResult {
    /// Strongest volume whose blend band holds the tracked position.
    band: Option<VolumeId>,
    /// Strongest volume whose inner footprint holds the tracked position.
    inside: Option<VolumeId>,
}

/// Blend controller for one tracked object.
pub struct LightingLayer {
    settings: LayerSettings,
    registry: VolumeRegistry,
    pending: PendingChanges,

    /// Renderer state captured at construction, restored on teardown.
    initial: LightingProfile,
    settled: LightingProfile,
    /// Timed transition buffer.
    working: LightingProfile,
    /// Last emitted profile.
    output: LightingProfile,
    state: BlendState,

    selected_global: Option<GlobalSelection>,
    source_global: Option<VolumeId>,
    scan: ScanResult,
    blend: f32,
    weights: Vec<(VolumeId, f32)>,

    tick_index: u64,
    evaluations: u64,
    carried_delta: f32,
    needs_rescan: bool,
    warned_empty: bool,
    warned_no_global: bool,
}

impl LightingLayer {
    /// Create a layer whose settled state starts at `initial`.
    pub fn new(initial: LightingProfile, settings: LayerSettings) -> Self {
        Self {
            settings,
            registry: VolumeRegistry::new(),
            pending: PendingChanges::new(),
            settled: initial.clone(),
            working: initial.clone(),
            output: initial.clone(),
            initial,
            state: BlendState::Settled,
            selected_global: None,
            source_global: None,
            scan: ScanResult::default(),
            blend: 1.0,
            weights: Vec::with_capacity(2),
            tick_index: 0,
            evaluations: 0,
            carried_delta: 0.0,
            needs_rescan: true,
            warned_empty: false,
            warned_no_global: false,
        }
    }

    /// Create a layer from the renderer's current state.
    pub fn from_render_settings(render: &RenderSettings, settings: LayerSettings) -> Self {
        tracing::debug!("capturing initial lighting profile");
        Self::new(LightingProfile::capture(render, "initial"), settings)
    }

    /// Queue a volume for registration at the start of the next tick.
    pub fn register(&mut self, volume: Volume) {
        tracing::trace!(id = %volume.id(), "queued volume registration");
        self.pending.enqueue_register(volume);
    }

    /// Queue a volume for removal at the start of the next tick.
    pub fn unregister(&mut self, id: VolumeId) {
        tracing::trace!(%id, "queued volume removal");
        self.pending.enqueue_unregister(id);
    }

    /// Number of registry changes waiting for the next tick.
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    pub fn registry(&self) -> &VolumeRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &LayerSettings {
        &self.settings
    }

    /// Replace the settings; takes effect on the next evaluated tick.
    pub fn set_settings(&mut self, settings: LayerSettings) {
        self.settings = settings;
        self.needs_rescan = true;
    }

    /// The last emitted profile.
    pub fn output(&self) -> &LightingProfile {
        &self.output
    }

    pub fn settled(&self) -> &LightingProfile {
        &self.settled
    }

    pub fn initial(&self) -> &LightingProfile {
        &self.initial
    }

    pub fn state(&self) -> &BlendState {
        &self.state
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    /// Fraction behind the last emitted profile: the eased transition
    /// fraction while a timed transition runs, the positional fraction in a
    /// blend band (0 at the inner boundary), and 1 once settled.
    pub fn blend_fraction(&self) -> f32 {
        self.blend
    }

    pub fn status(&self) -> LayerStatus {
        let target_profile = match &self.state {
            BlendState::Transitioning { target, .. } => Some(target.name.clone()),
            BlendState::Settled => None,
        };
        LayerStatus {
            transitioning: self.state.is_transitioning(),
            settled_profile: self.settled.name.clone(),
            target_profile,
            blend: self.blend,
            source_global: self.source_global,
            selected_global: self.selected_global.as_ref().map(|s| s.id),
            band_volume: self.scan.band,
            inside_volume: self.scan.inside,
            volume_count: self.registry.len(),
        }
    }

    /// Write the last emitted profile into the renderer.
    pub fn apply(&self, render: &mut RenderSettings) {
        self.output.apply(render);
    }

    /// Put the renderer back to the state captured at construction.
    pub fn restore_initial(&self, render: &mut RenderSettings) {
        tracing::debug!("restoring initial lighting profile");
        self.initial.apply(render);
    }

    /// Run one scheduling tick for the tracked object at `position`, with
    /// `delta_seconds` elapsed since the previous tick. Returns the profile
    /// to apply this tick.
    pub fn evaluate_tick(&mut self, position: Vec3, delta_seconds: f32) -> &LightingProfile {
        if self.pending.flush(&mut self.registry) > 0 {
            self.needs_rescan = true;
        }

        let tick = self.tick_index;
        self.tick_index = self.tick_index.wrapping_add(1);
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.carried_delta += delta_seconds;
        }
        if tick % (u64::from(self.settings.frame_skip) + 1) != 0 {
            return &self.output;
        }
        let delta = std::mem::take(&mut self.carried_delta);

        if self.registry.is_empty() {
            if !self.warned_empty {
                tracing::warn!("no lighting volumes registered; holding settled lighting");
                self.warned_empty = true;
            }
            self.output.clone_from(&self.settled);
            return &self.output;
        }
        self.warned_empty = false;

        let interval = u64::from(self.settings.rescan_interval.max(1));
        if self.needs_rescan || self.evaluations % interval == 0 {
            self.rescan(position);
        }
        self.evaluations += 1;

        self.advance_transition(delta);
        self.compose_output(position);
        &self.output
    }

    fn rescan(&mut self, position: Vec3) {
        self.needs_rescan = false;
        self.select_global();

        let hits = self.registry.volumes_containing(position);
        let strongest = |placement: Placement| {
            hits.iter()
                .rev()
                .find(|h| h.placement == placement)
                .map(|h| h.id)
        };
        self.scan = ScanResult {
            band: strongest(Placement::InBlendBand),
            inside: strongest(Placement::Inside),
        };
    }

    fn select_global(&mut self) {
        let Some(volume) = self.registry.highest_priority_global() else {
            if !self.warned_no_global {
                tracing::warn!("no global lighting volume with a profile; keeping current lighting");
                self.warned_no_global = true;
            }
            if let Some(previous) = self.selected_global.take() {
                self.source_global = Some(previous.id);
            }
            return;
        };
        self.warned_no_global = false;

        let Some(profile) = volume.profile() else {
            return;
        };
        let unchanged = self
            .selected_global
            .as_ref()
            .is_some_and(|s| s.id == volume.id() && Arc::ptr_eq(&s.profile, profile));
        if unchanged {
            return;
        }

        let id = volume.id();
        let target = Arc::clone(profile);
        let blend_time = volume.time_to_blend();
        let curve = volume.curve().clone();

        self.source_global = self.selected_global.as_ref().map(|s| s.id);
        self.selected_global = Some(GlobalSelection {
            id,
            profile: Arc::clone(&target),
        });
        self.start_transition(target, blend_time, curve);
    }

    fn start_transition(&mut self, target: Arc<LightingProfile>, blend_time: f32, curve: BlendCurve) {
        tracing::debug!(
            from = %self.settled.name,
            to = %target.name,
            blend_time,
            "starting lighting transition"
        );
        self.working.clone_from(&self.settled);
        self.state = BlendState::Transitioning {
            target,
            elapsed: 0.0,
            blend_time,
            curve,
        };
    }

    fn advance_transition(&mut self, delta: f32) {
        let categories = self.settings.effective_categories();
        let BlendState::Transitioning {
            target,
            elapsed,
            blend_time,
            curve,
        } = &mut self.state
        else {
            return;
        };

        *elapsed += delta;
        let t = if *blend_time > 0.0 {
            *elapsed / *blend_time
        } else {
            1.0
        };
        let target: &LightingProfile = target;

        if t < 1.0 {
            let fraction = curve.evaluate(t);
            self.working.lerp_from(&self.settled, target, fraction, categories);
            self.blend = fraction;
            return;
        }

        // Commit with the fraction pinned at 1.
        self.working.lerp_from(&self.settled, target, 1.0, categories);
        self.working.name.clone_from(&target.name);
        tracing::debug!(profile = %target.name, "lighting transition complete");
        std::mem::swap(&mut self.settled, &mut self.working);
        self.state = BlendState::Settled;
        self.blend = 1.0;
    }

    fn compose_output(&mut self, position: Vec3) {
        let categories = self.settings.effective_categories();
        let (global_output, global_share) = match &self.state {
            BlendState::Transitioning { .. } => (&self.working, self.blend),
            BlendState::Settled => (&self.settled, 1.0),
        };
        self.output.clone_from(global_output);
        self.blend = global_share;
        self.weights.clear();

        let selected = self.selected_global.as_ref().map(|s| s.id);
        let selected_priority = selected
            .and_then(|id| self.registry.get(id))
            .map(Volume::priority);
        let band = self.scan.band.and_then(|id| self.registry.get(id));
        let inside = self.scan.inside.and_then(|id| self.registry.get(id));

        if let Some(band) = band
            && let Some(band_profile) = band.profile()
        {
            let fraction = band.blend_fraction(position);
            let inner = inside.filter(|v| v.priority() > band.priority());
            let outer: &LightingProfile = match inner.and_then(Volume::profile) {
                Some(p) => p.as_ref(),
                None => global_output,
            };
            self.output.lerp_from(band_profile, outer, fraction, categories);
            self.blend = fraction;

            self.weights.push((band.id(), (1.0 - fraction) * 100.0));
            match (inner, selected) {
                (Some(v), _) => self.weights.push((v.id(), fraction * 100.0)),
                (None, Some(id)) => self.weights.push((id, fraction * global_share * 100.0)),
                (None, None) => {}
            }
        } else if let Some(v) = inside
            && let Some(profile) = v.profile()
            && selected_priority.is_none_or(|p| v.priority() > p)
        {
            self.output.lerp_from(global_output, profile, 1.0, categories);
            self.blend = 1.0;
            self.weights.push((v.id(), 100.0));
        } else if let Some(id) = selected {
            self.weights.push((id, global_share * 100.0));
        }

        self.registry.clear_weights();
        for &(id, weight) in &self.weights {
            if let Some(v) = self.registry.get_mut(id) {
                v.set_weight(weight);
            }
        }
    }
}
