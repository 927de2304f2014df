//! Easing curves that shape timed transitions.
//!
//! A [`BlendCurve`] maps normalized elapsed time to a blend weight. The
//! layer evaluates it in `[0, 1)` and pins the weight at 1 on completion.

use thiserror::Error;

/// Errors returned when building a keyframed curve.
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    /// A keyframed curve needs at least one key.
    #[error("curve has no keyframes")]
    Empty,

    /// A key time or value is NaN or infinite.
    #[error("keyframe {index} is not finite")]
    NonFinite { index: usize },
}

/// A single `(time, value)` key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Keys sorted by time with unique times. Only [`BlendCurve::from_keyframes`]
/// builds one, so the ordering always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }
}

/// User-authored mapping from normalized time to normalized blend weight.
///
/// Not required to be monotonic.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum BlendCurve {
    /// `f(t) = t`, extrapolating outside `[0, 1]`.
    #[default]
    Linear,
    /// Hermite `3t² − 2t³`, clamped to `[0, 1]`.
    SmoothStep,
    /// Piecewise-linear keys. Before the first key the first value holds;
    /// after the last key the last value holds.
    Keyframes(KeyframeCurve),
}

impl BlendCurve {
    /// Build a keyframed curve. Keys are sorted by time; a key that shares
    /// its time with an earlier one replaces it.
    pub fn from_keyframes(keys: impl IntoIterator<Item = Keyframe>) -> Result<Self, CurveError> {
        let mut keys: Vec<Keyframe> = keys.into_iter().collect();
        if keys.is_empty() {
            return Err(CurveError::Empty);
        }
        if let Some(index) = keys
            .iter()
            .position(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(CurveError::NonFinite { index });
        }

        // Stable sort keeps authoring order among equal times; keep the last.
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        let mut deduped: Vec<Keyframe> = Vec::with_capacity(keys.len());
        for key in keys {
            match deduped.last_mut() {
                Some(last) if last.time == key.time => *last = key,
                _ => deduped.push(key),
            }
        }
        Ok(BlendCurve::Keyframes(KeyframeCurve { keys: deduped }))
    }

    /// Ease-in-out through explicit keys, handy for authoring defaults.
    pub fn ease_in_out() -> Self {
        BlendCurve::Keyframes(KeyframeCurve {
            keys: vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.25, 0.1),
                Keyframe::new(0.75, 0.9),
                Keyframe::new(1.0, 1.0),
            ],
        })
    }

    /// Evaluate the curve at normalized time `t`. A NaN `t` evaluates like
    /// the start of the curve.
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            BlendCurve::Linear => t,
            BlendCurve::SmoothStep => smooth_step(t),
            BlendCurve::Keyframes(curve) => sample_keys(&curve.keys, t),
        }
    }
}

/// Hermite smooth step for natural-looking transitions.
pub fn smooth_step(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn sample_keys(keys: &[Keyframe], t: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return t;
    };
    if t.is_nan() || t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }

    // First key strictly after t; both neighbours exist because of the guards above.
    let next = keys.partition_point(|k| k.time <= t);
    let a = keys[next - 1];
    let b = keys[next];
    let span = b.time - a.time;
    if span <= 0.0 {
        return b.value;
    }
    let local = (t - a.time) / span;
    a.value + (b.value - a.value) * local
}
