//! Fixed-rate tick loop driven by explicit frame times.
//!
//! Frames of any length feed an accumulator that is drained in fixed steps,
//! so the lighting layer always sees the same delta regardless of how the
//! frames were sliced.

use tracing::warn;

/// Longest frame accepted before clamping.
pub const MAX_FRAME_TIME: f64 = 0.25;

const FALLBACK_TICK_RATE: u32 = 60;

pub struct TickLoop {
    fixed_dt: f64,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl TickLoop {
    /// A zero tick rate falls back to 60 Hz.
    pub fn new(tick_rate: u32) -> Self {
        let rate = if tick_rate == 0 {
            warn!("tick rate of 0 Hz requested, using {FALLBACK_TICK_RATE} Hz");
            FALLBACK_TICK_RATE
        } else {
            tick_rate
        };
        Self {
            fixed_dt: 1.0 / f64::from(rate),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Feed one frame of `frame_time` seconds. Calls `update_fn(fixed_dt,
    /// total_sim_time)` once per whole step and returns the leftover
    /// fraction of a step in `[0, 1)`.
    pub fn advance(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64, f64)) -> f64 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }
        self.accumulator += frame_time;

        while self.accumulator >= self.fixed_dt {
            update_fn(self.fixed_dt, self.total_sim_time);
            self.total_sim_time += self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            self.update_count += 1;
        }
        self.frame_count += 1;
        self.alpha()
    }

    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.fixed_dt
        } else {
            0.0
        }
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
