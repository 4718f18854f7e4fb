//! Uneasy time warp
//!
//! The palette crossfade does not follow the wall clock directly. A warped
//! clock runs faster and slower than real time along a slow sine, so the
//! fade speeds up and drags on in turn.

use core::f64::consts::TAU;

use embassy_time::{Duration, Instant};

/// Default length of one speed-up/slow-down cycle
pub const DEFAULT_WARP_PERIOD: Duration = Duration::from_millis(15_000);

/// Default swing of the speed factor around 1.0
pub const DEFAULT_WARP_DEPTH: f64 = 0.6;

/// Largest usable swing; at 1.0 the warped clock would stall
const MAX_WARP_DEPTH: f64 = 1.0 - f64::EPSILON;

#[derive(Debug, Clone, Copy)]
pub struct TimeWarpConfig {
    /// Length of one full modulation cycle in real time
    pub period: Duration,
    /// Swing of the speed factor within `[0, 1)`
    ///
    /// [`TimeWarp::new`] clamps out-of-range values so the warped clock never
    /// runs backwards; `StormConfig::validate` rejects them outright.
    pub depth: f64,
}

impl Default for TimeWarpConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_WARP_PERIOD,
            depth: DEFAULT_WARP_DEPTH,
        }
    }
}

/// Warped clock accumulator
#[derive(Debug, Clone)]
pub struct TimeWarp {
    period_ms: u64,
    depth: f64,
    warped_ms: f64,
}

impl TimeWarp {
    pub fn new(config: &TimeWarpConfig) -> Self {
        let depth = if config.depth.is_nan() {
            0.0
        } else {
            config.depth.clamp(0.0, MAX_WARP_DEPTH)
        };

        Self {
            period_ms: config.period.as_millis().max(1),
            depth,
            warped_ms: 0.0,
        }
    }

    /// Position within the modulation cycle (0.0-1.0)
    #[allow(clippy::cast_precision_loss)]
    pub fn phase_at(&self, now: Instant) -> f64 {
        (now.as_millis() % self.period_ms) as f64 / self.period_ms as f64
    }

    /// Speed multiplier at a real time, within `[1 - depth, 1 + depth]`
    pub fn speed_at(&self, now: Instant) -> f64 {
        1.0 + self.depth * libm::sin(TAU * self.phase_at(now))
    }

    /// Advance the warped clock by `delta` of real time
    ///
    /// Returns the warped time in milliseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn advance(&mut self, delta: Duration, now: Instant) -> f64 {
        self.warped_ms += delta.as_millis() as f64 * self.speed_at(now);
        self.warped_ms
    }

    /// Current warped time in milliseconds
    pub const fn warped_ms(&self) -> f64 {
        self.warped_ms
    }
}
