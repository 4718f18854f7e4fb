//! Lightning bursts
//!
//! A burst is a short series of bright flashes, each followed by a noisy
//! linear decay, sometimes trailed by one faint post-flicker. Bursts fire on
//! their own after exponentially distributed waits, or on demand.
//!
//! While a burst is playing it paints over the base layer, brightest at a
//! per-burst origin LED and falling off with distance.

use core::f32::consts::PI;

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;
use heapless::Vec;
use rand::Rng;

use crate::{
    color::{Hsv, Rgb, hsv2rgb},
    config::Span,
    math::{clamp01, unit_to_u8},
};

/// Capacity of a burst plan, post-flicker included
pub const MAX_FLASHES: usize = 8;

pub const DEFAULT_MEAN_INTERVAL: Duration = Duration::from_millis(18_000);
pub const DEFAULT_DECAY: Duration = Duration::from_millis(140);

// Near-white with a faint blue-violet tint (220 deg, 8% saturation)
pub const DEFAULT_HUE: u8 = 156;
pub const DEFAULT_SATURATION: u8 = 20;
pub const DEFAULT_FALLOFF: f32 = 0.06;

const FLASH_FLOOR: f32 = 0.85;
const FLASH_SWELL: f32 = 0.15;
const DECAY_SLOPE: f32 = 1.1;
const DECAY_NOISE: f32 = 0.12;
const SHIMMER_FLOOR: f32 = 0.85;
const VISIBLE_THRESHOLD: f32 = 0.001;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

#[derive(Debug, Clone, Copy)]
pub struct LightningConfig {
    /// Mean wait between spontaneous bursts
    pub mean_interval: Duration,
    /// Number of main flashes per burst
    pub flash_count: Span<u8>,
    /// Lit part of each main flash
    pub flash_duration_ms: Span<u32>,
    /// Decay tail after each main flash
    pub decay: Duration,
    /// Base gap between flashes, drawn once per burst
    pub gap_ms: Span<u32>,
    /// Per-flash variation added to the gap
    pub jitter_ms: Span<i32>,
    /// Chance of a trailing post-flicker (0.0-1.0)
    pub post_flicker_probability: f32,
    /// Extra pause before the post-flicker
    pub post_flicker_pause_ms: Span<u32>,
    /// Lit part of the post-flicker
    pub post_flicker_duration_ms: Span<u32>,
    /// Post-flicker decay as a percentage of `decay`
    pub post_flicker_decay_percent: u8,
    pub hue: u8,
    pub saturation: u8,
    /// Value at full intensity
    pub peak: u8,
    /// Spatial falloff coefficient
    pub falloff: f32,
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            mean_interval: DEFAULT_MEAN_INTERVAL,
            flash_count: Span::new(2, 5),
            flash_duration_ms: Span::new(22, 58),
            decay: DEFAULT_DECAY,
            gap_ms: Span::new(40, 200),
            jitter_ms: Span::new(-20, 60),
            post_flicker_probability: 0.35,
            post_flicker_pause_ms: Span::new(60, 220),
            post_flicker_duration_ms: Span::new(14, 104),
            post_flicker_decay_percent: 60,
            hue: DEFAULT_HUE,
            saturation: DEFAULT_SATURATION,
            peak: 255,
            falloff: DEFAULT_FALLOFF,
        }
    }
}

impl LightningConfig {
    pub fn post_flicker_decay(&self) -> Duration {
        Duration::from_millis(
            self.decay.as_millis() * u64::from(self.post_flicker_decay_percent) / 100,
        )
    }
}

/// Brightness attenuation at `distance` LEDs from the burst origin
#[inline]
pub fn falloff(distance: f32, coefficient: f32) -> f32 {
    1.0 / (1.0 + coefficient * distance * distance)
}

/// One rise-then-decay pulse, in real time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashInterval {
    pub flash_start: Instant,
    pub flash_end: Instant,
    pub decay_end: Instant,
}

impl FlashInterval {
    fn new(flash_start: Instant, flash: Duration, decay: Duration) -> Self {
        let flash_end = flash_start + flash;
        Self {
            flash_start,
            flash_end,
            decay_end: flash_end + decay,
        }
    }

    /// Length of the decay tail
    pub fn decay(&self) -> Duration {
        self.decay_end - self.flash_end
    }

    /// Contribution at `now`
    ///
    /// Pending intervals contribute zero but are still alive; `None` once the
    /// decay tail has run out.
    #[allow(clippy::cast_precision_loss)]
    pub fn intensity<R: Rng + ?Sized>(&self, now: Instant, rng: &mut R) -> Option<f32> {
        if now < self.flash_start {
            return Some(0.0);
        }

        if now <= self.flash_end {
            let elapsed = (now - self.flash_start).as_millis() as f32;
            let length = (self.flash_end - self.flash_start).as_millis().max(1) as f32;
            let phase = elapsed / length;
            return Some(FLASH_FLOOR + FLASH_SWELL * libm::sinf(phase * PI));
        }

        if now <= self.decay_end {
            let elapsed = (now - self.flash_end).as_millis() as f32;
            let length = (self.decay_end - self.flash_end).as_millis().max(1) as f32;
            let decayed = elapsed / length;
            let noise = (rng.random::<f32>() - 0.5) * DECAY_NOISE;
            return Some(clamp01(1.0 - decayed * DECAY_SLOPE + noise));
        }

        None
    }
}

/// Flash intervals of one burst, ordered by start time
#[derive(Debug, Clone, Default)]
pub struct BurstPlan {
    intervals: Vec<FlashInterval, MAX_FLASHES>,
    post_flicker: bool,
}

impl BurstPlan {
    /// Draw a new burst starting at `start`
    pub fn build<R: Rng + ?Sized>(start: Instant, config: &LightningConfig, rng: &mut R) -> Self {
        let mut plan = Self::default();
        let flashes = config.flash_count.sample(rng);
        let gap = i64::from(config.gap_ms.sample(rng));

        let mut next_start = start;
        for _ in 0..flashes {
            let flash = Duration::from_millis(u64::from(config.flash_duration_ms.sample(rng)));
            let interval = FlashInterval::new(next_start, flash, config.decay);
            if plan.intervals.push(interval).is_err() {
                break;
            }

            let spacing = gap + i64::from(config.jitter_ms.sample(rng));
            let spacing = Duration::from_millis(u64::try_from(spacing).unwrap_or(0));
            next_start = interval.flash_end + spacing;
        }

        if rng.random::<f32>() < config.post_flicker_probability {
            let pause = Duration::from_millis(u64::from(config.post_flicker_pause_ms.sample(rng)));
            let flash =
                Duration::from_millis(u64::from(config.post_flicker_duration_ms.sample(rng)));
            let interval =
                FlashInterval::new(next_start + pause, flash, config.post_flicker_decay());
            plan.post_flicker = plan.intervals.push(interval).is_ok();
        }

        plan
    }

    pub fn intervals(&self) -> &[FlashInterval] {
        &self.intervals
    }

    /// Whether the last interval is a post-flicker
    pub const fn has_post_flicker(&self) -> bool {
        self.post_flicker
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Brightest contribution across all intervals at `now`
    ///
    /// Returns `None` when no interval is alive any more.
    pub fn intensity<R: Rng + ?Sized>(&self, now: Instant, rng: &mut R) -> Option<f32> {
        let mut alive = false;
        let mut intensity = 0.0_f32;
        for interval in &self.intervals {
            if let Some(value) = interval.intensity(now, rng) {
                alive = true;
                intensity = intensity.max(value);
            }
        }
        alive.then_some(intensity)
    }

    /// Origin LED of the burst on a strip of `led_count` LEDs
    ///
    /// One LCG step over the first flash start: the same plan always lands
    /// on the same LED.
    #[allow(clippy::cast_possible_truncation)]
    pub fn origin(&self, led_count: usize) -> Option<usize> {
        let first = self.intervals.first()?;
        let seed = (first.flash_start.as_millis() & 0xFFFF_FFFF) as u32;
        let seed = seed.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        Some(seed as usize % led_count.max(1))
    }
}

#[derive(Debug, Clone)]
enum LightningState {
    Idle,
    Active(BurstPlan),
}

/// Lightning state machine
#[derive(Debug, Clone)]
pub struct Lightning {
    config: LightningConfig,
    state: LightningState,
    next_eligible: Instant,
}

impl Lightning {
    /// Create an idle session with a randomized first deadline
    pub fn new<R: Rng + ?Sized>(config: LightningConfig, now: Instant, rng: &mut R) -> Self {
        let next_eligible = now + Self::exponential_wait(config.mean_interval, rng);
        Self {
            config,
            state: LightningState::Idle,
            next_eligible,
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self.state, LightningState::Active(_))
    }

    /// Plan of the burst being played, if any
    pub const fn plan(&self) -> Option<&BurstPlan> {
        match &self.state {
            LightningState::Active(plan) => Some(plan),
            LightningState::Idle => None,
        }
    }

    /// Earliest time of the next spontaneous burst
    pub const fn next_eligible(&self) -> Instant {
        self.next_eligible
    }

    /// Start a spontaneous burst if idle and the deadline has passed
    ///
    /// Returns `true` if a burst was started.
    pub fn maybe_trigger<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> bool {
        if self.is_active() || now < self.next_eligible {
            return false;
        }

        let plan = BurstPlan::build(now, &self.config, rng);
        #[cfg(feature = "esp32-log")]
        println!("[lightning] spontaneous burst: {} flashes", plan.intervals().len());
        self.state = LightningState::Active(plan);
        true
    }

    /// Start a burst right away, replacing any burst in progress
    pub fn trigger_now<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        let plan = BurstPlan::build(now, &self.config, rng);
        #[cfg(feature = "esp32-log")]
        println!("[lightning] forced burst: {} flashes", plan.intervals().len());
        self.state = LightningState::Active(plan);
        self.next_eligible = now + Self::exponential_wait(self.config.mean_interval, rng);
    }

    /// Paint the burst over `leds`
    ///
    /// Returns `true` if anything was written. Goes back to idle once every
    /// interval has decayed.
    #[allow(clippy::cast_precision_loss)]
    pub fn render<R: Rng + ?Sized>(&mut self, now: Instant, leds: &mut [Rgb], rng: &mut R) -> bool {
        let (intensity, origin) = match &self.state {
            LightningState::Idle => return false,
            LightningState::Active(plan) => (plan.intensity(now, rng), plan.origin(leds.len())),
        };

        let Some(intensity) = intensity else {
            self.finish(now, rng);
            return false;
        };
        if intensity <= VISIBLE_THRESHOLD {
            return false;
        }
        let Some(origin) = origin else {
            return false;
        };

        let value = clamp01(f32::from(self.config.peak) / 255.0 * intensity);
        for (i, led) in leds.iter_mut().enumerate() {
            let distance = i.abs_diff(origin) as f32;
            let shimmer = SHIMMER_FLOOR + (1.0 - SHIMMER_FLOOR) * rng.random::<f32>();
            let scaled = clamp01(value * shimmer * falloff(distance, self.config.falloff));
            *led = hsv2rgb(Hsv {
                hue: self.config.hue,
                sat: self.config.saturation,
                val: unit_to_u8(scaled),
            });
        }

        true
    }

    fn finish<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        self.state = LightningState::Idle;
        self.next_eligible = now + Self::exponential_wait(self.config.mean_interval, rng);
        #[cfg(feature = "esp32-log")]
        println!("[lightning] burst over, next in {} ms", (self.next_eligible - now).as_millis());
    }

    /// Exponentially distributed wait, at least one millisecond
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn exponential_wait<R: Rng + ?Sized>(mean: Duration, rng: &mut R) -> Duration {
        let uniform: f64 = rng.random();
        let wait_ms = -(mean.as_millis() as f64) * libm::log(1.0 - uniform);
        Duration::from_millis((wait_ms as u64).max(1))
    }
}
