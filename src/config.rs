//! Startup configuration
//!
//! Everything here is fixed once the engine is built. [`StormConfig::validate`]
//! rejects values the renderers cannot honor, so the hot path never has to.

use embassy_time::Duration;
use rand::{Rng, distr::uniform::SampleUniform};
use thiserror::Error;

use crate::button::DEFAULT_LONG_PRESS;
use crate::color::{HALLOWEEN_PALETTE, Palette};
use crate::effect::{LightningConfig, MAX_FLASHES};
use crate::time_warp::TimeWarpConfig;

/// Default number of LEDs on the strip
pub const DEFAULT_LED_COUNT: usize = 50;

/// Default target frame rate
pub const DEFAULT_FPS: u32 = 60;

/// Default base brightness of the palette layer (0.0-1.0)
pub const DEFAULT_BRIGHTNESS: f32 = 0.28;

/// Default duration of one palette transition
pub const DEFAULT_FADE: Duration = Duration::from_millis(30_000);

/// Default random seed
pub const DEFAULT_SEED: u64 = 0x5EED_0F_5707;

/// Inclusive range of values sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: SampleUniform + PartialOrd + Copy> Span<T> {
    /// Draw a value in `min..=max`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.random_range(self.min..=self.max)
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("strip must have at least one LED")]
    NoLeds,
    #[error("{requested} LEDs requested but the frame buffer holds {capacity}")]
    TooManyLeds { requested: usize, capacity: usize },
    #[error("frame rate must be non-zero")]
    ZeroFrameRate,
    #[error("brightness must be within [0, 1]")]
    BrightnessOutOfRange,
    #[error("palette fade duration must be non-zero")]
    ZeroFade,
    #[error("time warp period must be non-zero")]
    ZeroWarpPeriod,
    #[error("time warp depth must be within [0, 1)")]
    WarpDepthOutOfRange,
    #[error("{0} range is empty or inverted")]
    InvalidRange(&'static str),
    #[error("a burst holds at most {max} flashes")]
    TooManyFlashes { max: usize },
    #[error("flash decay must be at least one millisecond")]
    ZeroDecay,
    #[error("gap plus jitter must not be negative")]
    NegativeSpacing,
    #[error("post-flicker probability must be within [0, 1]")]
    ProbabilityOutOfRange,
}

/// Complete engine configuration
#[derive(Debug, Clone)]
pub struct StormConfig {
    /// Number of LEDs driven
    pub led_count: usize,
    /// Target frame rate
    pub fps: u32,
    /// Brightness of the palette layer (0.0-1.0)
    pub brightness: f32,
    /// Colors walked by the crossfade
    pub palette: Palette,
    /// Duration of one palette transition in warped time
    pub fade: Duration,
    pub warp: TimeWarpConfig,
    pub lightning: LightningConfig,
    /// Minimum hold time classified as a long press
    pub long_press: Duration,
    /// Seed of the engine's random generator
    ///
    /// The default is a constant, so every boot replays the same burst
    /// schedule. Feed a value from a hardware RNG or another entropy source
    /// on real devices.
    pub seed: u64,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            led_count: DEFAULT_LED_COUNT,
            fps: DEFAULT_FPS,
            brightness: DEFAULT_BRIGHTNESS,
            palette: &HALLOWEEN_PALETTE,
            fade: DEFAULT_FADE,
            warp: TimeWarpConfig::default(),
            lightning: LightningConfig::default(),
            long_press: DEFAULT_LONG_PRESS,
            seed: DEFAULT_SEED,
        }
    }
}

impl StormConfig {
    /// Frame budget derived from the target frame rate
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    /// Check the configuration against a frame buffer of `capacity` LEDs
    pub fn validate(&self, capacity: usize) -> Result<(), ConfigError> {
        if self.led_count == 0 {
            return Err(ConfigError::NoLeds);
        }
        if self.led_count > capacity {
            return Err(ConfigError::TooManyLeds {
                requested: self.led_count,
                capacity,
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(ConfigError::BrightnessOutOfRange);
        }
        if self.fade.as_millis() == 0 {
            return Err(ConfigError::ZeroFade);
        }
        self.warp.validate()?;
        self.lightning.validate()
    }
}

impl TimeWarpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period.as_millis() == 0 {
            return Err(ConfigError::ZeroWarpPeriod);
        }
        if !(0.0..1.0).contains(&self.depth) {
            return Err(ConfigError::WarpDepthOutOfRange);
        }
        Ok(())
    }
}

impl LightningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = self.flash_count;
        if counts.min == 0 || !counts.is_ordered() {
            return Err(ConfigError::InvalidRange("flash count"));
        }
        // One slot stays free for the post-flicker
        if usize::from(counts.max) >= MAX_FLASHES {
            return Err(ConfigError::TooManyFlashes {
                max: MAX_FLASHES - 1,
            });
        }
        if self.flash_duration_ms.min == 0 || !self.flash_duration_ms.is_ordered() {
            return Err(ConfigError::InvalidRange("flash duration"));
        }
        if !self.gap_ms.is_ordered() {
            return Err(ConfigError::InvalidRange("flash gap"));
        }
        if !self.jitter_ms.is_ordered() {
            return Err(ConfigError::InvalidRange("flash jitter"));
        }
        if i64::from(self.gap_ms.min) + i64::from(self.jitter_ms.min) < 0 {
            return Err(ConfigError::NegativeSpacing);
        }
        if self.decay.as_millis() == 0 || self.post_flicker_decay().as_millis() == 0 {
            return Err(ConfigError::ZeroDecay);
        }
        if !(0.0..=1.0).contains(&self.post_flicker_probability) {
            return Err(ConfigError::ProbabilityOutOfRange);
        }
        if !self.post_flicker_pause_ms.is_ordered() {
            return Err(ConfigError::InvalidRange("post-flicker pause"));
        }
        if self.post_flicker_duration_ms.min == 0
            || !self.post_flicker_duration_ms.is_ordered()
        {
            return Err(ConfigError::InvalidRange("post-flicker duration"));
        }
        Ok(())
    }
}
