use embassy_time::{Duration, Instant};
use rand::Rng;

use crate::color::Rgb;
use crate::config::{ConfigError, StormConfig};
use crate::effect::{Lightning, PaletteCrossfade};
use crate::time_warp::TimeWarp;

/// Composes the layers into one frame
///
/// Owns the frame buffer, the warped clock, the crossfade and the lightning
/// session. Random draws come from the caller's generator.
pub struct Renderer<const MAX_LEDS: usize> {
    warp: TimeWarp,
    crossfade: PaletteCrossfade,
    lightning: Lightning,
    led_count: usize,
    last_frame: Option<Instant>,
    frame_buffer: [Rgb; MAX_LEDS],
}

impl<const MAX_LEDS: usize> Renderer<MAX_LEDS> {
    /// Create a renderer; the first spontaneous burst is scheduled from `now`
    pub fn new<R: Rng + ?Sized>(
        config: &StormConfig,
        now: Instant,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate(MAX_LEDS)?;

        Ok(Self {
            warp: TimeWarp::new(&config.warp),
            crossfade: PaletteCrossfade::new(config.palette, config.fade, config.brightness),
            lightning: Lightning::new(config.lightning, now, rng),
            led_count: config.led_count,
            last_frame: None,
            frame_buffer: [Rgb::default(); MAX_LEDS],
        })
    }

    /// Render one frame
    ///
    /// Advances the warped clock by the real time since the previous frame,
    /// paints the palette, then lets lightning start and paint over it.
    pub fn render<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> &[Rgb] {
        let delta = self
            .last_frame
            .map_or(Duration::from_millis(0), |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);

        let warped_ms = self.warp.advance(delta, now);
        let frame = &mut self.frame_buffer[..self.led_count];
        self.crossfade.render(warped_ms, frame);

        self.lightning.maybe_trigger(now, rng);
        self.lightning.render(now, frame, rng);

        frame
    }

    /// Force a lightning burst starting at `now`
    pub fn trigger_lightning<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        self.lightning.trigger_now(now, rng);
    }

    /// Turn every LED off and return the blank frame
    pub fn blackout(&mut self) -> &[Rgb] {
        let frame = &mut self.frame_buffer[..self.led_count];
        frame.fill(Rgb::default());
        frame
    }

    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    pub const fn lightning(&self) -> &Lightning {
        &self.lightning
    }

    pub const fn time_warp(&self) -> &TimeWarp {
        &self.warp
    }
}
