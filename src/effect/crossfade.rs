//! Palette crossfade
//!
//! Walks the palette one entry per fade period, easing between neighbours.
//! Each LED is shifted along the walk by its position on the strip, so the
//! colors travel down the strip as a wave instead of fading in lockstep.

use embassy_time::Duration;

use crate::{
    color::{Palette, Rgb},
    math::smootherstep,
};

/// Base layer: eased crossfade over a cyclic palette
#[derive(Debug, Clone)]
pub struct PaletteCrossfade {
    palette: Palette,
    fade_ms: f64,
    brightness: f32,
}

impl PaletteCrossfade {
    #[allow(clippy::cast_precision_loss)]
    pub fn new(palette: Palette, fade: Duration, brightness: f32) -> Self {
        Self {
            palette,
            fade_ms: fade.as_millis().max(1) as f64,
            brightness,
        }
    }

    /// Color of LED `index` out of `count` at the given warped time
    ///
    /// Returns `None` for an empty palette.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn color_at(&self, warped_ms: f64, index: usize, count: usize) -> Option<Rgb> {
        let len = self.palette.len();
        if len == 0 {
            return None;
        }

        let span = count.saturating_sub(1).max(1) as f64;
        let offset = index as f64 / span * self.fade_ms;
        let cycle_ms = len as f64 * self.fade_ms;

        let t = libm::fmod(warped_ms + offset, cycle_ms);
        let t = if t < 0.0 { t + cycle_ms } else { t };
        let fade_pos = t / self.fade_ms;
        let whole = libm::floor(fade_pos);

        let from = (whole as usize) % len;
        let to = (from + 1) % len;
        let amount = smootherstep((fade_pos - whole) as f32);

        Some(self.mix(self.palette[from], self.palette[to], amount))
    }

    /// Paint the whole strip
    pub fn render(&self, warped_ms: f64, leds: &mut [Rgb]) {
        if self.palette.is_empty() {
            return;
        }

        let count = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            if let Some(color) = self.color_at(warped_ms, i, count) {
                *led = color;
            }
        }
    }

    fn mix(&self, a: Rgb, b: Rgb, amount: f32) -> Rgb {
        Rgb {
            r: self.mix_channel(a.r, b.r, amount),
            g: self.mix_channel(a.g, b.g, amount),
            b: self.mix_channel(a.b, b.b, amount),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn mix_channel(&self, a: u8, b: u8, amount: f32) -> u8 {
        let a = f32::from(a);
        let b = f32::from(b);
        let value = (a + (b - a) * amount) * self.brightness;
        value.clamp(0.0, 255.0) as u8
    }
}
