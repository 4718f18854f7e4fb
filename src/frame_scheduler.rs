//! Frame loop
//!
//! One tick renders a frame, pushes it to the output, polls the button and
//! drains control signals. The caller sleeps between ticks, or hands a delay
//! provider to [`FrameScheduler::run`] and lets it do so.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
#[cfg(feature = "esp32-log")]
use esp_println::println;
use rand::{SeedableRng, rngs::SmallRng};

use crate::button::{ButtonClassifier, ButtonEvent, ButtonInput, ButtonState};
use crate::config::{ConfigError, StormConfig};
use crate::control::{ControlReceiver, ControlSignal};
use crate::renderer::Renderer;
use crate::OutputDriver;

/// Result of a frame tick
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// End of this frame's budget
    pub deadline: Instant,
    /// Press classified during this frame
    pub button: Option<ButtonEvent>,
    /// `false` once a shutdown was requested
    pub running: bool,
}

impl FrameResult {
    /// Time left in the frame budget, zero on overrun
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline
            .checked_duration_since(now)
            .unwrap_or(Duration::from_millis(0))
    }
}

/// Fixed-rate frame loop
///
/// Owns the output, the button input and the engine's random generator.
pub struct FrameScheduler<
    'a,
    O: OutputDriver,
    B: ButtonInput,
    const MAX_LEDS: usize,
    const CONTROL_SIZE: usize,
> {
    output: O,
    button: B,
    classifier: ButtonClassifier,
    controls: ControlReceiver<'a, CONTROL_SIZE>,
    renderer: Renderer<MAX_LEDS>,
    rng: SmallRng,
    frame_duration: Duration,
    running: bool,
}

impl<'a, O: OutputDriver, B: ButtonInput, const MAX_LEDS: usize, const CONTROL_SIZE: usize>
    FrameScheduler<'a, O, B, MAX_LEDS, CONTROL_SIZE>
{
    /// Create a frame loop starting at `now`
    pub fn new(
        config: &StormConfig,
        output: O,
        button: B,
        controls: ControlReceiver<'a, CONTROL_SIZE>,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let renderer = Renderer::new(config, now, &mut rng)?;

        Ok(Self {
            output,
            button,
            classifier: ButtonClassifier::new(config.long_press),
            controls,
            renderer,
            rng,
            frame_duration: config.frame_duration(),
            running: true,
        })
    }

    /// Activate the output; call once before the first tick
    pub fn start(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!("[storm] starting, {} LEDs", self.renderer.led_count());
        self.output.start();
    }

    /// Process one frame
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let frame = self.renderer.render(now, &mut self.rng);
        self.output.write(frame);

        let button = self.classifier.poll(self.button.is_pressed(), now);
        match button {
            Some(ButtonEvent::Short) => self.renderer.trigger_lightning(now, &mut self.rng),
            Some(ButtonEvent::Long) => {
                // Long presses have no action yet
                #[cfg(feature = "esp32-log")]
                println!("[storm] long press ignored");
            }
            None => {}
        }

        self.process_controls(now);

        FrameResult {
            deadline: now + self.frame_duration,
            button,
            running: self.running,
        }
    }

    /// Drain pending control signals (non-blocking)
    fn process_controls(&mut self, now: Instant) {
        while let Some(signal) = self.controls.try_receive() {
            match signal {
                ControlSignal::TriggerLightning => {
                    self.renderer.trigger_lightning(now, &mut self.rng);
                }
                ControlSignal::Shutdown => {
                    self.running = false;
                }
            }
        }
    }

    /// Run until a shutdown signal arrives, then blank the strip
    ///
    /// Reads the time from `Instant::now`, so a time driver must be present.
    pub fn run<D: DelayNs>(&mut self, delay: &mut D) {
        self.start();
        while self.running {
            let result = self.tick(Instant::now());
            if !result.running {
                break;
            }

            let remaining = result.remaining(Instant::now());
            if remaining.as_millis() > 0 {
                delay.delay_ms(u32::try_from(remaining.as_millis()).unwrap_or(u32::MAX));
            }
        }
        self.shutdown();
    }

    /// Turn every LED off and stop the loop
    pub fn shutdown(&mut self) {
        let frame = self.renderer.blackout();
        self.output.write(frame);
        self.running = false;
        #[cfg(feature = "esp32-log")]
        println!("[storm] stopped; LEDs off");
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub const fn renderer(&self) -> &Renderer<MAX_LEDS> {
        &self.renderer
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub const fn button_state(&self) -> ButtonState {
        self.classifier.state()
    }
}
