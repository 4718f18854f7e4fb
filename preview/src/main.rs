//! Desktop preview app for myrtio-storm-composer
//!
//! Runs the frame scheduler against synthetic time and draws the strip in a
//! window. The on-screen button (or the space bar) stands in for the
//! physical one; other controls post signals through the control channel.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Instant as StdInstant, SystemTime, UNIX_EPOCH};

use eframe::egui::{self};
use myrtio_storm_composer::{
    ConfigError, ControlChannel, ControlSender, FrameScheduler, Instant, OutputDriver, Rgb,
    StormConfig,
    button::{ButtonEvent, ButtonInput},
    config::{DEFAULT_BRIGHTNESS, DEFAULT_LED_COUNT},
};

/// Maximum number of LEDs the renderer supports
const MAX_LEDS: usize = 180;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 12.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

/// Control channel size
const CONTROL_SIZE: usize = 8;

/// Static control channel for communication between UI and scheduler
static CONTROLS: ControlChannel<CONTROL_SIZE> = ControlChannel::<CONTROL_SIZE>::new();

type Scheduler = FrameScheduler<'static, PreviewOutput, UiButton, MAX_LEDS, CONTROL_SIZE>;

/// Keeps the last frame written by the scheduler
#[derive(Default)]
struct PreviewOutput {
    frame: Vec<Rgb>,
}

impl OutputDriver for PreviewOutput {
    fn write(&mut self, colors: &[Rgb]) {
        self.frame.clear();
        self.frame.extend_from_slice(colors);
    }
}

/// Button state shared with the UI
#[derive(Clone, Default)]
struct UiButton(Rc<Cell<bool>>);

impl ButtonInput for UiButton {
    fn is_pressed(&mut self) -> bool {
        self.0.get()
    }
}

/// Fresh seed per run so bursts differ between launches
#[allow(clippy::cast_possible_truncation)]
fn boot_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 420.0])
            .with_title("Storm Composer Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-storm-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()?))),
    )
}

struct PreviewApp {
    /// The frame loop under preview
    scheduler: Scheduler,
    /// Control sender for UI actions
    controls: ControlSender<'static, CONTROL_SIZE>,
    /// Simulated physical button
    button: UiButton,

    /// Synthetic time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether animation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// LED pixel size for display
    led_size: f32,
    /// Number of LEDs to display
    led_count: usize,
    /// Palette brightness (0.0-1.0)
    brightness: f32,
    /// Last classified press
    last_event: Option<ButtonEvent>,
    /// Set once the scheduler has shut down
    stopped: bool,
}

impl PreviewApp {
    fn new() -> Result<Self, ConfigError> {
        let button = UiButton::default();
        let scheduler =
            Self::build_scheduler(DEFAULT_LED_COUNT, DEFAULT_BRIGHTNESS, button.clone(), 0)?;

        Ok(Self {
            scheduler,
            controls: CONTROLS.sender(),
            button,
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            led_size: LED_SIZE,
            led_count: DEFAULT_LED_COUNT,
            brightness: DEFAULT_BRIGHTNESS,
            last_event: None,
            stopped: false,
        })
    }

    /// Configuration is fixed per scheduler, so settings changes rebuild it
    fn build_scheduler(
        led_count: usize,
        brightness: f32,
        button: UiButton,
        t_ms: u64,
    ) -> Result<Scheduler, ConfigError> {
        let config = StormConfig {
            led_count,
            brightness,
            seed: boot_seed(),
            ..StormConfig::default()
        };
        let mut scheduler = FrameScheduler::new(
            &config,
            PreviewOutput::default(),
            button,
            CONTROLS.receiver(),
            Instant::from_millis(t_ms),
        )?;
        scheduler.start();
        Ok(scheduler)
    }

    fn rebuild(&mut self) {
        if let Ok(scheduler) = Self::build_scheduler(
            self.led_count,
            self.brightness,
            self.button.clone(),
            self.t_ms,
        ) {
            self.scheduler = scheduler;
            self.stopped = false;
        }
    }

    /// Reset time to zero
    fn reset_time(&mut self) {
        self.t_ms = 0;
        self.last_frame = StdInstant::now();
        self.last_event = None;
        self.rebuild();
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
            let delta_ms_f64 = if delta_ms_f64.is_finite() {
                #[allow(clippy::cast_precision_loss)]
                delta_ms_f64.clamp(0.0, u64::MAX as f64)
            } else {
                0.0
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_ms = delta_ms_f64 as u64;
            self.t_ms = self.t_ms.wrapping_add(delta_ms);
        }
    }

    /// Advance the scheduler by one frame
    #[allow(clippy::print_stdout)]
    fn step(&mut self) {
        if self.stopped {
            return;
        }

        let result = self.scheduler.tick(Instant::from_millis(self.t_ms));
        if result.button.is_some() {
            self.last_event = result.button;
        }
        if !result.running {
            self.scheduler.shutdown();
            self.stopped = true;
            println!("[storm-preview] stopped; LEDs off");
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();
        self.step();

        let frame = self.scheduler.output().frame.clone();
        let now = Instant::from_millis(self.t_ms);

        // Request continuous repaint for animation
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("⏮ Reset").clicked() {
                            self.reset_time();
                        }
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        let secs = self.t_ms / 1000;
                        let ms = self.t_ms % 1000;
                        ui.label(format!("Time: {secs}.{ms:03}s"));
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(
                            egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true),
                        );
                    });
                });
                // </PlaybackControls>
                ui.add_space(16.0);
                // <StormControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        let hold = ui.button("● Button (hold)");
                        let space = ui.input(|input| input.key_down(egui::Key::Space));
                        self.button.0.set(hold.is_pointer_button_down_on() || space);

                        if ui.button("⚡ Lightning").clicked() {
                            let _ = self.controls.trigger_lightning();
                        }
                        if ui.button("⏹ Stop").clicked() {
                            let _ = self.controls.shutdown();
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        let event = match self.last_event {
                            Some(ButtonEvent::Short) => "short",
                            Some(ButtonEvent::Long) => "long",
                            None => "-",
                        };
                        ui.label(format!("Last press: {event}"));
                        ui.add_space(8.0);

                        let renderer = self.scheduler.renderer();
                        let state = if self.stopped {
                            "stopped"
                        } else if renderer.lightning().is_active() {
                            "burst"
                        } else {
                            "idle"
                        };
                        ui.label(format!("Lightning: {state}"));
                        ui.add_space(8.0);
                        ui.label(format!(
                            "Warp: {:.2}x",
                            renderer.time_warp().speed_at(now)
                        ));
                    });
                });
                // </StormControls>
                ui.add_space(16.0);
                // <StripSettings>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Size: ");
                        ui.add(egui::Slider::new(&mut self.led_size, 4.0..=32.0));
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("LEDs:");
                        let old_led_count = self.led_count;
                        ui.add(egui::Slider::new(&mut self.led_count, 1usize..=MAX_LEDS));
                        if self.led_count != old_led_count {
                            self.rebuild();
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Brightness:");
                        let old_brightness = self.brightness;
                        ui.add(egui::Slider::new(&mut self.brightness, 0.0..=1.0));
                        if (self.brightness - old_brightness).abs() > f32::EPSILON {
                            self.rebuild();
                        }
                    });
                });
                // </StripSettings>
            });

            ui.add_space(16.0);

            // === LED Display ===
            let available_width = ui.available_width();
            let led_pitch = self.led_size + LED_GAP;

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leds_per_row = (available_width / led_pitch).floor().max(1.0) as usize;
            let rows = frame.len().max(1).div_ceil(leds_per_row);
            #[allow(clippy::cast_precision_loss)]
            let height = rows as f32 * led_pitch;

            let (response, painter) =
                ui.allocate_painter(egui::vec2(available_width, height), egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (i, pixel) in frame.iter().enumerate() {
                let row = i / leds_per_row;
                let col = i % leds_per_row;
                let x = origin.x + col as f32 * led_pitch;
                let y = origin.y + row as f32 * led_pitch;

                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                let color = egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b);
                painter.rect_filled(rect, 3.0, color);
            }
        });
    }
}
