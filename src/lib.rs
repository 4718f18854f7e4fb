#![no_std]

pub mod button;
pub mod color;
pub mod config;
pub mod control;
pub mod effect;
pub mod frame_scheduler;
pub mod math;
pub mod renderer;
pub mod time_warp;

pub use button::{ButtonClassifier, ButtonEvent, ButtonInput, ButtonSource};
pub use config::{ConfigError, Span, StormConfig};
pub use control::{ControlChannel, ControlReceiver, ControlSender, ControlSignal};
pub use effect::{BurstPlan, FlashInterval, Lightning, LightningConfig, PaletteCrossfade};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use renderer::Renderer;
pub use time_warp::{TimeWarp, TimeWarpConfig};

pub use color::{HALLOWEEN_PALETTE, Hsv, Palette, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Activate the strip; called once before the first frame
    fn start(&mut self) {}

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
