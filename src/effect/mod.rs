//! Strip layers
//!
//! The palette crossfade paints the base layer every frame. Lightning is
//! rendered after it and overrides it while a burst is playing.

mod crossfade;
mod lightning;

pub use crossfade::PaletteCrossfade;
pub use lightning::{
    BurstPlan, DEFAULT_DECAY, DEFAULT_FALLOFF, DEFAULT_HUE, DEFAULT_MEAN_INTERVAL,
    DEFAULT_SATURATION, FlashInterval, Lightning, LightningConfig, MAX_FLASHES, falloff,
};
