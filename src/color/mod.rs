mod palette;
mod utils;

pub use palette::{HALLOWEEN_PALETTE, Palette};
use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use utils::{hsv2rgb, rgb_from_u32};

pub type Rgb = RGB8;
pub type Hsv = HSV;
