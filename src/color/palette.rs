use crate::color::{Rgb, rgb_from_u32};

/// Ordered color table walked by the crossfade; the last entry wraps to the first.
pub type Palette = &'static [Rgb];

/// Create a palette from a list of hex colors (0xRRGGBB format)
macro_rules! hex_palette {
    ($($color:expr),*) => {
        [
            $(rgb_from_u32($color)),*
        ]
    };
}

// Halloween palette: toxic greens, bruised purples and lantern oranges
#[allow(clippy::unreadable_literal)]
pub const HALLOWEEN_PALETTE: [Rgb; 12] = hex_palette![
    0xAAFF50, // Toxic green
    0x780A96, // Deep purple
    0xFFE15A, // Lantern yellow
    0xFF5A14, // Blood orange
    0x1EB43C, // Swamp green
    0xBE288C, // Bruise magenta
    0xFFBE28, // Pumpkin glow
    0x50006E, // Midnight violet
    0xFF3C00, // Fiery red
    0x1428FF, // Electric blue
    0xFF82C8, // Ghostly pink
    0x64FFC8  // Ectoplasm teal
];
