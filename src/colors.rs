//! Default gauge palette.
//!
//! The ring is drawn as translucent white lamps over a dark base, with a red
//! glow around lit lamps. All colors are `palette` sRGB values in 0.0-1.0.

use palette::{Srgb, Srgba};

/// Glow colors of the default two-layer halo.
pub const GLOW_OUTER: Srgb = Srgb::new(0xD3 as f32 / 255.0, 0.0, 0.0);
pub const GLOW_INNER: Srgb = Srgb::new(0xD0 as f32 / 255.0, 0x78 as f32 / 255.0, 0x72 as f32 / 255.0);

/// Fill of a dimmed lamp: black at 60% opacity.
pub fn disabled_fill() -> Srgba {
    Srgba::new(0.0, 0.0, 0.0, 0.6)
}

/// Fill of a lit lamp: white at 80% opacity.
pub fn enabled_fill() -> Srgba {
    Srgba::new(1.0, 1.0, 1.0, 0.8)
}

/// Creates an RGB color from a `0xRRGGBB` literal.
#[inline]
pub fn hex(rgb: u32) -> Srgb {
    let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
    Srgb::new(channel(16), channel(8), channel(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;

    fn close(a: Srgb, b: Srgb) -> bool {
        (a.red - b.red).abs() < 0.001
            && (a.green - b.green).abs() < 0.001
            && (a.blue - b.blue).abs() < 0.001
    }

    #[test]
    fn hex_matches_glow_constants() {
        assert!(close(hex(0xD30000), GLOW_OUTER));
        assert!(close(hex(0xD07872), GLOW_INNER));
        assert!(close(hex(0xFFFFFF), Srgb::new(1.0, 1.0, 1.0)));
    }
}
