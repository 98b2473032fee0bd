//! RGB indicator line.  Holds the colour last written by the display
//! machine; a PWM adapter mirrors it onto the three channels.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::zones::{COLOR_OFF, Rgb};

/// Colour packed as `0x00RRGGBB` so it is read and written as one word.
pub struct RgbLine {
    packed: AtomicU32,
}

const fn pack(c: Rgb) -> u32 {
    ((c.r as u32) << 16) | ((c.g as u32) << 8) | c.b as u32
}

const fn unpack(v: u32) -> Rgb {
    Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

impl RgbLine {
    pub const fn new() -> Self {
        Self {
            packed: AtomicU32::new(pack(COLOR_OFF)),
        }
    }

    pub fn init(&self) {
        self.set_color(COLOR_OFF);
    }

    pub fn color(&self) -> Rgb {
        unpack(self.packed.load(Ordering::Acquire))
    }

    pub fn set_color(&self, color: Rgb) {
        self.packed.store(pack(color), Ordering::Release);
    }
}

impl Default for RgbLine {
    fn default() -> Self {
        Self::new()
    }
}
