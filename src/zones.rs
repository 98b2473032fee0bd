//! Distance zones and their visual / audible renderings.
//!
//! Every distance maps to exactly one zone.  Zone intervals are closed on
//! the lower bound and open on the upper one, except `Ok`, which also
//! claims the 200 cm edge; anything negative or beyond 200 cm is out of range.
//!
//! | Zone       | Range (cm)  | Colour      | Note         | Phase ticks |
//! |------------|-------------|-------------|--------------|-------------|
//! | Danger     | [0, 25)     | red         | DO  261 Hz   | 0 (steady)  |
//! | Warning    | [25, 50)    | yellow      | RE  293 Hz   | 5           |
//! | Caution    | [50, 150)   | green       | MI  329 Hz   | 10          |
//! | Info       | [150, 175)  | turquoise   | FA  349 Hz   | 15          |
//! | Ok         | [175, 200]  | blue        | SOL 392 Hz   | 20          |
//! | OutOfRange | otherwise   | off         | silence      | 0           |

use serde::{Deserialize, Serialize};

// ── Thresholds ────────────────────────────────────────────────

pub const DANGER_MIN_CM: i32 = 0;
pub const WARNING_MIN_CM: i32 = 25;
pub const CAUTION_MIN_CM: i32 = 50;
pub const INFO_MIN_CM: i32 = 150;
pub const OK_MIN_CM: i32 = 175;
pub const OK_MAX_CM: i32 = 200;

// ── Output values ─────────────────────────────────────────────

/// Colour with each channel 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const COLOR_RED: Rgb = Rgb::new(255, 0, 0);
pub const COLOR_YELLOW: Rgb = Rgb::new(237, 237, 0);
pub const COLOR_GREEN: Rgb = Rgb::new(0, 255, 0);
pub const COLOR_TURQUOISE: Rgb = Rgb::new(26, 89, 82);
pub const COLOR_BLUE: Rgb = Rgb::new(0, 0, 255);
pub const COLOR_OFF: Rgb = Rgb::new(0, 0, 0);

/// Buzzer tone; 0 Hz is silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u32,
}

impl Tone {
    pub const SILENT: Tone = Tone::hz(0);

    pub const fn hz(frequency_hz: u32) -> Self {
        Self { frequency_hz }
    }

    pub const fn is_silent(self) -> bool {
        self.frequency_hz == 0
    }
}

pub const NOTE_DO: Tone = Tone::hz(261);
pub const NOTE_RE: Tone = Tone::hz(293);
pub const NOTE_MI: Tone = Tone::hz(329);
pub const NOTE_FA: Tone = Tone::hz(349);
pub const NOTE_SOL: Tone = Tone::hz(392);

// ── Zone ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Zone {
    Danger,
    Warning,
    Caution,
    Info,
    Ok,
    OutOfRange,
}

impl Zone {
    /// Classify a distance in centimetres.
    pub fn classify(distance_cm: i32) -> Self {
        match distance_cm {
            DANGER_MIN_CM..WARNING_MIN_CM => Self::Danger,
            WARNING_MIN_CM..CAUTION_MIN_CM => Self::Warning,
            CAUTION_MIN_CM..INFO_MIN_CM => Self::Caution,
            INFO_MIN_CM..OK_MIN_CM => Self::Info,
            OK_MIN_CM..=OK_MAX_CM => Self::Ok,
            _ => Self::OutOfRange,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Danger => COLOR_RED,
            Self::Warning => COLOR_YELLOW,
            Self::Caution => COLOR_GREEN,
            Self::Info => COLOR_TURQUOISE,
            Self::Ok => COLOR_BLUE,
            Self::OutOfRange => COLOR_OFF,
        }
    }

    pub fn note(self) -> Tone {
        match self {
            Self::Danger => NOTE_DO,
            Self::Warning => NOTE_RE,
            Self::Caution => NOTE_MI,
            Self::Info => NOTE_FA,
            Self::Ok => NOTE_SOL,
            Self::OutOfRange => Tone::SILENT,
        }
    }

    /// Length of each sounding / silent phase in buzzer phase-timer ticks.
    /// Zero means the tone never pauses.
    pub fn phase_ticks(self) -> u32 {
        match self {
            Self::Danger | Self::OutOfRange => 0,
            Self::Warning => 5,
            Self::Caution => 10,
            Self::Info => 15,
            Self::Ok => 20,
        }
    }
}
