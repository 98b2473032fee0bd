//! Piezo buzzer line: tone frequency plus the phase counter fed by the
//! 25 ms phase timer.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::zones::Tone;

pub struct BuzzerLine {
    frequency_hz: AtomicU32,
    phase_counter: AtomicU32,
}

impl BuzzerLine {
    pub const fn new() -> Self {
        Self {
            frequency_hz: AtomicU32::new(0),
            phase_counter: AtomicU32::new(0),
        }
    }

    pub fn init(&self) {
        self.set_tone(Tone::SILENT);
        self.reset_phase_counter();
    }

    pub fn tone(&self) -> Tone {
        Tone::hz(self.frequency_hz.load(Ordering::Acquire))
    }

    pub fn set_tone(&self, tone: Tone) {
        self.frequency_hz.store(tone.frequency_hz, Ordering::Release);
    }

    /// Phase timer ISR.
    pub fn on_phase_tick(&self) {
        self.phase_counter.fetch_add(1, Ordering::AcqRel);
    }

    pub fn phase_counter(&self) -> u32 {
        self.phase_counter.load(Ordering::Acquire)
    }

    pub fn reset_phase_counter(&self) {
        self.phase_counter.store(0, Ordering::Release);
    }
}

impl Default for BuzzerLine {
    fn default() -> Self {
        Self::new()
    }
}
