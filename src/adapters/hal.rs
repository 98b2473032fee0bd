//! `embedded-hal` 1.0 bridges between board pins and registry lines.
//!
//! | Adapter        | Pin trait      | Line              |
//! |----------------|----------------|-------------------|
//! | `ButtonInput`  | `InputPin`     | [`ButtonLine`]    |
//! | `TriggerOutput`| `OutputPin`    | [`UltrasoundLine`]|
//! | `RgbOutput`    | `SetDutyCycle` | [`RgbLine`]       |
//! | `ToneOutput`   | `SetDutyCycle` | [`BuzzerLine`]    |
//!
//! Inputs feed the line's ISR body; outputs mirror what the state machines
//! last wrote into a line.  HAL errors stay in the adapter's signature and
//! never reach the machines.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;

use crate::drivers::button::ButtonLine;
use crate::drivers::buzzer::BuzzerLine;
use crate::drivers::display::RgbLine;
use crate::drivers::ultrasound::UltrasoundLine;
use crate::zones::{Rgb, Tone};

// ── Button ────────────────────────────────────────────────────

/// Polled edge detector for boards without a pin-change interrupt.
pub struct ButtonInput<P> {
    pin: P,
    last_high: Option<bool>,
}

impl<P: InputPin> ButtonInput<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_high: None,
        }
    }

    /// Sample the pin and raise an edge on the line when the level changed.
    /// Returns whether an edge was raised.
    pub fn poll(&mut self, line: &ButtonLine) -> Result<bool, P::Error> {
        let high = self.pin.is_high()?;
        if self.last_high == Some(high) {
            return Ok(false);
        }
        self.last_high = Some(high);
        line.on_edge(high);
        Ok(true)
    }

    pub fn release(self) -> P {
        self.pin
    }
}

// ── Ultrasound trigger ────────────────────────────────────────

pub struct TriggerOutput<P> {
    pin: P,
}

impl<P: OutputPin> TriggerOutput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Drive the pin to the trigger level the line currently requests.
    pub fn sync(&mut self, line: &UltrasoundLine) -> Result<(), P::Error> {
        self.pin.set_state(PinState::from(line.trigger_high()))
    }

    pub fn release(self) -> P {
        self.pin
    }
}

// ── RGB indicator ─────────────────────────────────────────────

pub struct RgbOutput<P> {
    red: P,
    green: P,
    blue: P,
    shown: Option<Rgb>,
}

impl<P: SetDutyCycle> RgbOutput<P> {
    pub fn new(red: P, green: P, blue: P) -> Self {
        Self {
            red,
            green,
            blue,
            shown: None,
        }
    }

    /// Scale each 0–255 channel onto its PWM range.  Unchanged colours are
    /// not rewritten.
    pub fn apply(&mut self, line: &RgbLine) -> Result<(), P::Error> {
        let color = line.color();
        if self.shown == Some(color) {
            return Ok(());
        }
        self.red.set_duty_cycle_fraction(u16::from(color.r), 255)?;
        self.green.set_duty_cycle_fraction(u16::from(color.g), 255)?;
        self.blue.set_duty_cycle_fraction(u16::from(color.b), 255)?;
        self.shown = Some(color);
        Ok(())
    }
}

// ── Buzzer ────────────────────────────────────────────────────

/// Square-wave buzzer channel.  The PWM frequency itself belongs to the
/// timer driver, so [`ToneOutput::apply`] reports tone changes for the
/// caller to retune it.
pub struct ToneOutput<P> {
    channel: P,
    playing: Option<Tone>,
}

impl<P: SetDutyCycle> ToneOutput<P> {
    pub fn new(channel: P) -> Self {
        Self {
            channel,
            playing: None,
        }
    }

    /// Returns the new tone when it differs from the one playing.
    pub fn apply(&mut self, line: &BuzzerLine) -> Result<Option<Tone>, P::Error> {
        let tone = line.tone();
        if self.playing == Some(tone) {
            return Ok(None);
        }
        if tone.is_silent() {
            self.channel.set_duty_cycle_fully_off()?;
        } else {
            self.channel.set_duty_cycle_percent(50)?;
        }
        self.playing = Some(tone);
        Ok(Some(tone))
    }
}
