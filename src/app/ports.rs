//! Port traits: the boundary between the state machines and the hardware.
//!
//! ```text
//!   ISR / HAL ──▶ Registry (implements ports) ──▶ state machines
//! ```
//!
//! Every operation is synchronous and non-blocking.  Methods take `&self`
//! because the state behind them is shared with interrupt handlers and is
//! therefore interior-mutable (atomics or critical-section cells).  A lookup
//! with an identity the implementation does not know returns
//! [`Error::UnknownDevice`](crate::error::Error::UnknownDevice).

use crate::error::Result;
use crate::zones::{Rgb, Tone};

/// Identity of one device inside its family table.
pub type DeviceId = u32;

// ───────────────────────────────────────────────────────────────
// System clock / power
// ───────────────────────────────────────────────────────────────

/// The sole time source for every debounce and timeout guard.
pub trait SystemPort {
    /// Milliseconds since boot (wraps at `u32::MAX`).
    fn millis(&self) -> u32;

    /// Enter the low-power wait until the next interrupt.
    fn sleep(&self);
}

// ───────────────────────────────────────────────────────────────
// Digital input (push-button)
// ───────────────────────────────────────────────────────────────

pub trait ButtonPort {
    fn init_button(&self, id: DeviceId) -> Result<()>;

    /// Debounce-free pressed flag maintained by the edge ISR.
    fn is_pressed(&self, id: DeviceId) -> Result<bool>;

    /// Raw electrical level of the input line (`true` = high).
    fn raw_value(&self, id: DeviceId) -> Result<bool>;

    fn set_pressed(&self, id: DeviceId, pressed: bool) -> Result<()>;

    fn pending_interrupt(&self, id: DeviceId) -> Result<bool>;

    fn clear_pending_interrupt(&self, id: DeviceId) -> Result<()>;

    fn disable_interrupts(&self, id: DeviceId) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Ultrasonic transceiver
// ───────────────────────────────────────────────────────────────

/// Consistent snapshot of the three echo-timing fields plus the
/// received flag.  Always read and written as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EchoCapture {
    /// Timer value captured on the rising edge of the echo line.
    pub init_tick: u32,
    /// Timer value captured on the falling edge of the echo line.
    pub end_tick: u32,
    /// Number of timer wraps between the two edges.
    pub overflows: u32,
    /// Set together with `end_tick`.
    pub received: bool,
}

pub trait UltrasoundPort {
    fn init_ultrasound(&self, id: DeviceId) -> Result<()>;

    /// Raise the trigger line and start the trigger, echo and
    /// new-measurement timers.  Clears `trigger_ready`.
    fn start_measurement(&self, id: DeviceId) -> Result<()>;

    /// Stop every timer, drop the trigger line and clear the echo capture.
    /// Idempotent; safe from any state.
    fn stop_ultrasound(&self, id: DeviceId) -> Result<()>;

    /// Drop the trigger line and stop the trigger timer.
    fn stop_trigger_timer(&self, id: DeviceId) -> Result<()>;

    fn stop_echo_timer(&self, id: DeviceId) -> Result<()>;

    fn start_new_measurement_timer(&self, id: DeviceId) -> Result<()>;

    fn stop_new_measurement_timer(&self, id: DeviceId) -> Result<()>;

    /// Zero the echo capture record.
    fn reset_echo_ticks(&self, id: DeviceId) -> Result<()>;

    fn trigger_ready(&self, id: DeviceId) -> Result<bool>;

    fn set_trigger_ready(&self, id: DeviceId, ready: bool) -> Result<()>;

    fn trigger_end(&self, id: DeviceId) -> Result<bool>;

    fn set_trigger_end(&self, id: DeviceId, end: bool) -> Result<()>;

    /// Atomic snapshot of the echo capture record.
    fn echo_capture(&self, id: DeviceId) -> Result<EchoCapture>;

    /// Replace the echo capture record as one unit.
    fn set_echo_capture(&self, id: DeviceId, capture: EchoCapture) -> Result<()>;

    fn echo_init_tick(&self, id: DeviceId) -> Result<u32> {
        Ok(self.echo_capture(id)?.init_tick)
    }

    fn echo_end_tick(&self, id: DeviceId) -> Result<u32> {
        Ok(self.echo_capture(id)?.end_tick)
    }

    fn echo_overflows(&self, id: DeviceId) -> Result<u32> {
        Ok(self.echo_capture(id)?.overflows)
    }

    fn echo_received(&self, id: DeviceId) -> Result<bool> {
        Ok(self.echo_capture(id)?.received)
    }
}

// ───────────────────────────────────────────────────────────────
// Colour output
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    fn init_display(&self, id: DeviceId) -> Result<()>;

    fn set_color(&self, id: DeviceId, color: Rgb) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Tone output
// ───────────────────────────────────────────────────────────────

pub trait BuzzerPort {
    fn init_buzzer(&self, id: DeviceId) -> Result<()>;

    /// Drive a tone; a frequency of 0 Hz means silence.
    fn set_tone(&self, id: DeviceId, tone: Tone) -> Result<()>;

    /// Phase-timer ticks elapsed since the last reset.
    fn phase_counter(&self, id: DeviceId) -> Result<u32>;

    fn reset_phase_counter(&self, id: DeviceId) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Umbrella
// ───────────────────────────────────────────────────────────────

/// Everything the coordinator and its four peers need from one board.
pub trait Board: SystemPort + ButtonPort + UltrasoundPort + DisplayPort + BuzzerPort {}

impl<T> Board for T where T: SystemPort + ButtonPort + UltrasoundPort + DisplayPort + BuzzerPort {}
