//! Device registry: the interrupt-shared state of every peripheral, keyed
//! by device identity.
//!
//! The registry is passed by reference into each machine at construction
//! rather than living as ambient global state.  On target it is usually a
//! `static` (all constructors are `const`) so ISRs can reach the same lines;
//! on the host, tests build one per case.
//!
//! ```text
//!   ISR ──▶ line.on_*()      ┐
//!                            ├── Registry ──▶ ports ──▶ state machines
//!   HAL adapters ──▶ lines   ┘
//! ```

pub mod button;
pub mod buzzer;
pub mod display;
pub mod ultrasound;

use core::sync::atomic::{AtomicU32, Ordering};

use button::ButtonLine;
use buzzer::BuzzerLine;
use display::RgbLine;
use log::{info, trace};
use ultrasound::UltrasoundLine;

use crate::app::ports::{
    ButtonPort, BuzzerPort, DeviceId, DisplayPort, EchoCapture, SystemPort, UltrasoundPort,
};
use crate::board::{BUTTON_COUNT, BUZZER_COUNT, DISPLAY_COUNT, ULTRASOUND_COUNT};
use crate::error::{DeviceKind, Error, Result};
use crate::zones::{Rgb, Tone};

pub struct Registry {
    buttons: [ButtonLine; BUTTON_COUNT],
    ultrasounds: [UltrasoundLine; ULTRASOUND_COUNT],
    displays: [RgbLine; DISPLAY_COUNT],
    buzzers: [BuzzerLine; BUZZER_COUNT],
    millis: AtomicU32,
    sleeps: AtomicU32,
}

fn lookup<T>(table: &[T], kind: DeviceKind, id: DeviceId) -> Result<&T> {
    usize::try_from(id)
        .ok()
        .and_then(|i| table.get(i))
        .ok_or(Error::UnknownDevice { kind, id })
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            buttons: [const { ButtonLine::new() }; BUTTON_COUNT],
            ultrasounds: [const { UltrasoundLine::new() }; ULTRASOUND_COUNT],
            displays: [const { RgbLine::new() }; DISPLAY_COUNT],
            buzzers: [const { BuzzerLine::new() }; BUZZER_COUNT],
            millis: AtomicU32::new(0),
            sleeps: AtomicU32::new(0),
        }
    }

    pub fn button(&self, id: DeviceId) -> Result<&ButtonLine> {
        lookup(&self.buttons, DeviceKind::Button, id)
    }

    pub fn ultrasound(&self, id: DeviceId) -> Result<&UltrasoundLine> {
        lookup(&self.ultrasounds, DeviceKind::Ultrasound, id)
    }

    pub fn display(&self, id: DeviceId) -> Result<&RgbLine> {
        lookup(&self.displays, DeviceKind::Display, id)
    }

    pub fn buzzer(&self, id: DeviceId) -> Result<&BuzzerLine> {
        lookup(&self.buzzers, DeviceKind::Buzzer, id)
    }

    // -----------------------------------------------------------------------
    // System tick
    // -----------------------------------------------------------------------

    /// SysTick ISR body: advance the millisecond clock.
    pub fn advance_millis(&self, ms: u32) {
        self.millis.fetch_add(ms, Ordering::AcqRel);
    }

    pub fn set_millis(&self, ms: u32) {
        self.millis.store(ms, Ordering::Release);
    }

    /// Number of low-power requests since boot.
    pub fn sleep_count(&self) -> u32 {
        self.sleeps.load(Ordering::Acquire)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Port implementations
// ---------------------------------------------------------------------------

impl SystemPort for Registry {
    fn millis(&self) -> u32 {
        self.millis.load(Ordering::Acquire)
    }

    fn sleep(&self) {
        // The core only records the request; the binary issues the actual
        // wait-for-interrupt.
        self.sleeps.fetch_add(1, Ordering::AcqRel);
        trace!("sleep requested");
    }
}

impl ButtonPort for Registry {
    fn init_button(&self, id: DeviceId) -> Result<()> {
        self.button(id)?.init();
        info!("button {id} ready");
        Ok(())
    }

    fn is_pressed(&self, id: DeviceId) -> Result<bool> {
        Ok(self.button(id)?.is_pressed())
    }

    fn raw_value(&self, id: DeviceId) -> Result<bool> {
        Ok(self.button(id)?.raw_high())
    }

    fn set_pressed(&self, id: DeviceId, pressed: bool) -> Result<()> {
        self.button(id)?.set_pressed(pressed);
        Ok(())
    }

    fn pending_interrupt(&self, id: DeviceId) -> Result<bool> {
        Ok(self.button(id)?.pending())
    }

    fn clear_pending_interrupt(&self, id: DeviceId) -> Result<()> {
        self.button(id)?.clear_pending();
        Ok(())
    }

    fn disable_interrupts(&self, id: DeviceId) -> Result<()> {
        self.button(id)?.disable_interrupts();
        Ok(())
    }
}

impl UltrasoundPort for Registry {
    fn init_ultrasound(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.init();
        info!("ultrasound {id} ready");
        Ok(())
    }

    fn start_measurement(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.start_measurement();
        Ok(())
    }

    fn stop_ultrasound(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.stop();
        Ok(())
    }

    fn stop_trigger_timer(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.stop_trigger_timer();
        Ok(())
    }

    fn stop_echo_timer(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.stop_echo_timer();
        Ok(())
    }

    fn start_new_measurement_timer(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.start_measurement_timer();
        Ok(())
    }

    fn stop_new_measurement_timer(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.stop_measurement_timer();
        Ok(())
    }

    fn reset_echo_ticks(&self, id: DeviceId) -> Result<()> {
        self.ultrasound(id)?.reset_echo();
        Ok(())
    }

    fn trigger_ready(&self, id: DeviceId) -> Result<bool> {
        Ok(self.ultrasound(id)?.trigger_ready())
    }

    fn set_trigger_ready(&self, id: DeviceId, ready: bool) -> Result<()> {
        self.ultrasound(id)?.set_trigger_ready(ready);
        Ok(())
    }

    fn trigger_end(&self, id: DeviceId) -> Result<bool> {
        Ok(self.ultrasound(id)?.trigger_end())
    }

    fn set_trigger_end(&self, id: DeviceId, end: bool) -> Result<()> {
        self.ultrasound(id)?.set_trigger_end(end);
        Ok(())
    }

    fn echo_capture(&self, id: DeviceId) -> Result<EchoCapture> {
        Ok(self.ultrasound(id)?.echo())
    }

    fn set_echo_capture(&self, id: DeviceId, capture: EchoCapture) -> Result<()> {
        self.ultrasound(id)?.set_echo(capture);
        Ok(())
    }
}

impl DisplayPort for Registry {
    fn init_display(&self, id: DeviceId) -> Result<()> {
        self.display(id)?.init();
        info!("display {id} ready");
        Ok(())
    }

    fn set_color(&self, id: DeviceId, color: Rgb) -> Result<()> {
        self.display(id)?.set_color(color);
        Ok(())
    }
}

impl BuzzerPort for Registry {
    fn init_buzzer(&self, id: DeviceId) -> Result<()> {
        self.buzzer(id)?.init();
        info!("buzzer {id} ready");
        Ok(())
    }

    fn set_tone(&self, id: DeviceId, tone: Tone) -> Result<()> {
        self.buzzer(id)?.set_tone(tone);
        Ok(())
    }

    fn phase_counter(&self, id: DeviceId) -> Result<u32> {
        Ok(self.buzzer(id)?.phase_counter())
    }

    fn reset_phase_counter(&self, id: DeviceId) -> Result<()> {
        self.buzzer(id)?.reset_phase_counter();
        Ok(())
    }
}
