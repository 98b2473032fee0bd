//! Ultrasonic transceiver line: trigger output, echo input capture and the
//! three timers around them.
//!
//! ## Timers
//!
//! | Timer           | Period          | ISR                                    |
//! |-----------------|-----------------|----------------------------------------|
//! | trigger         | 10 µs one-shot  | [`UltrasoundLine::on_trigger_elapsed`] |
//! | echo (16-bit)   | 1 µs tick       | [`UltrasoundLine::on_echo_capture`], [`UltrasoundLine::on_echo_overflow`] |
//! | new measurement | 100 ms periodic | [`UltrasoundLine::on_measurement_timeout`] |
//!
//! Single-word flags are atomics.  The echo capture record spans several
//! words and is only touched inside a critical section, so the ranging
//! machine always sees a consistent snapshot.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

use crate::app::ports::EchoCapture;

const NO_ECHO: EchoCapture = EchoCapture {
    init_tick: 0,
    end_tick: 0,
    overflows: 0,
    received: false,
};

pub struct UltrasoundLine {
    trigger_high: AtomicBool,
    trigger_ready: AtomicBool,
    trigger_end: AtomicBool,
    trigger_timer: AtomicBool,
    echo_timer: AtomicBool,
    measurement_timer: AtomicBool,
    echo: Mutex<Cell<EchoCapture>>,
}

impl UltrasoundLine {
    pub const fn new() -> Self {
        Self {
            trigger_high: AtomicBool::new(false),
            trigger_ready: AtomicBool::new(false),
            trigger_end: AtomicBool::new(false),
            trigger_timer: AtomicBool::new(false),
            echo_timer: AtomicBool::new(false),
            measurement_timer: AtomicBool::new(false),
            echo: Mutex::new(Cell::new(NO_ECHO)),
        }
    }

    /// Trigger low, every timer stopped, capture cleared.
    pub fn init(&self) {
        self.stop();
        self.trigger_ready.store(false, Ordering::Release);
        self.trigger_end.store(false, Ordering::Release);
    }

    // -----------------------------------------------------------------------
    // Main-loop side
    // -----------------------------------------------------------------------

    pub fn start_measurement(&self) {
        self.trigger_ready.store(false, Ordering::Release);
        self.trigger_high.store(true, Ordering::Release);
        self.trigger_timer.store(true, Ordering::Release);
        self.echo_timer.store(true, Ordering::Release);
        self.measurement_timer.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.stop_trigger_timer();
        self.stop_echo_timer();
        self.stop_measurement_timer();
        self.reset_echo();
    }

    pub fn stop_trigger_timer(&self) {
        self.trigger_high.store(false, Ordering::Release);
        self.trigger_timer.store(false, Ordering::Release);
    }

    pub fn stop_echo_timer(&self) {
        self.echo_timer.store(false, Ordering::Release);
    }

    pub fn start_measurement_timer(&self) {
        self.measurement_timer.store(true, Ordering::Release);
    }

    pub fn stop_measurement_timer(&self) {
        self.measurement_timer.store(false, Ordering::Release);
    }

    pub fn reset_echo(&self) {
        self.set_echo(NO_ECHO);
    }

    pub fn echo(&self) -> EchoCapture {
        critical_section::with(|cs| self.echo.borrow(cs).get())
    }

    pub fn set_echo(&self, capture: EchoCapture) {
        critical_section::with(|cs| self.echo.borrow(cs).set(capture));
    }

    pub fn trigger_ready(&self) -> bool {
        self.trigger_ready.load(Ordering::Acquire)
    }

    pub fn set_trigger_ready(&self, ready: bool) {
        self.trigger_ready.store(ready, Ordering::Release);
    }

    pub fn trigger_end(&self) -> bool {
        self.trigger_end.load(Ordering::Acquire)
    }

    pub fn set_trigger_end(&self, end: bool) {
        self.trigger_end.store(end, Ordering::Release);
    }

    /// Level currently driven on the trigger pin.
    pub fn trigger_high(&self) -> bool {
        self.trigger_high.load(Ordering::Acquire)
    }

    pub fn echo_timer_running(&self) -> bool {
        self.echo_timer.load(Ordering::Acquire)
    }

    pub fn measurement_timer_running(&self) -> bool {
        self.measurement_timer.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // ISR side
    // -----------------------------------------------------------------------

    /// Trigger pulse width elapsed.
    pub fn on_trigger_elapsed(&self) {
        if self.trigger_timer.load(Ordering::Acquire) {
            self.trigger_end.store(true, Ordering::Release);
        }
    }

    /// New-measurement period elapsed: arm the next trigger.
    pub fn on_measurement_timeout(&self) {
        if self.measurement_timer.load(Ordering::Acquire) {
            self.trigger_ready.store(true, Ordering::Release);
        }
    }

    /// Echo timer wrapped past its 16-bit range.
    pub fn on_echo_overflow(&self) {
        if !self.echo_timer_running() {
            return;
        }
        critical_section::with(|cs| {
            let cell = self.echo.borrow(cs);
            let mut c = cell.get();
            c.overflows = c.overflows.wrapping_add(1);
            cell.set(c);
        });
    }

    /// Echo edge captured at timer value `tick`.  The first edge of a
    /// measurement stores the rising tick; the next stores the falling tick
    /// and marks the echo received.
    pub fn on_echo_capture(&self, tick: u32) {
        if !self.echo_timer_running() {
            return;
        }
        critical_section::with(|cs| {
            let cell = self.echo.borrow(cs);
            let mut c = cell.get();
            if c.init_tick == 0 && c.end_tick == 0 {
                c.init_tick = tick;
            } else {
                c.end_tick = tick;
                c.received = true;
            }
            cell.set(c);
        });
    }
}

impl Default for UltrasoundLine {
    fn default() -> Self {
        Self::new()
    }
}
