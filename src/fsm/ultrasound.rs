//! Ultrasonic ranging machine.
//!
//! ```text
//!  WaitStart ──on & ready──▶ TriggerStart ──trigger end──▶ WaitEchoStart
//!      ▲                          ▲                             │ rising edge
//!      │ off                      │ on & ready                  ▼
//!      └──────────────────── SetDistance ◀──echo received── WaitEchoEnd
//! ```
//!
//! Any non-idle state drops back to `WaitStart` once the machine is stopped.
//!
//! Each echo yields one raw sample.  Samples fill a window of five; when the
//! window completes, its median becomes the reported distance and the
//! new-measurement flag is raised.  Single multipath spikes never reach
//! the consumer.

use heapless::Vec;

use super::{Fsm, Transition, port_read, port_write};
use crate::app::ports::{DeviceId, EchoCapture, UltrasoundPort};
use crate::board::{ECHO_TIMER_MAX, SPEED_OF_SOUND_M_S};
use crate::error::Result;

/// Raw samples per reported distance.
pub const SAMPLE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UltrasoundState {
    WaitStart,
    TriggerStart,
    WaitEchoStart,
    WaitEchoEnd,
    SetDistance,
}

// ---------------------------------------------------------------------------
// Time of flight
// ---------------------------------------------------------------------------

/// Echo timer ticks between the two capture edges, corrected for every
/// wrap of the 16-bit timer in between.
pub fn time_of_flight_ticks(capture: &EchoCapture) -> u64 {
    let span = u64::from(ECHO_TIMER_MAX) + 1;
    (u64::from(capture.end_tick) + u64::from(capture.overflows) * span)
        .saturating_sub(u64::from(capture.init_tick))
}

/// Round-trip microseconds to one-way centimetres, rounded to nearest.
pub fn ticks_to_cm(ticks: u64) -> u32 {
    // cm = µs · 343 m/s · 100 cm/m / 1e6 µs/s / 2
    let scaled = ticks * u64::from(SPEED_OF_SOUND_M_S);
    ((scaled + 10_000) / 20_000).min(u64::from(u32::MAX)) as u32
}

// ---------------------------------------------------------------------------
// Median window
// ---------------------------------------------------------------------------

/// Fixed window of raw samples; the fill level is the write index.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: Vec<u32, SAMPLE_WINDOW>,
}

impl SampleWindow {
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Store a sample.  Returns the median once the window completes, and
    /// starts the next window empty.
    pub fn push(&mut self, cm: u32) -> Option<u32> {
        if self.samples.push(cm).is_err() {
            // Only reachable if a full window was never drained.
            self.samples.clear();
            return None;
        }
        if !self.samples.is_full() {
            return None;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_unstable();
        self.samples.clear();
        Some(sorted[SAMPLE_WINDOW / 2])
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

// ---------------------------------------------------------------------------
// Context, guards and actions
// ---------------------------------------------------------------------------

const NAME: &str = "ultrasound";

pub(crate) struct UltrasoundCtx<'a, H> {
    hw: &'a H,
    id: DeviceId,
    status: bool,
    new_measurement: bool,
    distance_cm: u32,
    window: SampleWindow,
}

fn check_on<H: UltrasoundPort>(c: &UltrasoundCtx<'_, H>) -> bool {
    c.status && port_read(NAME, c.hw.trigger_ready(c.id)) == Some(true)
}

fn check_off<H>(c: &UltrasoundCtx<'_, H>) -> bool {
    !c.status
}

fn check_trigger_end<H: UltrasoundPort>(c: &UltrasoundCtx<'_, H>) -> bool {
    port_read(NAME, c.hw.trigger_end(c.id)) == Some(true)
}

fn check_echo_init<H: UltrasoundPort>(c: &UltrasoundCtx<'_, H>) -> bool {
    port_read(NAME, c.hw.echo_init_tick(c.id)).is_some_and(|t| t > 0)
}

fn check_echo_received<H: UltrasoundPort>(c: &UltrasoundCtx<'_, H>) -> bool {
    port_read(NAME, c.hw.echo_received(c.id)) == Some(true)
}

fn do_start_measurement<H: UltrasoundPort>(c: &mut UltrasoundCtx<'_, H>) {
    port_write(NAME, c.hw.start_measurement(c.id));
}

fn do_stop_trigger<H: UltrasoundPort>(c: &mut UltrasoundCtx<'_, H>) {
    port_write(NAME, c.hw.stop_trigger_timer(c.id));
    port_write(NAME, c.hw.set_trigger_end(c.id, false));
}

fn do_set_distance<H: UltrasoundPort>(c: &mut UltrasoundCtx<'_, H>) {
    if let Some(capture) = port_read(NAME, c.hw.echo_capture(c.id)) {
        let cm = ticks_to_cm(time_of_flight_ticks(&capture));
        if let Some(median) = c.window.push(cm) {
            c.distance_cm = median;
            c.new_measurement = true;
        }
    }
    port_write(NAME, c.hw.stop_echo_timer(c.id));
    port_write(NAME, c.hw.reset_echo_ticks(c.id));
}

fn do_stop_measurement<H: UltrasoundPort>(c: &mut UltrasoundCtx<'_, H>) {
    port_write(NAME, c.hw.stop_ultrasound(c.id));
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

pub struct UltrasoundFsm<'a, H: UltrasoundPort> {
    fsm: Fsm<UltrasoundState, UltrasoundCtx<'a, H>, 9>,
    ctx: UltrasoundCtx<'a, H>,
}

impl<'a, H: UltrasoundPort> UltrasoundFsm<'a, H> {
    /// Transition rows, evaluated top to bottom.
    const TABLE: [Transition<UltrasoundState, UltrasoundCtx<'a, H>>; 9] = {
        use UltrasoundState::{SetDistance, TriggerStart, WaitEchoEnd, WaitEchoStart, WaitStart};
        [
            Transition { from: WaitStart, guard: check_on::<H>, to: TriggerStart, action: Some(do_start_measurement::<H>) },
            Transition { from: TriggerStart, guard: check_trigger_end::<H>, to: WaitEchoStart, action: Some(do_stop_trigger::<H>) },
            Transition { from: TriggerStart, guard: check_off::<H>, to: WaitStart, action: Some(do_stop_measurement::<H>) },
            Transition { from: WaitEchoStart, guard: check_echo_init::<H>, to: WaitEchoEnd, action: None },
            Transition { from: WaitEchoStart, guard: check_off::<H>, to: WaitStart, action: Some(do_stop_measurement::<H>) },
            Transition { from: WaitEchoEnd, guard: check_echo_received::<H>, to: SetDistance, action: Some(do_set_distance::<H>) },
            Transition { from: WaitEchoEnd, guard: check_off::<H>, to: WaitStart, action: Some(do_stop_measurement::<H>) },
            Transition { from: SetDistance, guard: check_on::<H>, to: TriggerStart, action: Some(do_start_measurement::<H>) },
            Transition { from: SetDistance, guard: check_off::<H>, to: WaitStart, action: Some(do_stop_measurement::<H>) },
        ]
    };

    /// Build the machine (stopped) and initialise the transceiver.
    pub fn new(hw: &'a H, id: DeviceId) -> Result<Self> {
        hw.init_ultrasound(id)?;
        Ok(Self {
            fsm: Fsm::new(NAME, Self::TABLE),
            ctx: UltrasoundCtx {
                hw,
                id,
                status: false,
                new_measurement: false,
                distance_cm: 0,
                window: SampleWindow::new(),
            },
        })
    }

    pub fn fire(&mut self) -> Option<UltrasoundState> {
        self.fsm.fire(&mut self.ctx)
    }

    pub fn state(&self) -> UltrasoundState {
        self.fsm.state()
    }

    pub fn set_state(&mut self, state: UltrasoundState) {
        self.fsm.set_state(state);
    }

    /// Arm ranging with a fresh window and an immediate first trigger.
    pub fn start(&mut self) {
        let c = &mut self.ctx;
        c.status = true;
        c.window.clear();
        c.distance_cm = 0;
        c.new_measurement = false;
        port_write(NAME, c.hw.reset_echo_ticks(c.id));
        port_write(NAME, c.hw.set_trigger_ready(c.id, true));
        port_write(NAME, c.hw.start_new_measurement_timer(c.id));
    }

    /// Halt ranging and quiesce the transceiver.  Idempotent.
    pub fn stop(&mut self) {
        self.ctx.status = false;
        port_write(NAME, self.ctx.hw.stop_ultrasound(self.ctx.id));
    }

    /// Last median distance in centimetres.  Consumes the new-measurement flag.
    pub fn distance(&mut self) -> u32 {
        self.ctx.new_measurement = false;
        self.ctx.distance_cm
    }

    pub fn new_measurement_ready(&self) -> bool {
        self.ctx.new_measurement
    }

    pub fn status(&self) -> bool {
        self.ctx.status
    }

    pub fn set_status(&mut self, status: bool) {
        self.ctx.status = status;
    }

    /// Whether the transceiver is armed for the next trigger.
    pub fn ready(&self) -> bool {
        port_read(NAME, self.ctx.hw.trigger_ready(self.ctx.id)).unwrap_or(false)
    }

    /// Samples collected towards the current window.
    pub fn pending_samples(&self) -> usize {
        self.ctx.window.len()
    }

    pub fn id(&self) -> DeviceId {
        self.ctx.id
    }

    /// Publish a finished median as if a window had just completed.
    #[cfg(test)]
    pub(crate) fn inject_measurement(&mut self, distance_cm: u32) {
        self.ctx.distance_cm = distance_cm;
        self.ctx.new_measurement = true;
    }

    /// Ranging never holds the system awake, even mid-measurement.
    pub fn check_activity(&self) -> bool {
        false
    }
}
