//! Tone feedback machine.
//!
//! ```text
//!  Idle ──enabled──▶ Sounding ──phase elapsed (pulsed)──▶ Silent
//!   ▲                 │  ▲  │ new distance                  │
//!   │                 │  │  └──▶ Sounding (zone note)       │
//!   │                 │  └────────phase elapsed─────────────┤
//!   └───disabled──────┴─────────────disabled────────────────┘
//! ```
//!
//! The phase counter is fed by a hardware timer and read once at the start
//! of every fire.  In [`Cadence::Pulsed`] the tone alternates between
//! sounding and silent phases of `phase_ticks` each; in
//! [`Cadence::Continuous`] it never enters the silent phase.

use serde::{Deserialize, Serialize};

use super::{Fsm, Transition, port_read, port_write};
use crate::app::ports::{BuzzerPort, DeviceId};
use crate::error::Result;
use crate::zones::{Tone, Zone};

const NAME: &str = "buzzer";

/// Phase length before the first distance arrives.
const INITIAL_PHASE_TICKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerState {
    Idle,
    Sounding,
    Silent,
}

/// How the tone is interrupted while an object is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// Alternate sounding and silent phases.
    Pulsed,
    /// Free-running tone.
    Continuous,
}

pub(crate) struct BuzzerCtx<'a, H> {
    hw: &'a H,
    id: DeviceId,
    distance_cm: i32,
    new_note: bool,
    status: bool,
    idle: bool,
    cadence: Cadence,
    phase_ticks: u32,
    elapsed: u32,
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

fn check_active<H>(c: &BuzzerCtx<'_, H>) -> bool {
    c.status
}

fn check_off<H>(c: &BuzzerCtx<'_, H>) -> bool {
    !c.status
}

fn check_new_note<H>(c: &BuzzerCtx<'_, H>) -> bool {
    c.new_note
}

fn check_on_time<H>(c: &BuzzerCtx<'_, H>) -> bool {
    c.cadence == Cadence::Pulsed && c.phase_ticks != 0 && c.elapsed > c.phase_ticks
}

fn check_off_time<H>(c: &BuzzerCtx<'_, H>) -> bool {
    c.elapsed > c.phase_ticks
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

fn do_silence<H: BuzzerPort>(c: &mut BuzzerCtx<'_, H>) {
    port_write(NAME, c.hw.set_tone(c.id, Tone::SILENT));
}

fn do_end_sounding<H: BuzzerPort>(c: &mut BuzzerCtx<'_, H>) {
    do_silence(c);
    port_write(NAME, c.hw.reset_phase_counter(c.id));
}

fn do_set_note<H: BuzzerPort>(c: &mut BuzzerCtx<'_, H>) {
    let zone = Zone::classify(c.distance_cm);
    port_write(NAME, c.hw.set_tone(c.id, zone.note()));
    c.phase_ticks = zone.phase_ticks();
    c.new_note = false;
    c.idle = true;
}

fn do_end_silence<H: BuzzerPort>(c: &mut BuzzerCtx<'_, H>) {
    do_set_note(c);
    port_write(NAME, c.hw.reset_phase_counter(c.id));
}

fn do_set_off<H: BuzzerPort>(c: &mut BuzzerCtx<'_, H>) {
    do_silence(c);
    c.idle = false;
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

pub struct BuzzerFsm<'a, H: BuzzerPort> {
    fsm: Fsm<BuzzerState, BuzzerCtx<'a, H>, 6>,
    ctx: BuzzerCtx<'a, H>,
}

impl<'a, H: BuzzerPort> BuzzerFsm<'a, H> {
    /// Transition rows, evaluated top to bottom.
    const TABLE: [Transition<BuzzerState, BuzzerCtx<'a, H>>; 6] = {
        use BuzzerState::{Idle, Silent, Sounding};
        [
            Transition { from: Idle, guard: check_active::<H>, to: Sounding, action: Some(do_silence::<H>) },
            Transition { from: Sounding, guard: check_on_time::<H>, to: Silent, action: Some(do_end_sounding::<H>) },
            Transition { from: Sounding, guard: check_new_note::<H>, to: Sounding, action: Some(do_set_note::<H>) },
            Transition { from: Sounding, guard: check_off::<H>, to: Idle, action: Some(do_set_off::<H>) },
            Transition { from: Silent, guard: check_off_time::<H>, to: Sounding, action: Some(do_end_silence::<H>) },
            Transition { from: Silent, guard: check_off::<H>, to: Idle, action: Some(do_set_off::<H>) },
        ]
    };

    pub fn new(hw: &'a H, id: DeviceId) -> Result<Self> {
        hw.init_buzzer(id)?;
        Ok(Self {
            fsm: Fsm::new(NAME, Self::TABLE),
            ctx: BuzzerCtx {
                hw,
                id,
                distance_cm: -1,
                new_note: false,
                status: false,
                idle: false,
                cadence: Cadence::Pulsed,
                phase_ticks: INITIAL_PHASE_TICKS,
                elapsed: 0,
            },
        })
    }

    /// Sample the phase counter, then evaluate the table.
    pub fn fire(&mut self) -> Option<BuzzerState> {
        if let Some(elapsed) = port_read(NAME, self.ctx.hw.phase_counter(self.ctx.id)) {
            self.ctx.elapsed = elapsed;
        }
        self.fsm.fire(&mut self.ctx)
    }

    pub fn state(&self) -> BuzzerState {
        self.fsm.state()
    }

    pub fn set_state(&mut self, state: BuzzerState) {
        self.fsm.set_state(state);
    }

    /// Queue a distance; its note sounds on the next fire while sounding.
    /// The machine is no longer idle until that note has been set.
    pub fn set_distance(&mut self, distance_cm: i32) {
        self.ctx.distance_cm = distance_cm;
        self.ctx.new_note = true;
        self.ctx.idle = false;
    }

    pub fn distance(&self) -> i32 {
        self.ctx.distance_cm
    }

    pub fn status(&self) -> bool {
        self.ctx.status
    }

    pub fn set_status(&mut self, status: bool) {
        self.ctx.status = status;
    }

    pub fn cadence(&self) -> Cadence {
        self.ctx.cadence
    }

    pub fn set_cadence(&mut self, cadence: Cadence) {
        self.ctx.cadence = cadence;
    }

    pub fn set_pulsed(&mut self) {
        self.set_cadence(Cadence::Pulsed);
    }

    pub fn set_continuous(&mut self) {
        self.set_cadence(Cadence::Continuous);
    }

    /// Current phase length in phase-timer ticks.
    pub fn phase_ticks(&self) -> u32 {
        self.ctx.phase_ticks
    }

    pub fn is_idle(&self) -> bool {
        self.ctx.idle
    }

    pub fn id(&self) -> DeviceId {
        self.ctx.id
    }

    pub fn check_activity(&self) -> bool {
        !self.ctx.idle && self.ctx.status
    }
}
