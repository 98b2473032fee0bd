//! Colour feedback machine.
//!
//! ```text
//!  Idle ──enabled──▶ Active ──new distance──▶ Active (render zone colour)
//!   ▲                  │
//!   └────disabled──────┘
//! ```
//!
//! Activation and deactivation both blank the lamp.  The machine is busy
//! only while enabled with a distance it has not rendered yet.

use super::{Fsm, Transition, port_write};
use crate::app::ports::{DeviceId, DisplayPort};
use crate::error::Result;
use crate::zones::{COLOR_OFF, Zone};

const NAME: &str = "display";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    Active,
}

pub(crate) struct DisplayCtx<'a, H> {
    hw: &'a H,
    id: DeviceId,
    distance_cm: i32,
    new_color: bool,
    status: bool,
    idle: bool,
}

fn check_active<H>(c: &DisplayCtx<'_, H>) -> bool {
    c.status
}

fn check_new_color<H>(c: &DisplayCtx<'_, H>) -> bool {
    c.new_color
}

fn check_off<H>(c: &DisplayCtx<'_, H>) -> bool {
    !c.status
}

fn do_set_on<H: DisplayPort>(c: &mut DisplayCtx<'_, H>) {
    port_write(NAME, c.hw.set_color(c.id, COLOR_OFF));
}

fn do_set_color<H: DisplayPort>(c: &mut DisplayCtx<'_, H>) {
    let zone = Zone::classify(c.distance_cm);
    port_write(NAME, c.hw.set_color(c.id, zone.color()));
    c.new_color = false;
    c.idle = true;
}

fn do_set_off<H: DisplayPort>(c: &mut DisplayCtx<'_, H>) {
    port_write(NAME, c.hw.set_color(c.id, COLOR_OFF));
    c.idle = false;
}

pub struct DisplayFsm<'a, H: DisplayPort> {
    fsm: Fsm<DisplayState, DisplayCtx<'a, H>, 3>,
    ctx: DisplayCtx<'a, H>,
}

impl<'a, H: DisplayPort> DisplayFsm<'a, H> {
    /// Transition rows, evaluated top to bottom.
    const TABLE: [Transition<DisplayState, DisplayCtx<'a, H>>; 3] = [
        Transition {
            from: DisplayState::Idle,
            guard: check_active::<H>,
            to: DisplayState::Active,
            action: Some(do_set_on::<H>),
        },
        Transition {
            from: DisplayState::Active,
            guard: check_new_color::<H>,
            to: DisplayState::Active,
            action: Some(do_set_color::<H>),
        },
        Transition {
            from: DisplayState::Active,
            guard: check_off::<H>,
            to: DisplayState::Idle,
            action: Some(do_set_off::<H>),
        },
    ];

    pub fn new(hw: &'a H, id: DeviceId) -> Result<Self> {
        hw.init_display(id)?;
        Ok(Self {
            fsm: Fsm::new(NAME, Self::TABLE),
            ctx: DisplayCtx {
                hw,
                id,
                distance_cm: -1,
                new_color: false,
                status: false,
                idle: false,
            },
        })
    }

    pub fn fire(&mut self) -> Option<DisplayState> {
        self.fsm.fire(&mut self.ctx)
    }

    pub fn state(&self) -> DisplayState {
        self.fsm.state()
    }

    pub fn set_state(&mut self, state: DisplayState) {
        self.fsm.set_state(state);
    }

    /// Queue a distance for rendering on the next fire.  The machine is no
    /// longer idle until it has been drawn.
    pub fn set_distance(&mut self, distance_cm: i32) {
        self.ctx.distance_cm = distance_cm;
        self.ctx.new_color = true;
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
