//! Button debounce machine.
//!
//! ```text
//!  Released ──pressed──▶ PressedWait ──timeout──▶ Pressed
//!      ▲                                             │
//!      └──timeout── ReleasedWait ◀──released─────────┘
//! ```
//!
//! Entering `PressedWait` stamps the press start and arms the debounce
//! deadline; leaving `Pressed` stores the press duration and re-arms the
//! deadline for the release phase.  The duration is kept until a consumer
//! calls [`ButtonFsm::reset_duration`].

use super::{Fsm, Transition, port_read};
use crate::app::ports::{ButtonPort, DeviceId, SystemPort};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    PressedWait,
    Pressed,
    ReleasedWait,
}

pub(crate) struct ButtonCtx<'a, H> {
    hw: &'a H,
    id: DeviceId,
    debounce_ms: u32,
    next_timeout: u32,
    tick_pressed: u32,
    duration: u32,
}

/// `a` is strictly later than `b` on a wrapping millisecond clock.
pub(crate) fn time_after(a: u32, b: u32) -> bool {
    (a.wrapping_sub(b) as i32) > 0
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

fn pressed<H: ButtonPort>(c: &ButtonCtx<'_, H>) -> Option<bool> {
    port_read("button", c.hw.is_pressed(c.id))
}

fn check_pressed<H: ButtonPort>(c: &ButtonCtx<'_, H>) -> bool {
    pressed(c) == Some(true)
}

fn check_released<H: ButtonPort>(c: &ButtonCtx<'_, H>) -> bool {
    pressed(c) == Some(false)
}

fn check_timeout<H: SystemPort>(c: &ButtonCtx<'_, H>) -> bool {
    time_after(c.hw.millis(), c.next_timeout)
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

fn do_store_tick_pressed<H: SystemPort>(c: &mut ButtonCtx<'_, H>) {
    c.tick_pressed = c.hw.millis();
    c.next_timeout = c.tick_pressed.wrapping_add(c.debounce_ms);
}

fn do_set_duration<H: SystemPort>(c: &mut ButtonCtx<'_, H>) {
    let now = c.hw.millis();
    c.duration = now.wrapping_sub(c.tick_pressed);
    c.next_timeout = now.wrapping_add(c.debounce_ms);
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

pub struct ButtonFsm<'a, H: SystemPort + ButtonPort> {
    fsm: Fsm<ButtonState, ButtonCtx<'a, H>, 4>,
    ctx: ButtonCtx<'a, H>,
}

impl<'a, H: SystemPort + ButtonPort> ButtonFsm<'a, H> {
    /// Transition rows, evaluated top to bottom.
    const TABLE: [Transition<ButtonState, ButtonCtx<'a, H>>; 4] = [
        Transition {
            from: ButtonState::Released,
            guard: check_pressed::<H>,
            to: ButtonState::PressedWait,
            action: Some(do_store_tick_pressed::<H>),
        },
        Transition {
            from: ButtonState::PressedWait,
            guard: check_timeout::<H>,
            to: ButtonState::Pressed,
            action: None,
        },
        Transition {
            from: ButtonState::Pressed,
            guard: check_released::<H>,
            to: ButtonState::ReleasedWait,
            action: Some(do_set_duration::<H>),
        },
        Transition {
            from: ButtonState::ReleasedWait,
            guard: check_timeout::<H>,
            to: ButtonState::Released,
            action: None,
        },
    ];

    /// Build the machine and initialise the input line.
    pub fn new(hw: &'a H, debounce_ms: u32, id: DeviceId) -> Result<Self> {
        hw.init_button(id)?;
        Ok(Self {
            fsm: Fsm::new("button", Self::TABLE),
            ctx: ButtonCtx {
                hw,
                id,
                debounce_ms,
                next_timeout: 0,
                tick_pressed: 0,
                duration: 0,
            },
        })
    }

    pub fn fire(&mut self) -> Option<ButtonState> {
        self.fsm.fire(&mut self.ctx)
    }

    pub fn state(&self) -> ButtonState {
        self.fsm.state()
    }

    pub fn set_state(&mut self, state: ButtonState) {
        self.fsm.set_state(state);
    }

    /// Length of the last completed press in milliseconds, 0 once consumed.
    pub fn duration(&self) -> u32 {
        self.ctx.duration
    }

    pub fn reset_duration(&mut self) {
        self.ctx.duration = 0;
    }

    pub fn debounce_ms(&self) -> u32 {
        self.ctx.debounce_ms
    }

    pub fn id(&self) -> DeviceId {
        self.ctx.id
    }

    /// Anything but a settled release counts as activity.
    pub fn check_activity(&self) -> bool {
        self.state() != ButtonState::Released
    }
}
