//! Top-level coordinator: power, pause cadence, distance routing and sleep.
//!
//! ```text
//!            long press                       no activity
//!   Off ───────────────────▶ Measure ─────────────────────▶ SleepWhileOn
//!    ▲ │ ◀──────long press─── │  ▲ ◀──new measure / activity──── │ ▲
//!    │ │                      │  │                                └─┘ no activity
//!    │ │ no activity          └──┘ short press: cycle cadence
//!    │ ▼                           new measure: forward distance
//!   SleepWhileOff ─┐
//!     ▲  activity  │ no activity
//!     └────────────┘
//! ```
//!
//! A single button is disambiguated by press duration: longer than
//! `on_off_press_ms` toggles power, between `pause_display_ms` and
//! `on_off_press_ms` cycles the feedback cadence
//! (pulsed → continuous → paused → pulsed).  Every transition that consumes
//! a press resets the stored duration so one press never fires twice.
//!
//! While paused, distances are suppressed unless the object is within half
//! the warning threshold.

use log::info;

use super::button::ButtonFsm;
use super::buzzer::{BuzzerFsm, Cadence};
use super::display::DisplayFsm;
use super::ultrasound::UltrasoundFsm;
use super::{Fsm, Transition};
use crate::app::ports::Board;
use crate::board::{
    PARKING_BUTTON_ID, PARKING_BUZZER_ID, REAR_PARKING_DISPLAY_ID, REAR_PARKING_SENSOR_ID,
};
use crate::config::SystemConfig;
use crate::error::Result;
use crate::zones::WARNING_MIN_CM;

/// Below this distance feedback is forced on even while paused.
pub const PAUSE_OVERRIDE_CM: i32 = WARNING_MIN_CM / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrbaniteState {
    Off,
    Measure,
    SleepWhileOff,
    SleepWhileOn,
}

/// Feedback cadence selected by short presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Pulsed,
    Continuous,
    Paused,
}

impl DisplayMode {
    pub fn next(self) -> Self {
        match self {
            Self::Pulsed => Self::Continuous,
            Self::Continuous => Self::Paused,
            Self::Paused => Self::Pulsed,
        }
    }
}

impl From<Cadence> for DisplayMode {
    fn from(cadence: Cadence) -> Self {
        match cadence {
            Cadence::Pulsed => Self::Pulsed,
            Cadence::Continuous => Self::Continuous,
        }
    }
}

pub(crate) struct UrbaniteCtx<'a, H: Board> {
    hw: &'a H,
    button: ButtonFsm<'a, H>,
    ultrasound: UltrasoundFsm<'a, H>,
    display: DisplayFsm<'a, H>,
    buzzer: BuzzerFsm<'a, H>,
    on_off_press_ms: u32,
    pause_display_ms: u32,
    initial_cadence: Cadence,
    paused: bool,
    mode: DisplayMode,
}

impl<H: Board> UrbaniteCtx<'_, H> {
    fn any_activity(&self) -> bool {
        self.button.check_activity()
            || self.ultrasound.check_activity()
            || self.display.check_activity()
            || self.buzzer.check_activity()
    }

    fn set_feedback(&mut self, enabled: bool) {
        self.display.set_status(enabled);
        self.buzzer.set_status(enabled);
    }

    fn forward_distance(&mut self, distance_cm: i32) {
        self.display.set_distance(distance_cm);
        self.buzzer.set_distance(distance_cm);
    }
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

fn check_on<H: Board>(c: &UrbaniteCtx<'_, H>) -> bool {
    let d = c.button.duration();
    d > 0 && d > c.on_off_press_ms
}

fn check_off<H: Board>(c: &UrbaniteCtx<'_, H>) -> bool {
    check_on(c)
}

fn check_pause_display<H: Board>(c: &UrbaniteCtx<'_, H>) -> bool {
    let d = c.button.duration();
    d > 0 && d < c.on_off_press_ms && d > c.pause_display_ms
}

fn check_new_measure<H: Board>(c: &UrbaniteCtx<'_, H>) -> bool {
    c.ultrasound.new_measurement_ready()
}

fn check_activity<H: Board>(c: &UrbaniteCtx<'_, H>) -> bool {
    c.any_activity()
}

fn check_no_activity<H: Board>(c: &UrbaniteCtx<'_, H>) -> bool {
    !c.any_activity()
}

fn check_wake_in_measure<H: Board>(c: &UrbaniteCtx<'_, H>) -> bool {
    check_new_measure(c) || c.any_activity()
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

fn do_start_up_measure<H: Board>(c: &mut UrbaniteCtx<'_, H>) {
    c.button.reset_duration();
    c.ultrasound.start();
    c.set_feedback(true);
    c.buzzer.set_cadence(c.initial_cadence);
    c.mode = c.initial_cadence.into();
    c.paused = false;
    info!("[urbanite][{}] system ON", c.hw.millis());
}

fn do_stop_urbanite<H: Board>(c: &mut UrbaniteCtx<'_, H>) {
    c.button.reset_duration();
    c.ultrasound.stop();
    c.set_feedback(false);
    c.paused = false;
    info!("[urbanite][{}] system OFF", c.hw.millis());
}

fn do_pause_display<H: Board>(c: &mut UrbaniteCtx<'_, H>) {
    c.button.reset_duration();
    c.mode = c.mode.next();
    c.paused = c.mode == DisplayMode::Paused;
    if c.mode == DisplayMode::Pulsed {
        c.buzzer.set_pulsed();
    } else {
        c.buzzer.set_continuous();
    }
    c.set_feedback(!c.paused);
    info!("[urbanite][{}] display mode {:?}", c.hw.millis(), c.mode);
}

fn do_display_distance<H: Board>(c: &mut UrbaniteCtx<'_, H>) {
    let distance_cm = i32::try_from(c.ultrasound.distance()).unwrap_or(i32::MAX);
    if !c.paused {
        c.forward_distance(distance_cm);
    } else if distance_cm < PAUSE_OVERRIDE_CM {
        c.forward_distance(distance_cm);
        c.set_feedback(true);
    } else {
        c.set_feedback(false);
    }
    info!("[urbanite][{}] distance: {} cm", c.hw.millis(), distance_cm);
}

fn do_sleep<H: Board>(c: &mut UrbaniteCtx<'_, H>) {
    c.hw.sleep();
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

pub struct Urbanite<'a, H: Board> {
    fsm: Fsm<UrbaniteState, UrbaniteCtx<'a, H>, 10>,
    ctx: UrbaniteCtx<'a, H>,
}

impl<'a, H: Board> Urbanite<'a, H> {
    /// Transition rows, evaluated top to bottom.
    const TABLE: [Transition<UrbaniteState, UrbaniteCtx<'a, H>>; 10] = {
        use UrbaniteState::{Measure, Off, SleepWhileOff, SleepWhileOn};
        [
            Transition { from: Off, guard: check_on::<H>, to: Measure, action: Some(do_start_up_measure::<H>) },
            Transition { from: Measure, guard: check_off::<H>, to: Off, action: Some(do_stop_urbanite::<H>) },
            Transition { from: Measure, guard: check_pause_display::<H>, to: Measure, action: Some(do_pause_display::<H>) },
            Transition { from: Measure, guard: check_new_measure::<H>, to: Measure, action: Some(do_display_distance::<H>) },
            Transition { from: Measure, guard: check_no_activity::<H>, to: SleepWhileOn, action: Some(do_sleep::<H>) },
            Transition { from: SleepWhileOn, guard: check_wake_in_measure::<H>, to: Measure, action: None },
            Transition { from: SleepWhileOn, guard: check_no_activity::<H>, to: SleepWhileOn, action: Some(do_sleep::<H>) },
            Transition { from: Off, guard: check_no_activity::<H>, to: SleepWhileOff, action: Some(do_sleep::<H>) },
            Transition { from: SleepWhileOff, guard: check_activity::<H>, to: Off, action: None },
            Transition { from: SleepWhileOff, guard: check_no_activity::<H>, to: SleepWhileOff, action: Some(do_sleep::<H>) },
        ]
    };

    /// Build the four peer machines on the board's fixed identities and
    /// wire them to a coordinator configured from `config`.
    pub fn new(hw: &'a H, config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        let button = ButtonFsm::new(hw, config.button_debounce_ms, PARKING_BUTTON_ID)?;
        let ultrasound = UltrasoundFsm::new(hw, REAR_PARKING_SENSOR_ID)?;
        let display = DisplayFsm::new(hw, REAR_PARKING_DISPLAY_ID)?;
        let buzzer = BuzzerFsm::new(hw, PARKING_BUZZER_ID)?;
        Ok(Self::from_parts(hw, config, button, ultrasound, display, buzzer))
    }

    /// Wire already-built peers.  The configuration is taken as given.
    pub fn from_parts(
        hw: &'a H,
        config: &SystemConfig,
        button: ButtonFsm<'a, H>,
        ultrasound: UltrasoundFsm<'a, H>,
        display: DisplayFsm<'a, H>,
        buzzer: BuzzerFsm<'a, H>,
    ) -> Self {
        Self {
            fsm: Fsm::new("urbanite", Self::TABLE),
            ctx: UrbaniteCtx {
                hw,
                button,
                ultrasound,
                display,
                buzzer,
                on_off_press_ms: config.on_off_press_ms,
                pause_display_ms: config.pause_display_ms,
                initial_cadence: config.initial_cadence,
                paused: false,
                mode: config.initial_cadence.into(),
            },
        }
    }

    /// Evaluate the coordinator table once.
    pub fn fire(&mut self) -> Option<UrbaniteState> {
        self.fsm.fire(&mut self.ctx)
    }

    /// One loop iteration: button, ranging, buzzer, display, then the
    /// coordinator itself.
    pub fn run_cycle(&mut self) -> UrbaniteState {
        self.ctx.button.fire();
        self.ctx.ultrasound.fire();
        self.ctx.buzzer.fire();
        self.ctx.display.fire();
        self.fire();
        self.state()
    }

    pub fn state(&self) -> UrbaniteState {
        self.fsm.state()
    }

    pub fn set_state(&mut self, state: UrbaniteState) {
        self.fsm.set_state(state);
    }

    pub fn is_paused(&self) -> bool {
        self.ctx.paused
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.ctx.mode
    }

    pub fn on_off_press_ms(&self) -> u32 {
        self.ctx.on_off_press_ms
    }

    pub fn pause_display_ms(&self) -> u32 {
        self.ctx.pause_display_ms
    }

    /// Whether any peer has unconsumed work.
    pub fn check_activity(&self) -> bool {
        self.ctx.any_activity()
    }

    pub fn button(&self) -> &ButtonFsm<'a, H> {
        &self.ctx.button
    }

    pub fn button_mut(&mut self) -> &mut ButtonFsm<'a, H> {
        &mut self.ctx.button
    }

    pub fn ultrasound(&self) -> &UltrasoundFsm<'a, H> {
        &self.ctx.ultrasound
    }

    pub fn ultrasound_mut(&mut self) -> &mut UltrasoundFsm<'a, H> {
        &mut self.ctx.ultrasound
    }

    pub fn display(&self) -> &DisplayFsm<'a, H> {
        &self.ctx.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayFsm<'a, H> {
        &mut self.ctx.display
    }

    pub fn buzzer(&self) -> &BuzzerFsm<'a, H> {
        &self.ctx.buzzer
    }

    pub fn buzzer_mut(&mut self) -> &mut BuzzerFsm<'a, H> {
        &mut self.ctx.buzzer
    }
}
