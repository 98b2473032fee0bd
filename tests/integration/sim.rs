//! Simulated board for integration tests.
//!
//! Wraps a [`Registry`] and plays the part of the interrupt handlers:
//! the SysTick clock, the buzzer phase timer, the new-measurement timer
//! and the echo capture edges.

use urbanite::config::SystemConfig;
use urbanite::drivers::Registry;
use urbanite::drivers::ultrasound::UltrasoundLine;
use urbanite::fsm::ultrasound::UltrasoundState;
use urbanite::fsm::urbanite::Urbanite;

/// Rising-edge timer value used for every simulated echo.
pub const ECHO_START_TICK: u32 = 1_000;

pub fn boot(hw: &Registry) -> Urbanite<'_, Registry> {
    Urbanite::new(hw, &SystemConfig::default()).unwrap()
}

pub fn ultrasound_line(hw: &Registry) -> &UltrasoundLine {
    hw.ultrasound(0).unwrap()
}

/// Physical button level.  The line is active-low.
pub fn set_button(hw: &Registry, pressed: bool) {
    hw.button(0).unwrap().on_edge(!pressed);
}

/// Advance simulated time one millisecond at a time, running one loop
/// iteration per millisecond and firing the periodic timer ISRs.
pub fn run_for(hw: &Registry, sys: &mut Urbanite<'_, Registry>, ms: u32) {
    for _ in 0..ms {
        hw.advance_millis(1);
        let now = urbanite::app::ports::SystemPort::millis(hw);
        if now % urbanite::board::BUZZER_PHASE_TICK_MS == 0 {
            hw.buzzer(0).unwrap().on_phase_tick();
        }
        if now % urbanite::board::MEASUREMENT_PERIOD_MS == 0 {
            ultrasound_line(hw).on_measurement_timeout();
        }
        sys.run_cycle();
    }
}

/// Hold the button for `ms` and release it, then let the release debounce
/// settle.
pub fn press_for(hw: &Registry, sys: &mut Urbanite<'_, Registry>, ms: u32) {
    set_button(hw, true);
    run_for(hw, sys, ms);
    set_button(hw, false);
    let settle = sys.button().debounce_ms() + 2;
    run_for(hw, sys, settle);
}

/// Round-trip echo ticks that convert back to exactly `cm`.
pub fn ticks_for_cm(cm: u32) -> u32 {
    cm * 20_000 / 343
}

/// Drive one full trigger/echo exchange that measures `cm`.  Loop
/// iterations run without advancing the clock.
pub fn echo(hw: &Registry, sys: &mut Urbanite<'_, Registry>, cm: u32) {
    let line = ultrasound_line(hw);
    if sys.ultrasound().state() != UltrasoundState::TriggerStart {
        line.on_measurement_timeout();
        sys.run_cycle();
    }
    assert_eq!(sys.ultrasound().state(), UltrasoundState::TriggerStart);

    line.on_trigger_elapsed();
    sys.run_cycle();
    assert_eq!(sys.ultrasound().state(), UltrasoundState::WaitEchoStart);

    line.on_echo_capture(ECHO_START_TICK);
    sys.run_cycle();
    assert_eq!(sys.ultrasound().state(), UltrasoundState::WaitEchoEnd);

    line.on_echo_capture(ECHO_START_TICK + ticks_for_cm(cm));
    sys.run_cycle();
    assert_eq!(sys.ultrasound().state(), UltrasoundState::SetDistance);
}

/// Power the system on with a press just over the power threshold.
pub fn power_on(hw: &Registry, sys: &mut Urbanite<'_, Registry>) {
    let hold = sys.on_off_press_ms() + 100;
    press_for(hw, sys, hold);
}
