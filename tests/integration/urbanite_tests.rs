//! Whole-system scenarios: power, cadence cycling, sleep and the paused
//! proximity override.

use urbanite::app::ports::SystemPort;
use urbanite::drivers::Registry;
use urbanite::fsm::buzzer::Cadence;
use urbanite::fsm::display::DisplayState;
use urbanite::fsm::urbanite::{DisplayMode, Urbanite, UrbaniteState};
use urbanite::zones::{COLOR_BLUE, COLOR_GREEN, COLOR_OFF, COLOR_RED, COLOR_YELLOW};

use crate::sim::{boot, echo, power_on, press_for, run_for, ultrasound_line};

fn run_cycles(sys: &mut Urbanite<'_, Registry>, n: usize) {
    for _ in 0..n {
        sys.run_cycle();
    }
}

/// Let feedback render and the buzzer finish its current phase, after
/// which nothing holds the system awake.
fn settle(hw: &Registry, sys: &mut Urbanite<'_, Registry>) {
    run_for(hw, sys, 300);
    assert!(sys.display().is_idle());
    assert!(sys.buzzer().is_idle());
    assert_eq!(sys.state(), UrbaniteState::SleepWhileOn);
}

fn color(hw: &Registry) -> urbanite::zones::Rgb {
    hw.display(0).unwrap().color()
}

#[test]
fn press_just_over_threshold_powers_on() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    let threshold = sys.on_off_press_ms();

    press_for(&hw, &mut sys, threshold + 1);
    assert_eq!(sys.state(), UrbaniteState::Measure);
    assert_eq!(sys.button().duration(), 0);
    assert!(sys.ultrasound().status());
    assert!(sys.display().status());
    assert!(sys.buzzer().status());
    assert_eq!(sys.display_mode(), DisplayMode::Pulsed);
}

#[test]
fn press_at_exact_threshold_does_nothing() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    let threshold = sys.on_off_press_ms();

    press_for(&hw, &mut sys, threshold);
    assert_eq!(sys.button().duration(), threshold);
    assert_eq!(sys.state(), UrbaniteState::SleepWhileOff);
    assert!(!sys.ultrasound().status());
}

#[test]
fn short_press_while_off_is_ignored() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    press_for(&hw, &mut sys, 400);
    assert_eq!(sys.state(), UrbaniteState::SleepWhileOff);
    assert_eq!(sys.display_mode(), DisplayMode::Pulsed);
}

#[test]
fn medium_presses_cycle_cadence_without_losing_power() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);

    press_for(&hw, &mut sys, 400);
    assert_eq!(sys.display_mode(), DisplayMode::Continuous);
    assert_eq!(sys.buzzer().cadence(), Cadence::Continuous);
    assert_eq!(sys.button().duration(), 0);
    assert_ne!(sys.state(), UrbaniteState::Off);
    assert!(sys.display().status());

    press_for(&hw, &mut sys, 400);
    assert_eq!(sys.display_mode(), DisplayMode::Paused);
    assert!(sys.is_paused());
    assert!(!sys.display().status());
    assert!(!sys.buzzer().status());
    assert!(sys.ultrasound().status(), "ranging keeps running while paused");

    press_for(&hw, &mut sys, 400);
    assert_eq!(sys.display_mode(), DisplayMode::Pulsed);
    assert_eq!(sys.buzzer().cadence(), Cadence::Pulsed);
    assert!(!sys.is_paused());
    assert!(sys.display().status());
}

#[test]
fn long_press_powers_off_and_quiesces_ranging() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);
    echo(&hw, &mut sys, 60);

    power_on(&hw, &mut sys);
    assert!(matches!(
        sys.state(),
        UrbaniteState::Off | UrbaniteState::SleepWhileOff
    ));
    assert_eq!(sys.button().duration(), 0);
    assert!(!sys.ultrasound().status());
    assert!(!sys.display().status());
    assert!(!sys.buzzer().status());
    assert_eq!(sys.display().state(), DisplayState::Idle);
    assert_eq!(color(&hw), COLOR_OFF);

    let line = ultrasound_line(&hw);
    assert!(!line.trigger_high());
    assert!(!line.echo_timer_running());
    assert!(!line.measurement_timer_running());
}

#[test]
fn sleep_while_off_wakes_back_to_off() {
    let hw = Registry::new();
    let mut sys = boot(&hw);

    run_for(&hw, &mut sys, 3);
    assert_eq!(sys.state(), UrbaniteState::SleepWhileOff);
    let slept = hw.sleep_count();
    assert!(slept >= 3, "each idle iteration requests low power");

    crate::sim::set_button(&hw, true);
    assert_eq!(sys.run_cycle(), UrbaniteState::Off);
    assert_eq!(hw.sleep_count(), slept);
    crate::sim::set_button(&hw, false);
}

#[test]
fn sleep_while_on_wakes_on_new_measurement() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);

    for _ in 0..5 {
        echo(&hw, &mut sys, 60);
    }
    assert_eq!(sys.state(), UrbaniteState::Measure);
    settle(&hw, &mut sys);
    assert_eq!(color(&hw), COLOR_GREEN);
    assert_eq!(sys.buzzer().phase_ticks(), 10);

    let slept = hw.sleep_count();
    run_cycles(&mut sys, 2);
    assert_eq!(sys.state(), UrbaniteState::SleepWhileOn);
    assert_eq!(hw.sleep_count(), slept + 2);

    // Samples accumulate while asleep; only the completed median wakes.
    for _ in 0..4 {
        echo(&hw, &mut sys, 30);
        assert_eq!(sys.state(), UrbaniteState::SleepWhileOn);
    }
    echo(&hw, &mut sys, 30);
    assert_eq!(sys.state(), UrbaniteState::Measure);

    run_cycles(&mut sys, 3);
    assert_eq!(sys.display().distance(), 30);
    assert_eq!(color(&hw), COLOR_YELLOW);
}

#[test]
fn button_wakes_sleeping_system_into_measure() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);
    for _ in 0..5 {
        echo(&hw, &mut sys, 180);
    }
    settle(&hw, &mut sys);
    assert_eq!(color(&hw), COLOR_BLUE);

    crate::sim::set_button(&hw, true);
    assert_eq!(sys.run_cycle(), UrbaniteState::Measure);
    crate::sim::set_button(&hw, false);
}

#[test]
fn paused_feedback_overrides_only_when_close() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);
    press_for(&hw, &mut sys, 400);
    press_for(&hw, &mut sys, 400);
    assert!(sys.is_paused());
    run_cycles(&mut sys, 2);
    assert_eq!(color(&hw), COLOR_OFF);

    for _ in 0..5 {
        echo(&hw, &mut sys, 80);
    }
    run_cycles(&mut sys, 3);
    assert!(!sys.display().status(), "far objects stay suppressed");
    assert_eq!(color(&hw), COLOR_OFF);

    for _ in 0..5 {
        echo(&hw, &mut sys, 10);
    }
    run_cycles(&mut sys, 3);
    assert!(sys.is_paused());
    assert!(sys.display().status());
    assert_eq!(sys.display().distance(), 10);
    assert_eq!(color(&hw), COLOR_RED);

    for _ in 0..5 {
        echo(&hw, &mut sys, 80);
    }
    run_cycles(&mut sys, 3);
    assert!(!sys.display().status());
    assert_eq!(color(&hw), COLOR_OFF);
}

#[test]
fn clock_keeps_running_across_the_session() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);
    let before = hw.millis();
    run_for(&hw, &mut sys, 250);
    assert_eq!(hw.millis(), before + 250);
}
