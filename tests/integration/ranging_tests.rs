//! Ranging: echo capture, overflow correction and the median window.

use urbanite::app::ports::{EchoCapture, UltrasoundPort};
use urbanite::board::REAR_PARKING_SENSOR_ID;
use urbanite::drivers::Registry;
use urbanite::fsm::ultrasound::{UltrasoundFsm, UltrasoundState};
use urbanite::fsm::urbanite::UrbaniteState;

use crate::sim::{boot, echo, power_on, run_for, ultrasound_line};

/// Run one trigger/echo exchange on a bare ranging machine with the
/// given capture events.
fn exchange(hw: &Registry, us: &mut UltrasoundFsm<'_, Registry>, init: u32, overflows: u32, end: u32) {
    let line = hw.ultrasound(REAR_PARKING_SENSOR_ID).unwrap();
    line.on_measurement_timeout();
    us.fire();
    assert_eq!(us.state(), UltrasoundState::TriggerStart);
    line.on_trigger_elapsed();
    us.fire();
    line.on_echo_capture(init);
    us.fire();
    for _ in 0..overflows {
        line.on_echo_overflow();
    }
    line.on_echo_capture(end);
    us.fire();
    assert_eq!(us.state(), UltrasoundState::SetDistance);
}

#[test]
fn overflowed_echo_is_corrected() {
    let hw = Registry::new();
    let mut us = UltrasoundFsm::new(&hw, REAR_PARKING_SENSOR_ID).unwrap();
    us.start();

    for i in 0..5 {
        exchange(&hw, &mut us, 60_000, 1, 1_000);
        assert_eq!(us.new_measurement_ready(), i == 4);
    }
    assert_eq!(us.distance(), 112);
    assert!(!us.new_measurement_ready(), "read consumes the flag");
}

#[test]
fn echo_capture_is_cleared_after_each_sample() {
    let hw = Registry::new();
    let mut us = UltrasoundFsm::new(&hw, REAR_PARKING_SENSOR_ID).unwrap();
    us.start();
    exchange(&hw, &mut us, 2_000, 0, 4_000);
    assert_eq!(hw.echo_capture(REAR_PARKING_SENSOR_ID), Ok(EchoCapture::default()));
    assert!(!hw.ultrasound(REAR_PARKING_SENSOR_ID).unwrap().echo_timer_running());
    assert_eq!(us.pending_samples(), 1);
}

#[test]
fn median_rejects_outlier_end_to_end() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);
    assert_eq!(sys.state(), UrbaniteState::Measure);

    for cm in [50, 52, 999, 51, 53] {
        echo(&hw, &mut sys, cm);
    }
    assert_eq!(sys.display().distance(), 52);
    assert_eq!(sys.buzzer().distance(), 52);
    assert!(!sys.ultrasound().new_measurement_ready());
}

#[test]
fn restart_discards_partial_window() {
    let hw = Registry::new();
    let mut us = UltrasoundFsm::new(&hw, REAR_PARKING_SENSOR_ID).unwrap();
    us.start();
    for _ in 0..3 {
        exchange(&hw, &mut us, 1_000, 0, 2_000);
    }
    assert_eq!(us.pending_samples(), 3);

    us.stop();
    us.fire();
    assert_eq!(us.state(), UltrasoundState::WaitStart);
    us.start();
    assert_eq!(us.pending_samples(), 0);
    assert_eq!(us.distance(), 0);
}

#[test]
fn missing_echo_stalls_without_holding_the_system_awake() {
    let hw = Registry::new();
    let mut sys = boot(&hw);
    power_on(&hw, &mut sys);
    for cm in [80; 5] {
        echo(&hw, &mut sys, cm);
    }

    let line = ultrasound_line(&hw);
    line.on_measurement_timeout();
    sys.run_cycle();
    line.on_trigger_elapsed();
    sys.run_cycle();
    line.on_echo_capture(500);
    sys.run_cycle();
    assert_eq!(sys.ultrasound().state(), UltrasoundState::WaitEchoEnd);

    // No falling edge ever arrives.
    run_for(&hw, &mut sys, 1_000);
    assert_eq!(sys.ultrasound().state(), UltrasoundState::WaitEchoEnd);
    assert_eq!(sys.state(), UrbaniteState::SleepWhileOn);
}
