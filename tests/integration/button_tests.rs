//! Debounce behaviour of the button machine against registry edges.

use urbanite::board::PARKING_BUTTON_ID;
use urbanite::drivers::Registry;
use urbanite::fsm::button::{ButtonFsm, ButtonState};

use crate::sim::set_button;

fn step(hw: &Registry, b: &mut ButtonFsm<'_, Registry>, ms: u32) {
    for _ in 0..ms {
        hw.advance_millis(1);
        b.fire();
    }
}

/// Steps `ms` milliseconds and counts how often the machine settles into
/// `Pressed` and back into `Released`.
fn step_counting(hw: &Registry, b: &mut ButtonFsm<'_, Registry>, ms: u32, counts: &mut (u32, u32)) {
    for _ in 0..ms {
        let before = b.state();
        hw.advance_millis(1);
        b.fire();
        match (before, b.state()) {
            (ButtonState::PressedWait, ButtonState::Pressed) => counts.0 += 1,
            (ButtonState::ReleasedWait, ButtonState::Released) => counts.1 += 1,
            _ => {}
        }
    }
}

#[test]
fn settled_press_reports_its_length() {
    let hw = Registry::new();
    let mut b = ButtonFsm::new(&hw, 150, PARKING_BUTTON_ID).unwrap();

    step(&hw, &mut b, 150);
    set_button(&hw, true);
    step(&hw, &mut b, 300);
    set_button(&hw, false);
    step(&hw, &mut b, 150);

    assert!(
        (299..=301).contains(&b.duration()),
        "duration {} should be ~300 ms",
        b.duration()
    );
    step(&hw, &mut b, 2);
    assert_eq!(b.state(), ButtonState::Released);
}

#[test]
fn chatter_yields_one_press_cycle() {
    let hw = Registry::new();
    let mut b = ButtonFsm::new(&hw, 150, PARKING_BUTTON_ID).unwrap();
    let mut counts = (0, 0);

    // Closing contact bounces for 100 ms, well inside the debounce window.
    for i in 0..10 {
        set_button(&hw, i % 2 == 0);
        step_counting(&hw, &mut b, 10, &mut counts);
    }
    set_button(&hw, true);
    step_counting(&hw, &mut b, 500, &mut counts);

    // Opening contact bounces the same way.
    for i in 0..10 {
        set_button(&hw, i % 2 == 1);
        step_counting(&hw, &mut b, 10, &mut counts);
    }
    set_button(&hw, false);
    step_counting(&hw, &mut b, 300, &mut counts);

    assert_eq!(counts, (1, 1));
    assert_eq!(b.state(), ButtonState::Released);
    assert!(b.duration() > 500);
}

#[test]
fn duration_persists_until_reset() {
    let hw = Registry::new();
    let mut b = ButtonFsm::new(&hw, 20, PARKING_BUTTON_ID).unwrap();
    set_button(&hw, true);
    step(&hw, &mut b, 80);
    set_button(&hw, false);
    step(&hw, &mut b, 500);
    assert_eq!(b.duration(), 80);

    b.reset_duration();
    step(&hw, &mut b, 100);
    assert_eq!(b.duration(), 0);
}
