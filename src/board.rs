//! Device identities and hardware time constants for the Urbanite board.
//!
//! Single source of truth: every machine and driver references this module
//! rather than hard-coding identities or timer figures.

use crate::app::ports::DeviceId;

// ---------------------------------------------------------------------------
// Device identities (index into the registry tables)
// ---------------------------------------------------------------------------

/// User push-button (active-low, falling + rising edge interrupt).
pub const PARKING_BUTTON_ID: DeviceId = 0;
/// Rear ultrasonic transceiver (trigger output + echo input capture).
pub const REAR_PARKING_SENSOR_ID: DeviceId = 0;
/// Rear RGB indicator.
pub const REAR_PARKING_DISPLAY_ID: DeviceId = 0;
/// Piezo buzzer.
pub const PARKING_BUZZER_ID: DeviceId = 0;

/// Number of entries in each registry table.
pub const BUTTON_COUNT: usize = 1;
pub const ULTRASOUND_COUNT: usize = 1;
pub const DISPLAY_COUNT: usize = 1;
pub const BUZZER_COUNT: usize = 1;

// ---------------------------------------------------------------------------
// Ultrasound timing
// ---------------------------------------------------------------------------

/// Period of the new-measurement timer that re-arms `trigger_ready` (ms).
pub const MEASUREMENT_PERIOD_MS: u32 = 100;
/// Largest value of the 16-bit echo capture timer before it wraps.
/// The timer ticks once per microsecond.
pub const ECHO_TIMER_MAX: u32 = 65_535;
/// Speed of sound used for time-of-flight conversion (m/s).
pub const SPEED_OF_SOUND_M_S: u32 = 343;

// ---------------------------------------------------------------------------
// Buzzer timing
// ---------------------------------------------------------------------------

/// Period of the buzzer phase timer whose overflows feed the phase counter (ms).
pub const BUZZER_PHASE_TICK_MS: u32 = 25;
