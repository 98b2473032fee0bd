//! System configuration parameters
//!
//! All tunable parameters for the Urbanite system.  Values are fixed once the
//! machines are constructed; a board profile may supply them as JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsm::buzzer::Cadence;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Button ---
    /// Debounce interval applied on both press and release (milliseconds)
    pub button_debounce_ms: u32,

    // --- Coordinator ---
    /// A press longer than this toggles power (milliseconds)
    pub on_off_press_ms: u32,
    /// A press longer than this, but shorter than `on_off_press_ms`,
    /// cycles the feedback cadence (milliseconds)
    pub pause_display_ms: u32,

    // --- Buzzer ---
    /// Cadence the buzzer starts in after power-on
    pub initial_cadence: Cadence,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            button_debounce_ms: 150,
            on_off_press_ms: 1000,
            pause_display_ms: 100,
            initial_cadence: Cadence::Pulsed,
        }
    }
}

impl SystemConfig {
    /// Check the cross-field invariants the coordinator relies on.
    pub fn validate(&self) -> Result<()> {
        if self.button_debounce_ms == 0 {
            return Err(Error::Config("button debounce must be non-zero"));
        }
        if self.pause_display_ms >= self.on_off_press_ms {
            return Err(Error::Config("pause threshold must be below power threshold"));
        }
        Ok(())
    }

    /// Parse and validate a JSON board profile.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("malformed JSON profile"))?;
        config.validate()?;
        Ok(config)
    }
}
