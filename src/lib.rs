//! Urbanite parking-assist control core.
//!
//! Table-driven state machines for the button, the ultrasonic ranger, the
//! colour and tone feedback devices and the power coordinator.  Hardware is
//! reached only through the port traits in [`app::ports`]; [`drivers::Registry`]
//! implements them over interrupt-shared lines, so the whole core runs on
//! the host in tests.
//!
//! ```no_run
//! use urbanite::config::SystemConfig;
//! use urbanite::drivers::Registry;
//! use urbanite::fsm::urbanite::Urbanite;
//!
//! static HW: Registry = Registry::new();
//!
//! let mut system = Urbanite::new(&HW, &SystemConfig::default())?;
//! loop {
//!     system.run_cycle();
//! }
//! # Ok::<(), urbanite::error::Error>(())
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod board;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod zones;
