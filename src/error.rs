//! Unified error types for the Urbanite control core.
//!
//! Errors only surface at construction and configuration time.  Once the
//! machines are running, a failing port call is logged and turned into a
//! guard that never fires, so nothing propagates out of `fire()`.
//! All variants are `Copy` so they can be passed around without allocation.

use core::fmt;

use crate::app::ports::DeviceId;

// ---------------------------------------------------------------------------
// Device families
// ---------------------------------------------------------------------------

/// The device family a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Button,
    Ultrasound,
    Display,
    Buzzer,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button => write!(f, "button"),
            Self::Ultrasound => write!(f, "ultrasound"),
            Self::Display => write!(f, "display"),
            Self::Buzzer => write!(f, "buzzer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A device identity has no entry in the registry.
    UnknownDevice { kind: DeviceKind, id: DeviceId },
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDevice { kind, id } => write!(f, "unknown {kind} id {id}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
