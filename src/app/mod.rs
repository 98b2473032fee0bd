//! Application boundary: the capability surface the state machines call.
//!
//! The machines in [`crate::fsm`] never touch registers.  All interaction
//! with hardware happens through the **port traits** defined in [`ports`],
//! keeping the decision logic fully testable on the host.

pub mod ports;
