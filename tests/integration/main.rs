//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises the full machine stack
//! against a simulated board.  All tests run on the host with no real
//! hardware required.

mod button_tests;
mod ranging_tests;
mod sim;
mod urbanite_tests;
