//! Adapters: bridges from concrete board peripherals to the registry.
//!
//! | Adapter | Connects                              |
//! |---------|---------------------------------------|
//! | `hal`   | `embedded-hal` pins ⇄ registry lines  |

pub mod hal;
