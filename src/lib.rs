//! BattMon firmware library.
//!
//! Battery and temperature monitors, the alarm coordinator and the serial
//! debug console, exposed for integration testing on the host. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; on other targets the drivers fall back to an
//! in-memory simulation.

#![deny(unused_must_use)]

pub mod adapters;
pub mod alarm;
pub mod app;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod tasks;

#[cfg(target_os = "espidf")]
mod esp_link_shims;

#[cfg(test)]
mod test_support;
