//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one subsystem against
//! [`mock_hw::MockHardware`]. Everything runs on the host with no real
//! hardware required.

mod alarm_flow_tests;
mod dispatcher_tests;
mod end_to_end_tests;
mod mock_hw;
