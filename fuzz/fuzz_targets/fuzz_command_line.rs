//! Fuzz target: `dispatch_line`
//!
//! Feeds arbitrary text through the console dispatcher against a fresh
//! context and checks that it never panics, that stored debug values stay
//! inside the ADC range and that a rejected line always produces an
//! error reply.
//!
//! cargo fuzz run fuzz_command_line

#![no_main]

use battmon::app::context::{SensorId, SystemContext};
use battmon::app::dispatcher::{Dispatch, dispatch_line};
use battmon::app::ports::{HardwarePort, PinDirection};
use battmon::config::SystemConfig;
use battmon::error::{HardwareFault, RAW_MAX};
use battmon::pins::Pin;
use libfuzzer_sys::fuzz_target;

struct Flat;

impl HardwarePort for Flat {
    fn configure(&self, _: Pin, _: PinDirection) -> Result<(), HardwareFault> {
        Ok(())
    }
    fn read_analog(&self, _: Pin) -> Result<u16, HardwareFault> {
        Ok(1024)
    }
    fn read_digital(&self, _: Pin) -> Result<bool, HardwareFault> {
        Ok(false)
    }
    fn write_digital(&self, _: Pin, _: bool) -> Result<(), HardwareFault> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let ctx = SystemContext::new(SystemConfig::default());

    for line in text.lines() {
        let mut out = String::new();
        let outcome = dispatch_line(line, &ctx, &Flat, &mut out).expect("String writes are infallible");
        match outcome {
            Dispatch::Ignored => assert!(out.is_empty()),
            Dispatch::Rejected(_) => assert!(out.starts_with("error: ")),
            Dispatch::Executed(_) => {}
        }
    }

    for id in SensorId::ALL {
        assert!(ctx.sensor(id).debug().value() <= RAW_MAX);
    }
});
