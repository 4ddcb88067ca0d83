//! Alarm output driver (LED + buzzer on one active-HIGH GPIO).
//!
//! Single writer: owned by the alarm coordinator. Remembers the last level
//! written so `toggle` needs no read-back.

use crate::app::ports::{HardwarePort, PinDirection};
use crate::error::HardwareFault;
use crate::pins::Pin;

pub struct OutputPort {
    pin: Pin,
    level: bool,
}

impl OutputPort {
    pub fn new(pin: Pin) -> Self {
        Self { pin, level: false }
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Configure the pin as an output and drive it low.
    pub fn configure(&mut self, hw: &dyn HardwarePort) -> Result<(), HardwareFault> {
        hw.configure(self.pin, PinDirection::Output)?;
        self.write(hw, false)
    }

    /// Drive the pin. The remembered level only changes on success.
    pub fn write(&mut self, hw: &dyn HardwarePort, level: bool) -> Result<(), HardwareFault> {
        hw.write_digital(self.pin, level)?;
        self.level = level;
        Ok(())
    }

    pub fn toggle(&mut self, hw: &dyn HardwarePort) -> Result<(), HardwareFault> {
        self.write(hw, !self.level)
    }

    /// Last level successfully written.
    pub fn level(&self) -> bool {
        self.level
    }
}
