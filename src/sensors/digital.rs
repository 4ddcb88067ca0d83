//! GPIO-backed sensor: a single digital level read as raw `0` or `1`.

use crate::app::ports::HardwarePort;
use crate::error::HardwareFault;
use crate::pins::Pin;

use super::{DebugOverride, Sensor, Transform};

pub struct DigitalSensor<T> {
    pin: Pin,
    transform: T,
    debug: DebugOverride,
}

impl<T: Transform> DigitalSensor<T> {
    pub fn new(pin: Pin, transform: T) -> Self {
        Self::with_debug(pin, transform, DebugOverride::local())
    }

    pub fn with_debug(pin: Pin, transform: T, debug: DebugOverride) -> Self {
        Self {
            pin,
            transform,
            debug,
        }
    }
}

impl<T: Transform> Sensor for DigitalSensor<T> {
    fn pin(&self) -> Pin {
        self.pin
    }

    fn sample(&self, hw: &dyn HardwarePort) -> Result<u16, HardwareFault> {
        Ok(u16::from(hw.read_digital(self.pin)?))
    }

    fn transform(&self, raw: u16) -> f32 {
        self.transform.apply(raw)
    }

    fn debug(&self) -> &DebugOverride {
        &self.debug
    }
}
