//! ADC-backed sensor (battery divider, analog temperature sensor).
//!
//! The live path is a 12-bit one-shot conversion; any value the primitive
//! returns above 4095 is reported as [`HardwareFault::OutOfRange`] rather
//! than clamped, so a broken ADC never reads as a plausible value.

use crate::app::ports::HardwarePort;
use crate::error::{HardwareFault, RAW_MAX};
use crate::pins::Pin;

use super::{DebugOverride, Sensor, Transform};

pub struct AnalogSensor<T> {
    pin: Pin,
    transform: T,
    debug: DebugOverride,
}

impl<T: Transform> AnalogSensor<T> {
    /// Sensor with its own local debug flag.
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

impl<T: Transform> Sensor for AnalogSensor<T> {
    fn pin(&self) -> Pin {
        self.pin
    }

    fn sample(&self, hw: &dyn HardwarePort) -> Result<u16, HardwareFault> {
        let raw = hw.read_analog(self.pin)?;
        if raw > RAW_MAX {
            return Err(HardwareFault::OutOfRange(self.pin));
        }
        Ok(raw)
    }

    fn transform(&self, raw: u16) -> f32 {
        self.transform.apply(raw)
    }

    fn debug(&self) -> &DebugOverride {
        &self.debug
    }
}
