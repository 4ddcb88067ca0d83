//! Hardware adapter: bridges the raw pin primitives to [`HardwarePort`].
//!
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets the underlying `hw_init` helpers are backed by
//! the in-memory simulation.

use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::app::ports::{HardwarePort, PinDirection};
use crate::drivers::hw_init;
use crate::error::HardwareFault;
use crate::pins::Pin;

/// Concrete adapter over ESP32 ADC1 and GPIO.
#[derive(Debug, Default)]
pub struct GpioHardware {
    /// Serialises ADC1 one-shot conversions across tasks.
    adc_lock: Mutex<()>,
}

impl GpioHardware {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HardwarePort for GpioHardware {
    fn configure(&self, pin: Pin, direction: PinDirection) -> Result<(), HardwareFault> {
        hw_init::gpio_configure(pin, direction == PinDirection::Output).map_err(|e| {
            debug!("configure GPIO{}: {}", pin, e);
            HardwareFault::ConfigureFailed(pin)
        })
    }

    fn read_analog(&self, pin: Pin) -> Result<u16, HardwareFault> {
        let _guard = self.adc_lock.lock().unwrap_or_else(PoisonError::into_inner);
        hw_init::adc1_read(pin).map_err(|e| {
            debug!("sample GPIO{}: {}", pin, e);
            HardwareFault::AdcReadFailed(pin)
        })
    }

    fn read_digital(&self, pin: Pin) -> Result<bool, HardwareFault> {
        hw_init::gpio_read(pin).map_err(|e| {
            debug!("read GPIO{}: {}", pin, e);
            HardwareFault::GpioReadFailed(pin)
        })
    }

    fn write_digital(&self, pin: Pin, level: bool) -> Result<(), HardwareFault> {
        hw_init::gpio_write(pin, level).map_err(|e| {
            debug!("write GPIO{}: {}", pin, e);
            HardwareFault::GpioWriteFailed(pin)
        })
    }
}
