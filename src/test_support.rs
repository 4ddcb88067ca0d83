//! In-memory [`HardwarePort`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::app::ports::{HardwarePort, PinDirection};
use crate::error::HardwareFault;
use crate::pins::Pin;

#[derive(Default)]
struct State {
    analog: HashMap<Pin, u16>,
    digital: HashMap<Pin, bool>,
    directions: HashMap<Pin, PinDirection>,
    failing_analog: HashSet<Pin>,
    failing_digital: HashSet<Pin>,
    writes: Vec<(Pin, bool)>,
}

#[derive(Default)]
pub struct FakeHardware {
    state: Mutex<State>,
}

impl FakeHardware {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn set_analog(&self, pin: Pin, raw: u16) {
        self.with(|s| s.analog.insert(pin, raw));
    }

    pub fn set_digital(&self, pin: Pin, level: bool) {
        self.with(|s| s.digital.insert(pin, level));
    }

    pub fn digital(&self, pin: Pin) -> bool {
        self.with(|s| s.digital.get(&pin).copied().unwrap_or(false))
    }

    pub fn direction(&self, pin: Pin) -> Option<PinDirection> {
        self.with(|s| s.directions.get(&pin).copied())
    }

    pub fn fail_analog(&self, pin: Pin) {
        self.with(|s| s.failing_analog.insert(pin));
    }

    pub fn fail_digital(&self, pin: Pin) {
        self.with(|s| s.failing_digital.insert(pin));
    }

    pub fn heal(&self, pin: Pin) {
        self.with(|s| {
            s.failing_analog.remove(&pin);
            s.failing_digital.remove(&pin);
        });
    }

    /// Number of successful writes to `pin`.
    pub fn write_count(&self, pin: Pin) -> usize {
        self.with(|s| s.writes.iter().filter(|(p, _)| *p == pin).count())
    }
}

impl HardwarePort for FakeHardware {
    fn configure(&self, pin: Pin, direction: PinDirection) -> Result<(), HardwareFault> {
        self.with(|s| {
            s.directions.insert(pin, direction);
        });
        Ok(())
    }

    fn read_analog(&self, pin: Pin) -> Result<u16, HardwareFault> {
        self.with(|s| {
            if s.failing_analog.contains(&pin) {
                Err(HardwareFault::AdcReadFailed(pin))
            } else {
                Ok(s.analog.get(&pin).copied().unwrap_or(0))
            }
        })
    }

    fn read_digital(&self, pin: Pin) -> Result<bool, HardwareFault> {
        self.with(|s| {
            if s.failing_digital.contains(&pin) {
                Err(HardwareFault::GpioReadFailed(pin))
            } else {
                Ok(s.digital.get(&pin).copied().unwrap_or(false))
            }
        })
    }

    fn write_digital(&self, pin: Pin, level: bool) -> Result<(), HardwareFault> {
        self.with(|s| {
            if s.failing_digital.contains(&pin) {
                return Err(HardwareFault::GpioWriteFailed(pin));
            }
            s.digital.insert(pin, level);
            s.writes.push((pin, level));
            Ok(())
        })
    }
}
