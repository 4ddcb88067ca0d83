//! Mock hardware adapter for integration tests.
//!
//! Serves analog values from a table and records every digital write so
//! tests can assert on the alarm output history without touching GPIO.

use std::collections::HashMap;
use std::sync::Mutex;

use battmon::app::events::AppEvent;
use battmon::app::ports::{EventSink, HardwarePort, PinDirection};
use battmon::error::HardwareFault;
use battmon::pins::{self, Pin};

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Configure { pin: Pin, direction: PinDirection },
    Write { pin: Pin, level: bool },
}

#[derive(Default)]
struct State {
    analog: HashMap<Pin, u16>,
    broken: Vec<Pin>,
    calls: Vec<HwCall>,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    state: Mutex<State>,
}

#[allow(dead_code)]
impl MockHardware {
    /// Full battery, room temperature.
    pub fn healthy() -> Self {
        let hw = Self::default();
        hw.set_analog(pins::BATTERY_ADC_GPIO, 4095);
        hw.set_analog(pins::TEMP_ADC_GPIO, 300);
        hw
    }

    pub fn set_analog(&self, pin: Pin, raw: u16) {
        self.state.lock().unwrap().analog.insert(pin, raw);
    }

    pub fn break_pin(&self, pin: Pin) {
        self.state.lock().unwrap().broken.push(pin);
    }

    pub fn repair_pin(&self, pin: Pin) {
        self.state.lock().unwrap().broken.retain(|p| *p != pin);
    }

    pub fn calls(&self) -> Vec<HwCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Levels written to `pin`, oldest first.
    pub fn writes_to(&self, pin: Pin) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HwCall::Write { pin: p, level } if p == pin => Some(level),
                _ => None,
            })
            .collect()
    }

    pub fn output_level(&self, pin: Pin) -> bool {
        self.writes_to(pin).last().copied().unwrap_or(false)
    }
}

impl HardwarePort for MockHardware {
    fn configure(&self, pin: Pin, direction: PinDirection) -> Result<(), HardwareFault> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(HwCall::Configure { pin, direction });
        Ok(())
    }

    fn read_analog(&self, pin: Pin) -> Result<u16, HardwareFault> {
        let s = self.state.lock().unwrap();
        if s.broken.contains(&pin) {
            return Err(HardwareFault::AdcReadFailed(pin));
        }
        Ok(s.analog.get(&pin).copied().unwrap_or(0))
    }

    fn read_digital(&self, pin: Pin) -> Result<bool, HardwareFault> {
        let s = self.state.lock().unwrap();
        if s.broken.contains(&pin) {
            return Err(HardwareFault::GpioReadFailed(pin));
        }
        Ok(false)
    }

    fn write_digital(&self, pin: Pin, level: bool) -> Result<(), HardwareFault> {
        let mut s = self.state.lock().unwrap();
        if s.broken.contains(&pin) {
            return Err(HardwareFault::GpioWriteFailed(pin));
        }
        s.calls.push(HwCall::Write { pin, level });
        Ok(())
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
