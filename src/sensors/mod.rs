//! Sensor subsystem: the dual-mode [`Sensor`] abstraction and its variants.
//!
//! Every sensor reads either the live hardware primitive or an
//! operator-injected raw value, depending on its [`DebugOverride`] flag.
//! Both paths go through the same [`Transform`], so a debug value of
//! `v` always reads back as `transform(v)`.
//!
//! | Variant          | Primitive      | Raw range |
//! |------------------|----------------|-----------|
//! | [`AnalogSensor`] | ADC one-shot   | 0..=4095  |
//! | [`DigitalSensor`]| GPIO level     | 0..=1     |

pub mod analog;
pub mod digital;

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::Arc;

use crate::app::ports::{HardwarePort, PinDirection};
use crate::config::LinearScale;
use crate::error::{HardwareFault, ValidationError};
use crate::pins::Pin;

pub use analog::AnalogSensor;
pub use digital::DigitalSensor;

/// One sample: the raw counts and the transformed engineering value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub raw: u16,
    pub scaled: f32,
}

// ───────────────────────────────────────────────────────────────
// Raw → engineering-unit transform
// ───────────────────────────────────────────────────────────────

/// Pluggable per-instance conversion from raw counts.
pub trait Transform: Send + Sync {
    fn apply(&self, raw: u16) -> f32;
}

impl Transform for LinearScale {
    fn apply(&self, raw: u16) -> f32 {
        LinearScale::apply(self, raw)
    }
}

impl Transform for fn(u16) -> f32 {
    fn apply(&self, raw: u16) -> f32 {
        self(raw)
    }
}

// ───────────────────────────────────────────────────────────────
// Debug override
// ───────────────────────────────────────────────────────────────

/// Debug-mode flag plus the injected raw value.
///
/// The flag is either a cell shared with the console (`Arc<AtomicBool>`
/// owned by `DebugFlags`) or, when none was supplied, a flag local to the
/// sensor. The injected value is always within `0..=4095`.
#[derive(Debug, Default)]
pub struct DebugOverride {
    shared: Option<Arc<AtomicBool>>,
    local: AtomicBool,
    injected: AtomicU16,
}

impl DebugOverride {
    /// Override with its own flag.
    pub fn local() -> Self {
        Self::default()
    }

    /// Override whose flag is the given shared cell.
    pub fn shared(flag: Arc<AtomicBool>) -> Self {
        Self {
            shared: Some(flag),
            ..Self::default()
        }
    }

    fn flag(&self) -> &AtomicBool {
        self.shared.as_deref().unwrap_or(&self.local)
    }

    pub fn enabled(&self) -> bool {
        self.flag().load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.flag().store(enabled, Ordering::Release);
    }

    /// Store a new injected value. Out-of-range values leave the old one.
    pub fn set_value(&self, value: i32) -> Result<(), ValidationError> {
        let raw = ValidationError::check_raw(value)?;
        self.injected.store(raw, Ordering::Release);
        Ok(())
    }

    pub fn value(&self) -> u16 {
        self.injected.load(Ordering::Acquire)
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor trait
// ───────────────────────────────────────────────────────────────

/// A dual-mode sensor. Variants supply the live sample; everything else
/// (debug gating, transform, override control) is provided.
///
/// All methods take `&self`: a sensor is shared between a monitor task,
/// the alarm coordinator and the console through the system context.
pub trait Sensor: Send + Sync {
    /// Pin this sensor samples.
    fn pin(&self) -> Pin;

    /// Live hardware read, bypassing the debug override.
    fn sample(&self, hw: &dyn HardwarePort) -> Result<u16, HardwareFault>;

    fn transform(&self, raw: u16) -> f32;

    fn debug(&self) -> &DebugOverride;

    /// Injected value in debug mode, otherwise a live sample.
    fn read_raw(&self, hw: &dyn HardwarePort) -> Result<u16, HardwareFault> {
        let debug = self.debug();
        if debug.enabled() {
            Ok(debug.value())
        } else {
            self.sample(hw)
        }
    }

    fn read(&self, hw: &dyn HardwarePort) -> Result<SensorReading, HardwareFault> {
        let raw = self.read_raw(hw)?;
        Ok(SensorReading {
            raw,
            scaled: self.transform(raw),
        })
    }

    fn set_debug_value(&self, value: i32) -> Result<(), ValidationError> {
        self.debug().set_value(value)
    }

    fn set_debug_mode(&self, enabled: bool) {
        self.debug().set_enabled(enabled);
    }

    fn debug_mode(&self) -> bool {
        self.debug().enabled()
    }

    /// Configure the pin as an input.
    fn configure(&self, hw: &dyn HardwarePort) -> Result<(), HardwareFault> {
        hw.configure(self.pin(), PinDirection::Input)
    }
}
