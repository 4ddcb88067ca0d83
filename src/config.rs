//! System configuration parameters
//!
//! Calibration and timing for the BattMon node. Defaults are compiled in;
//! a JSON document supplied through the `BATTMON_CONFIG_JSON` environment
//! variable at build time overrides them. Nothing is persisted on the device.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Linear raw → engineering-unit conversion: `scaled = raw * gain + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub gain: f32,
    pub offset: f32,
}

impl LinearScale {
    pub const fn new(gain: f32, offset: f32) -> Self {
        Self { gain, offset }
    }

    pub fn apply(&self, raw: u16) -> f32 {
        f32::from(raw) * self.gain + self.offset
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Calibration ---
    /// Battery divider: raw ADC counts → percent
    pub battery_scale: LinearScale,
    /// Temperature sensor: raw ADC counts → °C
    pub temperature_scale: LinearScale,

    // --- Thresholds ---
    /// Alarm when battery falls below this (percent)
    pub battery_min_percent: f32,
    /// Alarm when temperature rises above this (°C)
    pub temperature_max_c: f32,

    // --- Timing ---
    /// Temperature monitor period (milliseconds)
    pub temperature_period_ms: u32,
    /// Battery monitor period (milliseconds)
    pub battery_period_ms: u32,
    /// Alarm drive cycle (blink + re-check) period (milliseconds)
    pub alarm_drive_period_ms: u32,
    /// Upper bound on a single console line wait (milliseconds)
    pub console_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // 12-bit ADC, full scale = 100 %
            battery_scale: LinearScale::new(100.0 / 4095.0, 0.0),
            // 10 mV/°C on a 3.3 V full scale
            temperature_scale: LinearScale::new(330.0 / 4095.0, 0.0),

            battery_min_percent: 20.0,
            temperature_max_c: 60.0,

            temperature_period_ms: 50,
            battery_period_ms: 50,
            alarm_drive_period_ms: 250,
            console_timeout_ms: 1000,
        }
    }
}

impl SystemConfig {
    /// Reject values that would disable the alarm path or stall a task.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn scale_ok(s: &LinearScale) -> bool {
            s.gain.is_finite() && s.gain != 0.0 && s.offset.is_finite()
        }

        if !scale_ok(&self.battery_scale) {
            return Err(ConfigError::ValidationFailed("battery_scale"));
        }
        if !scale_ok(&self.temperature_scale) {
            return Err(ConfigError::ValidationFailed("temperature_scale"));
        }
        if !self.battery_min_percent.is_finite() {
            return Err(ConfigError::ValidationFailed("battery_min_percent"));
        }
        if !self.temperature_max_c.is_finite() {
            return Err(ConfigError::ValidationFailed("temperature_max_c"));
        }
        if self.temperature_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("temperature_period_ms"));
        }
        if self.battery_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("battery_period_ms"));
        }
        if self.alarm_drive_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("alarm_drive_period_ms"));
        }
        if self.console_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("console_timeout_ms"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration baked in at build time, or the defaults.
    pub fn build_time() -> Self {
        match option_env!("BATTMON_CONFIG_JSON") {
            Some(json) => match Self::from_json(json) {
                Ok(cfg) => {
                    info!("Config: build-time override applied");
                    cfg
                }
                Err(e) => {
                    warn!("Config: build-time override rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
