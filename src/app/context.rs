//! Process-wide shared state.
//!
//! A single [`SystemContext`] is built at startup and handed to every task
//! and command handler by `Arc`. Everything mutable in it is either atomic
//! or behind an `embassy_sync` mutex, so no task ever holds a lock across
//! a wait.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::debug;

use crate::alarm::{AlarmState, Threshold};
use crate::config::{LinearScale, SystemConfig};
use crate::diagnostics::{TaskId, TaskTimings};
use crate::error::HardwareFault;
use crate::pins::{self, Pin};
use crate::sensors::{AnalogSensor, DebugOverride, Sensor};

use super::ports::HardwarePort;

/// The two monitored quantities. Also identifies the source of a breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    Battery,
    Temperature,
}

impl SensorId {
    pub const ALL: [Self; 2] = [Self::Battery, Self::Temperature];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Temperature => "temperature",
        }
    }

    /// Monitor task that owns this sensor's threshold.
    pub const fn task(self) -> TaskId {
        match self {
            Self::Battery => TaskId::BatteryMonitor,
            Self::Temperature => TaskId::TemperatureMonitor,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Debug flags
// ───────────────────────────────────────────────────────────────

/// Operator debug switches.
///
/// `battery` and `temperature` are the shared cells the two sensors'
/// [`DebugOverride`]s read; `logs` enables diagnostics (timing capture,
/// status after each command, idle reports).
#[derive(Debug, Default)]
pub struct DebugFlags {
    battery: Arc<AtomicBool>,
    temperature: Arc<AtomicBool>,
    logs: AtomicBool,
}

impl DebugFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, sensor: SensorId) -> &Arc<AtomicBool> {
        match sensor {
            SensorId::Battery => &self.battery,
            SensorId::Temperature => &self.temperature,
        }
    }

    pub fn sensor(&self, sensor: SensorId) -> bool {
        self.cell(sensor).load(Ordering::Acquire)
    }

    pub fn set_sensor(&self, sensor: SensorId, enabled: bool) {
        self.cell(sensor).store(enabled, Ordering::Release);
    }

    pub fn logs(&self) -> bool {
        self.logs.load(Ordering::Acquire)
    }

    pub fn set_logs(&self, enabled: bool) {
        self.logs.store(enabled, Ordering::Release);
    }
}

/// Renders `all`, `off`, or the active subset (`battery | logs`).
impl fmt::Display for DebugFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            ("battery", self.sensor(SensorId::Battery)),
            ("temperature", self.sensor(SensorId::Temperature)),
            ("logs", self.logs()),
        ];
        if flags.iter().all(|&(_, on)| on) {
            return f.write_str("all");
        }
        if flags.iter().all(|&(_, on)| !on) {
            return f.write_str("off");
        }
        let mut first = true;
        for (name, _) in flags.iter().filter(|&&(_, on)| on) {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Alarm shared state
// ───────────────────────────────────────────────────────────────

/// What monitors and the console may see of the alarm coordinator.
///
/// Monitors only *request* a transition through [`request`](Self::request);
/// the coordinator is the sole writer of `active`, the state mirror and the
/// episode counter.
///
/// Every request carries the episode counter read *before* the sensor was
/// sampled. Ending an episode bumps the counter, so a breach sampled before
/// the coordinator's exit check is dropped instead of restarting the alarm.
pub struct AlarmShared {
    active: AtomicBool,
    state: AtomicU8,
    episode: AtomicU32,
    wake: Signal<CriticalSectionRawMutex, (SensorId, u32)>,
}

impl Default for AlarmShared {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmShared {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            state: AtomicU8::new(AlarmState::Idle as u8),
            episode: AtomicU32::new(0),
            wake: Signal::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Number of alarm episodes ended so far. Read before sampling.
    pub fn episode(&self) -> u32 {
        self.episode.load(Ordering::Acquire)
    }

    /// Wake the coordinator unless it is driving the alarm or has ended an
    /// episode since `sampled_in` was read. Repeated requests while one is
    /// pending overwrite the same slot. Returns `false` when suppressed.
    pub fn request(&self, source: SensorId, sampled_in: u32) -> bool {
        if self.is_active() || self.episode() != sampled_in {
            return false;
        }
        self.wake.signal((source, sampled_in));
        true
    }

    /// A wake request is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.wake.signaled()
    }

    /// Block until a current monitor request arrives; returns the source.
    pub fn wait_for_breach(&self) -> SensorId {
        loop {
            let (source, sampled_in) = future::block_on(self.wake.wait());
            if sampled_in == self.episode() {
                return source;
            }
            debug!("alarm: stale {} request dropped", source.name());
        }
    }

    /// Non-blocking take of a pending, current request.
    pub fn try_take(&self) -> Option<SensorId> {
        self.wake
            .try_take()
            .filter(|&(_, sampled_in)| sampled_in == self.episode())
            .map(|(source, _)| source)
    }

    /// Published coordinator state.
    pub fn state(&self) -> AlarmState {
        AlarmState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn publish(&self, state: AlarmState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    /// End an episode: bump the counter, then lower `active`. A monitor
    /// that sees `active == false` therefore also sees the new counter.
    pub(crate) fn finish_episode(&self) {
        self.episode.fetch_add(1, Ordering::AcqRel);
        self.active.store(false, Ordering::Release);
    }

    /// Drop any stale request.
    pub(crate) fn clear_pending(&self) {
        self.wake.reset();
    }
}

// ───────────────────────────────────────────────────────────────
// System context
// ───────────────────────────────────────────────────────────────

pub struct SystemContext {
    pub config: SystemConfig,
    pub debug: DebugFlags,
    pub battery: AnalogSensor<LinearScale>,
    pub temperature: AnalogSensor<LinearScale>,
    pub alarm: AlarmShared,
    pub timings: TaskTimings,
}

impl SystemContext {
    /// Context on the board's sensor pins.
    pub fn new(config: SystemConfig) -> Self {
        Self::with_pins(config, pins::BATTERY_ADC_GPIO, pins::TEMP_ADC_GPIO)
    }

    pub fn with_pins(config: SystemConfig, battery_pin: Pin, temperature_pin: Pin) -> Self {
        let debug = DebugFlags::new();
        let battery = AnalogSensor::with_debug(
            battery_pin,
            config.battery_scale,
            DebugOverride::shared(Arc::clone(debug.cell(SensorId::Battery))),
        );
        let temperature = AnalogSensor::with_debug(
            temperature_pin,
            config.temperature_scale,
            DebugOverride::shared(Arc::clone(debug.cell(SensorId::Temperature))),
        );
        Self {
            config,
            debug,
            battery,
            temperature,
            alarm: AlarmShared::new(),
            timings: TaskTimings::new(),
        }
    }

    pub fn sensor(&self, id: SensorId) -> &dyn Sensor {
        match id {
            SensorId::Battery => &self.battery,
            SensorId::Temperature => &self.temperature,
        }
    }

    pub fn threshold(&self, id: SensorId) -> Threshold {
        match id {
            SensorId::Battery => Threshold::Below(self.config.battery_min_percent),
            SensorId::Temperature => Threshold::Above(self.config.temperature_max_c),
        }
    }

    /// Battery and temperature overrides together; `logs` is untouched.
    pub fn set_debug_all(&self, enabled: bool) {
        for id in SensorId::ALL {
            self.sensor(id).set_debug_mode(enabled);
        }
    }

    /// Configure both sensor pins as inputs.
    pub fn configure_hardware(&self, hw: &dyn HardwarePort) -> Result<(), HardwareFault> {
        for id in SensorId::ALL {
            self.sensor(id).configure(hw)?;
        }
        Ok(())
    }
}
