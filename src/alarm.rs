//! Alarm coordinator.
//!
//! Monitors only *request* the alarm (through
//! [`AlarmShared::request`](crate::app::context::AlarmShared::request));
//! the coordinator owns the state and the output pin.
//!
//! ## State lifecycle
//!
//! 1. `Idle`: the coordinator task blocks on the wake signal.
//! 2. A monitor signals a breach → [`notify`](AlarmCoordinator::notify)
//!    moves to `Triggered`.
//! 3. [`engage`](AlarmCoordinator::engage) raises `alarm_active`, drops any
//!    stale wake, drives the output high → `Active`. From here on monitor
//!    requests are suppressed.
//! 4. Each [`drive_cycle`](AlarmCoordinator::drive_cycle) toggles the output
//!    and re-reads **both** sensors directly. Only when both read clear does
//!    the coordinator drive the output low and return to `Idle`.
//!
//! A sensor that cannot be read during re-evaluation keeps the alarm
//! `Active`: an unreadable sensor is never taken as "safe".

use core::fmt;

use log::{error, info, warn};

use crate::app::context::{SensorId, SystemContext};
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, HardwarePort};
use crate::drivers::output::OutputPort;
use crate::error::HardwareFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlarmState {
    Idle = 0,
    Triggered = 1,
    Active = 2,
}

impl AlarmState {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Triggered,
            2 => Self::Active,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Triggered => "triggered",
            Self::Active => "active",
        })
    }
}

/// Breach condition on a scaled reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Breached when the reading rises above the limit.
    Above(f32),
    /// Breached when the reading falls below the limit.
    Below(f32),
}

impl Threshold {
    pub fn is_breached(self, scaled: f32) -> bool {
        match self {
            Self::Above(max) => scaled > max,
            Self::Below(min) => scaled < min,
        }
    }
}

/// Read `sensor` and compare against its threshold.
pub fn check(
    ctx: &SystemContext,
    hw: &dyn HardwarePort,
    sensor: SensorId,
) -> Result<bool, HardwareFault> {
    let reading = ctx.sensor(sensor).read(hw)?;
    Ok(ctx.threshold(sensor).is_breached(reading.scaled))
}

pub struct AlarmCoordinator {
    state: AlarmState,
    output: OutputPort,
    source: Option<SensorId>,
}

impl AlarmCoordinator {
    pub fn new(output: OutputPort) -> Self {
        Self {
            state: AlarmState::Idle,
            output,
            source: None,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Sensor whose breach started the current alarm.
    pub fn source(&self) -> Option<SensorId> {
        self.source
    }

    pub fn output_level(&self) -> bool {
        self.output.level()
    }

    /// Configure the output pin and drive it low.
    pub fn configure(&mut self, hw: &dyn HardwarePort) -> Result<(), HardwareFault> {
        self.output.configure(hw)
    }

    /// Breach notification. Only `Idle → Triggered`; coalesced otherwise.
    pub fn notify(&mut self, ctx: &SystemContext, source: SensorId) -> bool {
        if self.state != AlarmState::Idle {
            return false;
        }
        self.state = AlarmState::Triggered;
        self.source = Some(source);
        ctx.alarm.publish(self.state);
        info!("ALARM: {} breach, triggered", source.name());
        true
    }

    /// `Triggered → Active`: start driving the output.
    pub fn engage(
        &mut self,
        ctx: &SystemContext,
        hw: &dyn HardwarePort,
        sink: &mut dyn EventSink,
    ) {
        if self.state != AlarmState::Triggered {
            return;
        }
        ctx.alarm.set_active(true);
        ctx.alarm.clear_pending();
        self.state = AlarmState::Active;
        ctx.alarm.publish(self.state);

        self.drive(hw, sink, true);
        let source = self.source.unwrap_or(SensorId::Temperature);
        warn!("ALARM ACTIVE ({})", source.name());
        sink.emit(&AppEvent::AlarmRaised(source));
    }

    /// One active cycle: toggle, then re-evaluate both sensors.
    pub fn drive_cycle(
        &mut self,
        ctx: &SystemContext,
        hw: &dyn HardwarePort,
        sink: &mut dyn EventSink,
    ) -> AlarmState {
        if self.state != AlarmState::Active {
            return self.state;
        }

        let level = !self.output.level();
        self.drive(hw, sink, level);

        let mut alarming = false;
        for sensor in SensorId::ALL {
            match check(ctx, hw, sensor) {
                Ok(breached) => alarming |= breached,
                Err(fault) => {
                    error!("ALARM: {} unreadable ({}), staying active", sensor.name(), fault);
                    sink.emit(&AppEvent::SensorFault { sensor, fault });
                    alarming = true;
                }
            }
        }

        if !alarming {
            self.clear(ctx, hw, sink);
        }
        self.state
    }

    fn clear(&mut self, ctx: &SystemContext, hw: &dyn HardwarePort, sink: &mut dyn EventSink) {
        self.drive(hw, sink, false);
        ctx.alarm.clear_pending();
        ctx.alarm.finish_episode();
        self.state = AlarmState::Idle;
        self.source = None;
        ctx.alarm.publish(self.state);
        info!("ALARM CLEARED");
        sink.emit(&AppEvent::AlarmCleared);
    }

    /// Output failures are reported but never change state.
    fn drive(&mut self, hw: &dyn HardwarePort, sink: &mut dyn EventSink, level: bool) {
        if let Err(fault) = self.output.write(hw, level) {
            error!("ALARM: output write failed: {}", fault);
            sink.emit(&AppEvent::OutputFault(fault));
        }
    }
}
