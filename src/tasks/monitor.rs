//! Monitor tasks (temperature, battery).
//!
//! Each cycle reads one sensor, compares it against its threshold and, on a
//! breach, asks the alarm coordinator to wake. A monitor never blocks on the
//! coordinator: the request is a one-slot signal, suppressed entirely while
//! the alarm is already active. A sensor fault counts as "no breach".

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::alarm;
use crate::app::context::{SensorId, SystemContext};
use crate::app::ports::HardwarePort;
use crate::drivers::periodic::PeriodicTimer;
use crate::error::HardwareFault;

/// Result of one monitor cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Within limits.
    Clear,
    /// Breach; the coordinator was signalled.
    Signalled,
    /// Breach, but the alarm is active or ended an episode after the sample.
    Suppressed,
    /// The sensor could not be read.
    Fault(HardwareFault),
}

/// Sample `sensor` once and signal the coordinator on a breach.
pub fn run_cycle(ctx: &SystemContext, hw: &dyn HardwarePort, sensor: SensorId) -> CycleOutcome {
    let sampled_in = ctx.alarm.episode();
    match alarm::check(ctx, hw, sensor) {
        Ok(false) => CycleOutcome::Clear,
        Ok(true) if ctx.alarm.request(sensor, sampled_in) => CycleOutcome::Signalled,
        Ok(true) => CycleOutcome::Suppressed,
        Err(fault) => CycleOutcome::Fault(fault),
    }
}

pub fn period(ctx: &SystemContext, sensor: SensorId) -> Duration {
    let ms = match sensor {
        SensorId::Battery => ctx.config.battery_period_ms,
        SensorId::Temperature => ctx.config.temperature_period_ms,
    };
    Duration::from_millis(u64::from(ms))
}

/// Monitor loop. Never returns.
pub fn run(ctx: Arc<SystemContext>, hw: Arc<dyn HardwarePort>, sensor: SensorId) -> ! {
    let mut timer = PeriodicTimer::new(period(&ctx, sensor));
    let mut last = CycleOutcome::Clear;
    info!("{} monitor: every {:?}", sensor.name(), timer.period());

    loop {
        timer.wait();
        let start = Instant::now();
        let outcome = run_cycle(&ctx, hw.as_ref(), sensor);
        if ctx.debug.logs() {
            ctx.timings.record(sensor.task(), start.elapsed());
        }

        if outcome != last {
            match outcome {
                CycleOutcome::Fault(fault) => {
                    warn!("{} monitor: {} (treated as no breach)", sensor.name(), fault);
                }
                CycleOutcome::Signalled => info!("{} monitor: threshold breached", sensor.name()),
                other => debug!("{} monitor: {:?}", sensor.name(), other),
            }
            last = outcome;
        }
    }
}
