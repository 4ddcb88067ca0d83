//! Alarm coordinator task.
//!
//! Idle: blocked on the wake signal. Once woken it engages the alarm and
//! runs drive cycles on a fixed cadence until both sensors read clear, then
//! goes back to waiting. Signals arriving while active are suppressed at the
//! source, so the active loop never consults them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::alarm::{AlarmCoordinator, AlarmState};
use crate::app::context::{SensorId, SystemContext};
use crate::app::ports::{EventSink, HardwarePort};
use crate::diagnostics::TaskId;
use crate::drivers::periodic::PeriodicTimer;

pub fn drive_period(ctx: &SystemContext) -> Duration {
    Duration::from_millis(u64::from(ctx.config.alarm_drive_period_ms))
}

/// Handle one wake: engage, then drive until the condition clears.
pub fn run_episode(
    ctx: &SystemContext,
    hw: &dyn HardwarePort,
    coordinator: &mut AlarmCoordinator,
    sink: &mut dyn EventSink,
    source: SensorId,
) {
    let start = Instant::now();
    if !coordinator.notify(ctx, source) {
        return;
    }
    coordinator.engage(ctx, hw, sink);
    record(ctx, start);

    let mut timer = PeriodicTimer::new(drive_period(ctx));
    while coordinator.state() == AlarmState::Active {
        timer.wait();
        let start = Instant::now();
        coordinator.drive_cycle(ctx, hw, sink);
        record(ctx, start);
    }
}

fn record(ctx: &SystemContext, start: Instant) {
    if ctx.debug.logs() {
        ctx.timings.record(TaskId::Alarm, start.elapsed());
    }
}

/// Coordinator loop. Never returns.
pub fn run(
    ctx: Arc<SystemContext>,
    hw: Arc<dyn HardwarePort>,
    mut coordinator: AlarmCoordinator,
    mut sink: impl EventSink,
) -> ! {
    loop {
        let source = ctx.alarm.wait_for_breach();
        run_episode(&ctx, hw.as_ref(), &mut coordinator, &mut sink, source);
    }
}
