//! Task layout and spawning.
//!
//! ```text
//!  Core 1 (APP)                          Core 0 (PRO)
//!  ┌─────────────────────┐               ┌──────────────────┐
//!  │ alarm        prio 5 │◀── signal ──┐ │ console   prio 1 │
//!  │ temperature  prio 4 │─────────────┤ │ stdin     prio 1 │
//!  │ battery      prio 3 │─────────────┘ └──────────────────┘
//!  └─────────────────────┘
//! ```
//!
//! The alarm coordinator outranks the monitors so a breach is acted on
//! before the next sample; the console has the lowest priority of all.

pub mod alarm_task;
pub mod console;
pub mod monitor;

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

use log::info;

use crate::alarm::AlarmCoordinator;
use crate::app::context::{SensorId, SystemContext};
use crate::app::events::AppEvent;
use crate::app::ports::{ConsolePort, EventSink, HardwarePort};
use crate::drivers::task_pin::{Core, TaskSpec, spawn_on_core};

pub const ALARM_TASK: TaskSpec = TaskSpec {
    name: "alarm\0",
    core: Core::App,
    priority: 5,
    stack_kb: 6,
};

pub const TEMPERATURE_TASK: TaskSpec = TaskSpec {
    name: "temperature\0",
    core: Core::App,
    priority: 4,
    stack_kb: 4,
};

pub const BATTERY_TASK: TaskSpec = TaskSpec {
    name: "battery\0",
    core: Core::App,
    priority: 3,
    stack_kb: 4,
};

pub const CONSOLE_TASK: TaskSpec = TaskSpec {
    name: "console\0",
    core: Core::Pro,
    priority: 1,
    stack_kb: 8,
};

pub fn monitor_spec(sensor: SensorId) -> TaskSpec {
    match sensor {
        SensorId::Battery => BATTERY_TASK,
        SensorId::Temperature => TEMPERATURE_TASK,
    }
}

/// Join handles of the spawned tasks. Only the console ever finishes.
pub struct TaskHandles {
    pub alarm: JoinHandle<()>,
    pub temperature: JoinHandle<()>,
    pub battery: JoinHandle<()>,
    pub console: JoinHandle<()>,
}

/// Spawn the coordinator, both monitors and the console.
///
/// The coordinator goes first so no breach signal can be raised before
/// something is waiting on it.
pub fn spawn_all(
    ctx: Arc<SystemContext>,
    hw: Arc<dyn HardwarePort>,
    coordinator: AlarmCoordinator,
    port: impl ConsolePort + Send + 'static,
    mut sink: impl EventSink + Send + 'static,
) -> io::Result<TaskHandles> {
    sink.emit(&AppEvent::Started);

    let alarm = {
        let (ctx, hw) = (ctx.clone(), hw.clone());
        spawn_on_core(ALARM_TASK, move || {
            alarm_task::run(ctx, hw, coordinator, sink);
        })?
    };

    let spawn_monitor = |sensor: SensorId| {
        let (ctx, hw) = (ctx.clone(), hw.clone());
        spawn_on_core(monitor_spec(sensor), move || {
            monitor::run(ctx, hw, sensor);
        })
    };
    let temperature = spawn_monitor(SensorId::Temperature)?;
    let battery = spawn_monitor(SensorId::Battery)?;

    let console = spawn_on_core(CONSOLE_TASK, move || console::run(ctx, hw, port))?;

    info!("tasks: all spawned");
    Ok(TaskHandles {
        alarm,
        temperature,
        battery,
        console,
    })
}
