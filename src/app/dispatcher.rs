//! Command dispatcher: one console line in, a reply out.
//!
//! ```text
//!   line ──trim──▶ ':'? ──lookup──▶ parse ──▶ execute ──▶ reply [+ status]
//!                   │ no             │ miss     │ bad args / range
//!                   ▼                ▼          ▼
//!                ignored        "error: ..."  "error: ..."
//! ```
//!
//! Every failure is caught here and turned into an error line; state is
//! only mutated by a fully validated [`Command`].

use core::fmt;

use log::{debug, warn};

use crate::diagnostics::TaskId;
use crate::error::CommandError;

use super::commands::{COMMAND_TABLE, Command, CommandKey, DebugFlag};
use super::context::{SensorId, SystemContext};
use super::ports::HardwarePort;

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a command (no leading `:`); nothing written.
    Ignored,
    Executed(CommandKey),
    Rejected(CommandError),
}

/// Apply a command's effect to the shared state. `Read`/`Help` are pure.
pub fn execute(cmd: &Command, ctx: &SystemContext) -> Result<(), CommandError> {
    match *cmd {
        Command::Inject { sensor, raw } => {
            ctx.sensor(sensor).set_debug_value(i32::from(raw))?;
        }
        Command::SetDebugAll(enabled) => ctx.set_debug_all(enabled),
        Command::SetDebugFlag { flag, enabled } => match flag {
            DebugFlag::Sensor(sensor) => ctx.sensor(sensor).set_debug_mode(enabled),
            DebugFlag::Logs => ctx.debug.set_logs(enabled),
        },
        Command::Read | Command::Help => {}
    }
    Ok(())
}

/// Handle one raw input line, writing the reply to `out`.
pub fn dispatch_line(
    line: &str,
    ctx: &SystemContext,
    hw: &dyn HardwarePort,
    out: &mut dyn fmt::Write,
) -> Result<Dispatch, fmt::Error> {
    let line = line.trim();
    if !line.starts_with(':') {
        return Ok(Dispatch::Ignored);
    }

    let outcome = Command::parse_line(line).and_then(|(key, cmd)| {
        execute(&cmd, ctx)?;
        Ok((key, cmd))
    });

    match outcome {
        Ok((key, cmd)) => {
            debug!("console: {:?}", cmd);
            acknowledge(&cmd, ctx, hw, out)?;
            if ctx.debug.logs() && key != CommandKey::Read {
                status_report(ctx, hw, out)?;
            }
            Ok(Dispatch::Executed(key))
        }
        Err(e) => {
            warn!("console: '{}' rejected: {}", line, e);
            writeln!(out, "error: {e}")?;
            Ok(Dispatch::Rejected(e))
        }
    }
}

fn acknowledge(
    cmd: &Command,
    ctx: &SystemContext,
    hw: &dyn HardwarePort,
    out: &mut dyn fmt::Write,
) -> fmt::Result {
    match *cmd {
        Command::Inject { sensor, raw } => {
            writeln!(out, "ok: {} debug value = {}", sensor.name(), raw)
        }
        Command::SetDebugAll(enabled) => {
            writeln!(out, "ok: battery+temperature debug {}", on_off(enabled))
        }
        Command::SetDebugFlag { flag, enabled } => {
            let name = match flag {
                DebugFlag::Sensor(sensor) => sensor.name(),
                DebugFlag::Logs => "logs",
            };
            writeln!(out, "ok: {} debug {}", name, on_off(enabled))
        }
        Command::Read => status_report(ctx, hw, out),
        Command::Help => help_text(out),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Live status: flags, fresh sensor readings, alarm state and, once any
/// task has recorded, the rolling timing averages.
pub fn status_report(
    ctx: &SystemContext,
    hw: &dyn HardwarePort,
    out: &mut dyn fmt::Write,
) -> fmt::Result {
    writeln!(out, "debug: {}", ctx.debug)?;
    for id in SensorId::ALL {
        let unit = match id {
            SensorId::Battery => "%",
            SensorId::Temperature => "C",
        };
        match ctx.sensor(id).read(hw) {
            Ok(r) => writeln!(out, "{}: {:.1} {} (raw {})", id.name(), r.scaled, unit, r.raw)?,
            Err(fault) => writeln!(out, "{}: fault ({})", id.name(), fault)?,
        }
    }
    writeln!(out, "alarm: {}", ctx.alarm.state())?;

    if ctx.timings.has_samples() {
        write!(out, "timing (avg ms):")?;
        for (i, task) in TaskId::ALL.into_iter().enumerate() {
            let sep = if i == 0 { " " } else { " | " };
            write!(out, "{}{} {:.3}", sep, task.name(), ctx.timings.average(task))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn help_text(out: &mut dyn fmt::Write) -> fmt::Result {
    writeln!(out, "commands:")?;
    for &(_, key) in COMMAND_TABLE {
        writeln!(out, "  {:<44} {}", key.usage(), key.summary())?;
    }
    Ok(())
}

/// Report emitted when a console wait times out: the status, but only
/// while diagnostics are on.
pub fn idle_report(
    ctx: &SystemContext,
    hw: &dyn HardwarePort,
    out: &mut dyn fmt::Write,
) -> Result<bool, fmt::Error> {
    if !ctx.debug.logs() {
        return Ok(false);
    }
    status_report(ctx, hw, out)?;
    Ok(true)
}
