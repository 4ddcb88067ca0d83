//! Console task: waits for operator lines and dispatches them.
//!
//! A wait that times out produces the periodic status report while
//! diagnostics are on. The task ends when the console input closes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::app::context::SystemContext;
use crate::app::dispatcher::{self, Dispatch};
use crate::app::ports::{ConsolePort, HardwarePort};
use crate::diagnostics::TaskId;
use crate::error::ConsoleError;

/// Result of one console step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Line(Dispatch),
    /// No line before the timeout; `reported` if a status report went out.
    Idle { reported: bool },
}

pub fn timeout(ctx: &SystemContext) -> Duration {
    Duration::from_millis(u64::from(ctx.config.console_timeout_ms))
}

/// Wait for one line (or the timeout) and handle it.
pub fn step(
    ctx: &SystemContext,
    hw: &dyn HardwarePort,
    console: &mut dyn ConsolePort,
    reply: &mut String,
) -> Result<Step, ConsoleError> {
    reply.clear();
    let line = console.read_line(timeout(ctx))?;

    let start = Instant::now();
    let step = match line {
        Some(line) => Step::Line(
            dispatcher::dispatch_line(&line, ctx, hw, reply)
                .map_err(|_| ConsoleError::WriteFailed)?,
        ),
        None => Step::Idle {
            reported: dispatcher::idle_report(ctx, hw, reply)
                .map_err(|_| ConsoleError::WriteFailed)?,
        },
    };
    if ctx.debug.logs() && matches!(step, Step::Line(_)) {
        ctx.timings.record(TaskId::Console, start.elapsed());
    }

    if !reply.is_empty() {
        console.write_str(reply)?;
    }
    Ok(step)
}

/// Console loop. Returns once the input side closes.
pub fn run(ctx: Arc<SystemContext>, hw: Arc<dyn HardwarePort>, mut console: impl ConsolePort) {
    let mut reply = String::new();
    info!("console: ready (':help' for commands)");
    loop {
        match step(&ctx, hw.as_ref(), &mut console, &mut reply) {
            Ok(_) => {}
            Err(ConsoleError::Closed) => {
                info!("console: input closed, task exiting");
                return;
            }
            Err(e) => warn!("console: {}", e),
        }
    }
}
