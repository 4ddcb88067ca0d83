//! Outbound application events.
//!
//! The alarm coordinator and task loops emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them.

use crate::error::HardwareFault;

use super::context::SensorId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Tasks are running.
    Started,

    /// The coordinator started driving the alarm output; carries the
    /// sensor whose breach woke it.
    AlarmRaised(SensorId),

    /// Both thresholds re-checked clear; the output is low.
    AlarmCleared,

    /// A sensor could not be read during re-evaluation.
    SensorFault {
        sensor: SensorId,
        fault: HardwareFault,
    },

    /// The alarm output could not be driven.
    OutputFault(HardwareFault),
}
