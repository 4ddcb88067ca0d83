//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART0 in production, stderr on the host).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | monitors, alarm and console running");
            }
            AppEvent::AlarmRaised(source) => {
                warn!("ALARM | raised by {}", source.name());
            }
            AppEvent::AlarmCleared => {
                info!("ALARM | cleared");
            }
            AppEvent::SensorFault { sensor, fault } => {
                error!("FAULT | {} sensor: {}", sensor.name(), fault);
            }
            AppEvent::OutputFault(fault) => {
                error!("FAULT | alarm output: {}", fault);
            }
        }
    }
}
