//! BattMon firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GpioHardware      LogEventSink      ChannelConsole            │
//! │  (HardwarePort)    (EventSink)       (ConsolePort, UART0)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  SystemContext (sensors · debug flags · alarm signal)  │    │
//! │  │  monitors ──▶ AlarmCoordinator      dispatcher         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Tasks: alarm (5) · temperature (4) · battery (3) · console (1)│
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};

use battmon::adapters::hardware::GpioHardware;
use battmon::adapters::log_sink::LogEventSink;
use battmon::alarm::AlarmCoordinator;
use battmon::app::context::SystemContext;
use battmon::app::ports::HardwarePort;
use battmon::config::SystemConfig;
use battmon::console::channel::{ChannelConsole, STDIN_INPUT, spawn_stdin_reader};
use battmon::drivers::{hw_init, output::OutputPort};
use battmon::pins;
use battmon::tasks;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BattMon v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Shared state ───────────────────────────────────────
    let config = SystemConfig::build_time();
    let ctx = Arc::new(SystemContext::new(config));
    let hw: Arc<dyn HardwarePort> = Arc::new(GpioHardware::new());

    ctx.configure_hardware(hw.as_ref())
        .context("sensor pin configuration")?;
    let mut coordinator = AlarmCoordinator::new(OutputPort::new(pins::ALARM_OUTPUT_GPIO));
    coordinator
        .configure(hw.as_ref())
        .context("alarm output configuration")?;

    // ── 4. Console transport ──────────────────────────────────
    let _reader = spawn_stdin_reader(&STDIN_INPUT).context("stdin reader")?;
    let console = ChannelConsole::new(&STDIN_INPUT, io::stdout());

    // ── 5. Tasks ──────────────────────────────────────────────
    let handles = tasks::spawn_all(ctx, hw, coordinator, console, LogEventSink::new())
        .context("task spawn")?;
    info!("System ready.");

    // The console returns when UART input closes; the monitors and the
    // alarm coordinator never do.
    if handles.console.join().is_err() {
        error!("console task panicked");
    }
    if handles.alarm.join().is_err() {
        error!("alarm task panicked");
    }
    Ok(())
}
