//! Console command flows against a live context.

use battmon::alarm::AlarmState;
use battmon::app::commands::CommandKey;
use battmon::app::context::{SensorId, SystemContext};
use battmon::app::dispatcher::{Dispatch, dispatch_line};
use battmon::config::SystemConfig;
use battmon::error::{CommandError, ValidationError};
use battmon::pins;
use battmon::sensors::Sensor;
use battmon::tasks::monitor::{self, CycleOutcome};

use crate::mock_hw::MockHardware;

fn send(line: &str, ctx: &SystemContext, hw: &MockHardware) -> (Dispatch, String) {
    let mut out = String::new();
    let outcome = dispatch_line(line, ctx, hw, &mut out).unwrap();
    (outcome, out)
}

fn setup() -> (SystemContext, MockHardware) {
    (SystemContext::new(SystemConfig::default()), MockHardware::healthy())
}

#[test]
fn battery_injection_shows_in_read() {
    let (ctx, hw) = setup();
    assert_eq!(
        send(":set_debug b 1", &ctx, &hw).0,
        Dispatch::Executed(CommandKey::SetDebug)
    );
    assert_eq!(
        send(":set_battery 10", &ctx, &hw).0,
        Dispatch::Executed(CommandKey::SetBattery)
    );

    let (outcome, out) = send(":read", &ctx, &hw);
    assert_eq!(outcome, Dispatch::Executed(CommandKey::Read));
    assert!(out.contains("debug: battery"), "{out}");
    assert!(out.contains("(raw 10)"), "{out}");
    assert!(out.contains("alarm: idle"), "{out}");

    // The injected value is what the monitor sees.
    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Battery),
        CycleOutcome::Signalled
    );
}

#[test]
fn injection_without_debug_mode_is_stored_but_inert() {
    let (ctx, hw) = setup();
    send(":set_temp 4095", &ctx, &hw);
    assert_eq!(ctx.temperature.debug().value(), 4095);
    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Clear
    );

    send(":set_debug 1", &ctx, &hw);
    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Signalled
    );
}

#[test]
fn unknown_and_malformed_commands_are_rejected() {
    let (ctx, hw) = setup();

    let (outcome, out) = send(":foo", &ctx, &hw);
    assert_eq!(outcome, Dispatch::Rejected(CommandError::Unknown));
    assert!(out.starts_with("error: unknown command"), "{out}");

    let (outcome, _) = send(":set_temp 5000", &ctx, &hw);
    assert_eq!(
        outcome,
        Dispatch::Rejected(CommandError::Invalid(ValidationError::AboveMax(5000)))
    );
    assert_eq!(ctx.temperature.debug().value(), 0);

    let (outcome, _) = send(":set_debug x 1", &ctx, &hw);
    assert_eq!(outcome, Dispatch::Rejected(CommandError::UnknownFlag('x')));
    assert_eq!(ctx.debug.to_string(), "off");
}

#[test]
fn logs_flag_appends_status_with_timings() {
    let (ctx, hw) = setup();
    let (_, out) = send(":set_debug l 1", &ctx, &hw);
    assert!(out.starts_with("ok: logs debug on"), "{out}");
    assert!(out.contains("debug: logs"), "{out}");
    assert!(!out.contains("timing"), "no samples yet: {out}");

    ctx.timings
        .record(battmon::diagnostics::TaskId::BatteryMonitor, std::time::Duration::from_millis(2));
    let (_, out) = send(":help", &ctx, &hw);
    assert!(out.contains(":set_battery"), "{out}");
    assert!(out.contains("timing (avg ms): temperature 0.000 | battery 2.000"), "{out}");
}

#[test]
fn read_reports_sensor_faults() {
    let (ctx, hw) = setup();
    hw.break_pin(pins::TEMP_ADC_GPIO);
    let (_, out) = send(":read", &ctx, &hw);
    assert!(out.contains("temperature: fault"), "{out}");
    assert!(out.contains("battery: 100.0 %"), "{out}");
    assert_eq!(ctx.alarm.state(), AlarmState::Idle);
}
