//! Monitor → coordinator → output, driven one cycle at a time.

use std::sync::Mutex;

use battmon::alarm::{AlarmCoordinator, AlarmState};
use battmon::app::context::{SensorId, SystemContext};
use battmon::app::events::AppEvent;
use battmon::app::ports::{HardwarePort, PinDirection};
use battmon::config::SystemConfig;
use battmon::drivers::output::OutputPort;
use battmon::error::HardwareFault;
use battmon::pins::{self, Pin};
use battmon::sensors::Sensor;
use battmon::tasks::monitor::{self, CycleOutcome};

use crate::mock_hw::{MockHardware, RecordingSink};

fn setup() -> (SystemContext, MockHardware, AlarmCoordinator, RecordingSink) {
    let ctx = SystemContext::new(SystemConfig::default());
    let hw = MockHardware::healthy();
    let mut alarm = AlarmCoordinator::new(OutputPort::new(pins::ALARM_OUTPUT_GPIO));
    alarm.configure(&hw).unwrap();
    (ctx, hw, alarm, RecordingSink::default())
}

/// Take the pending wake the way the coordinator task does.
fn wake(ctx: &SystemContext, alarm: &mut AlarmCoordinator, hw: &MockHardware, sink: &mut RecordingSink) {
    let source = ctx.alarm.try_take().expect("a breach should be pending");
    assert!(alarm.notify(ctx, source));
    alarm.engage(ctx, hw, sink);
}

#[test]
fn injected_overheat_raises_toggles_and_clears() {
    let (ctx, hw, mut alarm, mut sink) = setup();
    ctx.temperature.set_debug_mode(true);
    ctx.temperature.set_debug_value(4095).unwrap();

    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Signalled
    );
    wake(&ctx, &mut alarm, &hw, &mut sink);
    assert_eq!(alarm.state(), AlarmState::Active);
    assert!(ctx.alarm.is_active());
    assert!(hw.output_level(pins::ALARM_OUTPUT_GPIO));

    // Monitors are suppressed while the alarm is active.
    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Suppressed
    );
    assert!(!ctx.alarm.is_pending());

    for _ in 0..3 {
        assert_eq!(alarm.drive_cycle(&ctx, &hw, &mut sink), AlarmState::Active);
    }
    // configure low, engage high, then three toggles.
    assert_eq!(
        hw.writes_to(pins::ALARM_OUTPUT_GPIO),
        vec![false, true, false, true, false]
    );

    ctx.temperature.set_debug_value(0).unwrap();
    assert_eq!(alarm.drive_cycle(&ctx, &hw, &mut sink), AlarmState::Idle);
    assert!(!hw.output_level(pins::ALARM_OUTPUT_GPIO));
    assert!(!ctx.alarm.is_active());
    assert_eq!(ctx.alarm.state(), AlarmState::Idle);
    assert_eq!(
        sink.events,
        vec![AppEvent::AlarmRaised(SensorId::Temperature), AppEvent::AlarmCleared]
    );

    // Monitors resume signalling once idle.
    ctx.temperature.set_debug_value(4095).unwrap();
    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Signalled
    );
}

type Hook<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Runs `hook` once, between taking an analog sample and returning it.
struct InterleavedHardware<'a> {
    inner: &'a MockHardware,
    hook: Mutex<Option<Hook<'a>>>,
}

impl<'a> InterleavedHardware<'a> {
    fn new(inner: &'a MockHardware, hook: impl FnOnce() + Send + 'a) -> Self {
        Self {
            inner,
            hook: Mutex::new(Some(Box::new(hook))),
        }
    }
}

impl HardwarePort for InterleavedHardware<'_> {
    fn configure(&self, pin: Pin, direction: PinDirection) -> Result<(), HardwareFault> {
        self.inner.configure(pin, direction)
    }

    fn read_analog(&self, pin: Pin) -> Result<u16, HardwareFault> {
        let sample = self.inner.read_analog(pin);
        let hook = self.hook.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        sample
    }

    fn read_digital(&self, pin: Pin) -> Result<bool, HardwareFault> {
        self.inner.read_digital(pin)
    }

    fn write_digital(&self, pin: Pin, level: bool) -> Result<(), HardwareFault> {
        self.inner.write_digital(pin, level)
    }
}

#[test]
fn breach_sampled_before_the_alarm_clears_does_not_restart_it() {
    let (ctx, hw, mut alarm, mut sink) = setup();
    hw.set_analog(pins::TEMP_ADC_GPIO, 4095);
    monitor::run_cycle(&ctx, &hw, SensorId::Temperature);
    wake(&ctx, &mut alarm, &hw, &mut sink);
    assert!(ctx.alarm.is_active());

    // The monitor reads 4095; before it can request, the temperature
    // recovers and the coordinator ends the episode.
    let interleaved = InterleavedHardware::new(&hw, || {
        hw.set_analog(pins::TEMP_ADC_GPIO, 300);
        assert_eq!(alarm.drive_cycle(&ctx, &hw, &mut sink), AlarmState::Idle);
    });
    assert_eq!(
        monitor::run_cycle(&ctx, &interleaved, SensorId::Temperature),
        CycleOutcome::Suppressed
    );
    drop(interleaved);

    assert!(!ctx.alarm.is_pending());
    assert_eq!(ctx.alarm.try_take(), None);
    assert_eq!(ctx.alarm.state(), AlarmState::Idle);
    assert!(!hw.output_level(pins::ALARM_OUTPUT_GPIO));
    assert_eq!(
        sink.events,
        vec![AppEvent::AlarmRaised(SensorId::Temperature), AppEvent::AlarmCleared]
    );

    // A breach sampled after the episode ended raises a new one.
    hw.set_analog(pins::TEMP_ADC_GPIO, 4095);
    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Signalled
    );
}

#[test]
fn alarm_holds_while_either_sensor_breaches() {
    let (ctx, hw, mut alarm, mut sink) = setup();
    hw.set_analog(pins::TEMP_ADC_GPIO, 4000);
    monitor::run_cycle(&ctx, &hw, SensorId::Temperature);
    wake(&ctx, &mut alarm, &hw, &mut sink);

    // Temperature recovers but the battery is now low.
    hw.set_analog(pins::TEMP_ADC_GPIO, 300);
    hw.set_analog(pins::BATTERY_ADC_GPIO, 200);
    assert_eq!(alarm.drive_cycle(&ctx, &hw, &mut sink), AlarmState::Active);

    hw.set_analog(pins::BATTERY_ADC_GPIO, 4095);
    assert_eq!(alarm.drive_cycle(&ctx, &hw, &mut sink), AlarmState::Idle);
}

#[test]
fn coalesces_simultaneous_breaches() {
    let (ctx, hw, mut alarm, mut sink) = setup();
    hw.set_analog(pins::TEMP_ADC_GPIO, 4095);
    hw.set_analog(pins::BATTERY_ADC_GPIO, 0);

    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Signalled
    );
    assert_eq!(
        monitor::run_cycle(&ctx, &hw, SensorId::Battery),
        CycleOutcome::Signalled
    );
    // One slot: the later request overwrote the earlier one.
    assert_eq!(ctx.alarm.try_take(), Some(SensorId::Battery));
    assert_eq!(ctx.alarm.try_take(), None);

    assert!(alarm.notify(&ctx, SensorId::Battery));
    alarm.engage(&ctx, &hw, &mut sink);
    assert_eq!(sink.events, vec![AppEvent::AlarmRaised(SensorId::Battery)]);
}

#[test]
fn unreadable_sensor_keeps_alarm_active() {
    let (ctx, hw, mut alarm, mut sink) = setup();
    hw.set_analog(pins::TEMP_ADC_GPIO, 4095);
    monitor::run_cycle(&ctx, &hw, SensorId::Temperature);
    wake(&ctx, &mut alarm, &hw, &mut sink);

    hw.set_analog(pins::TEMP_ADC_GPIO, 300);
    hw.break_pin(pins::BATTERY_ADC_GPIO);
    assert_eq!(alarm.drive_cycle(&ctx, &hw, &mut sink), AlarmState::Active);
    assert!(sink.events.contains(&AppEvent::SensorFault {
        sensor: SensorId::Battery,
        fault: HardwareFault::AdcReadFailed(pins::BATTERY_ADC_GPIO),
    }));

    hw.repair_pin(pins::BATTERY_ADC_GPIO);
    assert_eq!(alarm.drive_cycle(&ctx, &hw, &mut sink), AlarmState::Idle);
}

#[test]
fn output_fault_is_reported_not_fatal() {
    let (ctx, hw, mut alarm, mut sink) = setup();
    hw.set_analog(pins::TEMP_ADC_GPIO, 4095);
    monitor::run_cycle(&ctx, &hw, SensorId::Temperature);

    hw.break_pin(pins::ALARM_OUTPUT_GPIO);
    wake(&ctx, &mut alarm, &hw, &mut sink);
    assert_eq!(alarm.state(), AlarmState::Active);
    assert!(sink.events.contains(&AppEvent::OutputFault(
        HardwareFault::GpioWriteFailed(pins::ALARM_OUTPUT_GPIO)
    )));
}

#[test]
fn monitor_fault_does_not_signal() {
    let (ctx, hw, _alarm, _sink) = setup();
    hw.break_pin(pins::TEMP_ADC_GPIO);
    assert!(matches!(
        monitor::run_cycle(&ctx, &hw, SensorId::Temperature),
        CycleOutcome::Fault(_)
    ));
    assert!(!ctx.alarm.is_pending());
}
