//! All tasks running on host threads, driven through the console channel.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use battmon::alarm::{AlarmCoordinator, AlarmState};
use battmon::app::context::SystemContext;
use battmon::app::events::AppEvent;
use battmon::app::ports::{EventSink, HardwarePort, Line};
use battmon::config::SystemConfig;
use battmon::console::channel::{ChannelConsole, ConsoleInput};
use battmon::drivers::output::OutputPort;
use battmon::pins;
use battmon::tasks;

use crate::mock_hw::MockHardware;

static INPUT: ConsoleInput = ConsoleInput::new();

/// Console output shared with the test body.
#[derive(Clone, Default)]
struct SharedOut(Arc<Mutex<Vec<u8>>>);

impl SharedOut {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedEvents(Arc<Mutex<Vec<AppEvent>>>);

impl EventSink for SharedEvents {
    fn emit(&mut self, event: &AppEvent) {
        self.0.lock().unwrap().push(*event);
    }
}

fn fast_config() -> SystemConfig {
    SystemConfig {
        temperature_period_ms: 5,
        battery_period_ms: 5,
        alarm_drive_period_ms: 10,
        console_timeout_ms: 20,
        ..SystemConfig::default()
    }
}

fn push(line: &str) {
    let mut l = Line::new();
    l.push_str(line).unwrap();
    assert!(INPUT.push(l));
}

fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn console_injection_drives_the_alarm_end_to_end() {
    let ctx = Arc::new(SystemContext::new(fast_config()));
    let mock = Arc::new(MockHardware::healthy());
    let hw: Arc<dyn HardwarePort> = mock.clone();
    ctx.configure_hardware(hw.as_ref()).unwrap();
    let mut coordinator = AlarmCoordinator::new(OutputPort::new(pins::ALARM_OUTPUT_GPIO));
    coordinator.configure(hw.as_ref()).unwrap();

    let out = SharedOut::default();
    let events = SharedEvents::default();
    let handles = tasks::spawn_all(
        ctx.clone(),
        hw,
        coordinator,
        ChannelConsole::new(&INPUT, out.clone()),
        events.clone(),
    )
    .unwrap();

    push(":set_debug t 1");
    push(":set_temp 4095");
    wait_until("alarm active", || ctx.alarm.state() == AlarmState::Active);
    wait_until("output toggling", || {
        mock.writes_to(pins::ALARM_OUTPUT_GPIO).len() >= 4
    });

    push(":set_temp 0");
    wait_until("alarm idle", || ctx.alarm.state() == AlarmState::Idle);
    assert!(!mock.output_level(pins::ALARM_OUTPUT_GPIO));

    push(":read");
    wait_until("read reply", || out.text().contains("alarm: idle"));

    INPUT.close();
    handles.console.join().unwrap();

    let text = out.text();
    assert!(text.contains("ok: temperature debug on"), "{text}");
    assert!(text.contains("ok: temperature debug value = 4095"), "{text}");

    let events = events.0.lock().unwrap().clone();
    assert_eq!(events.first(), Some(&AppEvent::Started));
    assert!(events.contains(&AppEvent::AlarmRaised(battmon::app::context::SensorId::Temperature)));
    assert!(events.contains(&AppEvent::AlarmCleared));
}
