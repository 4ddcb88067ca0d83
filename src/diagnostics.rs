//! Runtime diagnostics: per-task execution timing.
//!
//! Each task owns a [`TimingWindow`] of its ten most recent cycle
//! durations. The task brackets only its productive work (after waking,
//! before suspending) and records only while the `logs` debug flag is on.
//! The console's status report reads the rolling averages.
//!
//! Windows live behind `embassy_sync` blocking mutexes so the writer
//! (owning task) and the reader (console) never see a torn deque.

use core::cell::RefCell;
use core::time::Duration;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::Deque;

/// Samples kept per task.
pub const TIMING_WINDOW_LEN: usize = 10;

/// Fixed-capacity rolling window of durations (microseconds).
#[derive(Debug, Clone, Default)]
pub struct TimingWindow {
    samples: Deque<u32, TIMING_WINDOW_LEN>,
}

impl TimingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, evicting the oldest once the window is full.
    pub fn record(&mut self, elapsed: Duration) {
        let micros = u32::try_from(elapsed.as_micros()).unwrap_or(u32::MAX);
        if self.samples.is_full() {
            let _ = self.samples.pop_front();
        }
        let _ = self.samples.push_back(micros);
    }

    /// Mean of the held samples in milliseconds; `0.0` when empty.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: u64 = self.samples.iter().map(|&us| u64::from(us)).sum();
        (total as f64 / self.samples.len() as f64 / 1000.0) as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Per-task windows
// ───────────────────────────────────────────────────────────────

/// The four logical tasks that record timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    TemperatureMonitor = 0,
    BatteryMonitor = 1,
    Alarm = 2,
    Console = 3,
}

impl TaskId {
    pub const ALL: [Self; 4] = [
        Self::TemperatureMonitor,
        Self::BatteryMonitor,
        Self::Alarm,
        Self::Console,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::TemperatureMonitor => "temperature",
            Self::BatteryMonitor => "battery",
            Self::Alarm => "alarm",
            Self::Console => "console",
        }
    }
}

const TASK_COUNT: usize = TaskId::ALL.len();

type WindowCell = Mutex<CriticalSectionRawMutex, RefCell<TimingWindow>>;

pub struct TaskTimings {
    windows: [WindowCell; TASK_COUNT],
}

impl Default for TaskTimings {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTimings {
    pub fn new() -> Self {
        Self {
            windows: core::array::from_fn(|_| Mutex::new(RefCell::new(TimingWindow::new()))),
        }
    }

    pub fn record(&self, task: TaskId, elapsed: Duration) {
        self.windows[task as usize].lock(|w| w.borrow_mut().record(elapsed));
    }

    /// Rolling average for `task` in milliseconds.
    pub fn average(&self, task: TaskId) -> f32 {
        self.windows[task as usize].lock(|w| w.borrow().average())
    }

    pub fn sample_count(&self, task: TaskId) -> usize {
        self.windows[task as usize].lock(|w| w.borrow().len())
    }

    /// True once any task has recorded at least one sample.
    pub fn has_samples(&self) -> bool {
        TaskId::ALL.iter().any(|&t| self.sample_count(t) > 0)
    }
}
