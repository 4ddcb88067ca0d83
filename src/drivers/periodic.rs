//! Drift-corrected periodic timer for task loops.
//!
//! Deadlines sit on an absolute grid `start + k * period`, so jitter in
//! one cycle never shifts the next. A cycle that overruns its slot runs
//! immediately and the timer jumps to the first grid point after `now`;
//! whole missed slots are skipped (counted, never replayed).
//!
//! On ESP-IDF `std::thread::sleep` maps to `vTaskDelay`, yielding the
//! core to lower-priority tasks.

use std::time::{Duration, Instant};

pub struct PeriodicTimer {
    period: Duration,
    next: Instant,
    overruns: u32,
}

impl PeriodicTimer {
    /// First deadline one period from now.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    pub fn starting_at(start: Instant, period: Duration) -> Self {
        Self {
            period,
            next: start + period,
            overruns: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The deadline the next `schedule`/`wait` call targets.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Slots skipped so far because a cycle ran past them.
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    /// Consume the current deadline and return how long to sleep from
    /// `now` to reach it (`ZERO` if already late).
    pub fn schedule(&mut self, now: Instant) -> Duration {
        if now < self.next {
            let wait = self.next - now;
            self.next += self.period;
            return wait;
        }

        let late = now - self.next;
        let skipped = u32::try_from(late.as_nanos() / self.period.as_nanos().max(1))
            .unwrap_or(u32::MAX);
        self.overruns = self.overruns.saturating_add(skipped);
        self.next += self.period * skipped.saturating_add(1);
        Duration::ZERO
    }

    /// Block the calling thread until the next deadline.
    pub fn wait(&mut self) {
        let sleep = self.schedule(Instant::now());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
    }
}
