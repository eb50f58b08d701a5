//! Injectable time source and periodic-task runner.
//!
//! The engine never reads the wall clock directly; every operation takes
//! "today" from a `Clock` so tests can evaluate any date. The runner is a
//! plain timer + callback; multi-instance coordination (leader election,
//! distributed locks) can wrap it later without touching the engine.

use chrono::NaiveDate;
use std::cell::Cell;
use std::time::Duration;

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation used by the CLI.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Controllable clock for tests.
pub struct FixedClock {
    current: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current: Cell::new(today),
        }
    }

    pub fn advance_days(&self, days: i64) {
        let d = self.current.get() + chrono::Duration::days(days);
        self.current.set(d);
    }

    pub fn set(&self, today: NaiveDate) {
        self.current.set(today);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.current.get()
    }
}

/// Fixed-interval runner for the recompute and reminder jobs.
pub struct PeriodicRunner {
    pub interval: Duration,
}

impl PeriodicRunner {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Invoke `tick` immediately and then once per interval. With
    /// `cycles = Some(n)` the runner stops after n ticks (used by tests
    /// and by `watch --cycles`); with `None` it runs until the process
    /// is terminated.
    pub fn run<F>(&self, cycles: Option<u64>, mut tick: F)
    where
        F: FnMut(),
    {
        let mut done: u64 = 0;
        loop {
            tick();
            done += 1;

            if let Some(max) = cycles
                && done >= max
            {
                break;
            }

            std::thread::sleep(self.interval);
        }
    }
}
