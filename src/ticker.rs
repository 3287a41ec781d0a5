//! Fixed-interval tick source owned by the host loop.
//!
//! The ticker only does the bookkeeping: the host reports how much time has
//! passed and runs `Game::tick` once per interval that became due, one after
//! another on its own thread. Tests feed it synthetic durations.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    pending: Duration,
    stopped: bool,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            pending: Duration::ZERO,
            stopped: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Accounts for `elapsed` time and returns how many ticks are now due.
    /// A stopped ticker never fires.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.stopped {
            return 0;
        }
        self.pending += elapsed;
        let mut due = 0;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            due += 1;
        }
        due
    }

    /// Time left before the next tick is due.
    pub fn time_until_next(&self) -> Duration {
        self.interval.saturating_sub(self.pending)
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.pending = Duration::ZERO;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Restarts a stopped ticker with an empty backlog.
    pub fn reset(&mut self) {
        self.stopped = false;
        self.pending = Duration::ZERO;
    }
}
