use std::time::{Duration, Instant};

/// Fixed-interval tick scheduler for a single-threaded loop.
///
/// When the loop falls behind by several intervals, only one tick is due;
/// missed ticks are dropped rather than replayed back to back.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    interval: Duration,
    last_tick: Instant,
}

impl TickClock {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    /// Returns true when a tick should run at `now`, and restarts the interval.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }
        self.last_tick = now;
        true
    }

    /// Restarts the interval, e.g. after resuming so the first tick is not immediate.
    pub fn restart(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }
}
