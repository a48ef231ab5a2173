use std::time::{Duration, Instant};

/// Fixed-period tick source. Late ticks are not replayed: a slow frame
/// yields one tick and the schedule restarts from `now`.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration, now: Instant) -> Self {
        Ticker { period, next: now + period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Starts a fresh period, used when resuming or restarting.
    pub fn restart(&mut self, now: Instant) {
        self.next = now + self.period;
    }
}
