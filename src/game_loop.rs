//! Fixed-rate tick scheduling for the terminal driver.

use crate::constants::MAX_CATCH_UP_TICKS;
use std::time::{Duration, Instant};

/// Deadline-based tick clock.
///
/// The driver polls input until `time_until_next`, then asks `due_ticks`
/// how many simulation steps to run. A disarmed timer reports nothing due.
#[derive(Debug, Clone)]
pub struct TickTimer {
    period: Duration,
    next: Option<Instant>,
}

impl TickTimer {
    pub fn new(tick_rate: u32) -> Self {
        let rate = tick_rate.max(1);
        Self {
            period: Duration::from_secs(1) / rate,
            next: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the timer so the first tick is one period after `now`.
    /// Already armed timers keep their deadline.
    pub fn start(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now + self.period);
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Number of ticks whose deadline has passed, at most `MAX_CATCH_UP_TICKS`.
    ///
    /// After a stall longer than the cap, the schedule restarts from `now`
    /// instead of replaying every missed step.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };

        let mut due = 0;
        while next <= now && due < MAX_CATCH_UP_TICKS {
            due += 1;
            next += self.period;
        }
        if next <= now {
            next = now + self.period;
        }
        self.next = Some(next);
        due
    }

    /// How long the driver may block on input before the next tick, if armed.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }
}
