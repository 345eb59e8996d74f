//! Fade Timer
//!
//! A periodic ticker measured against the frame clock but independent of
//! the frame rate: each poll reports how many whole intervals have elapsed
//! since the last one, so slow frames catch up and fast frames see zero.

use std::time::Duration;

/// Periodic ticker for the reveal fade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FadeTicker {
    interval: Duration,
    next_due: Duration,
}

impl FadeTicker {
    /// Arm a ticker at clock time `now`. The first tick is due one interval later.
    ///
    /// A zero interval is treated as one millisecond.
    pub fn armed(interval: Duration, now: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Clock time of the next tick.
    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Number of ticks that fell due up to `now`, consuming them.
    pub fn poll(&mut self, now: Duration) -> u32 {
        let mut due = 0;
        while now >= self.next_due {
            due += 1;
            self.next_due += self.interval;
        }
        due
    }
}
