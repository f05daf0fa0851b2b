//! Per-probe refresh cadence.
//!
//! Every probe is woken on each scheduler tick, but most only want to re-sample on a
//! slower interval of their own. The policy here decides whether enough time has passed
//! and stamps the probe when it has.

use std::time::{Duration, Instant};

/// Decide whether a probe refreshes at `now`, stamping `last_refresh` when it does.
///
/// The first call (nothing stamped yet) always refreshes. Afterwards a refresh happens
/// only once strictly more than `interval` has elapsed since the last stamp. With exact
/// 5s ticks and a 10s interval refreshes land on t=0, 15, 30, ...; ticks that arrive even
/// slightly late refresh on every second tick.
pub fn should_refresh(last_refresh: &mut Option<Instant>, interval: Duration, now: Instant) -> bool {
    match *last_refresh {
        None => {
            *last_refresh = Some(now);
            true
        }
        Some(last) if now.saturating_duration_since(last) > interval => {
            *last_refresh = Some(now);
            true
        }
        Some(_) => false,
    }
}

/// Optional capability for things that refresh on their own interval.
pub trait Refreshable {
    fn refresh_interval(&self) -> Duration;

    fn last_refresh(&self) -> Option<Instant>;

    fn stamp(&mut self, now: Instant);

    fn should_refresh(&mut self, now: Instant) -> bool {
        let mut last = self.last_refresh();
        let due = should_refresh(&mut last, self.refresh_interval(), now);
        if due {
            self.stamp(now);
        }
        due
    }
}

/// Interval plus last-refresh stamp, embedded by scheduled probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    interval: Duration,
    last_refresh: Option<Instant>,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_refresh: None,
        }
    }
}

impl Refreshable for RefreshSchedule {
    fn refresh_interval(&self) -> Duration {
        self.interval
    }

    fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    fn stamp(&mut self, now: Instant) {
        self.last_refresh = Some(now);
    }

    fn should_refresh(&mut self, now: Instant) -> bool {
        should_refresh(&mut self.last_refresh, self.interval, now)
    }
}
