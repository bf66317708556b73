//! Explicit per-call deadline threaded through every client signature.

use std::time::{Duration, Instant};

/// Stand-in for timeouts too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

fn later(now: Instant, by: Duration) -> Instant {
    now.checked_add(by)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Point in monotonic time after which a call must not be started or awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    #[must_use]
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self::at(later(Instant::now(), timeout))
    }

    #[must_use]
    pub fn instant(self) -> Instant {
        self.at
    }

    /// Time left until the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining(self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    #[must_use]
    pub fn is_expired(self) -> bool {
        Instant::now() >= self.at
    }

    /// The earlier of `self` and `now + max`. Never extends the deadline.
    #[must_use]
    pub fn capped(self, max: Duration) -> Self {
        let cap = later(Instant::now(), max);
        Self::at(self.at.min(cap))
    }
}
