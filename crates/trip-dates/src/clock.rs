//! The reference "now" for resolution and classification.
//!
//! Nothing in this crate reads the wall clock on its own. Callers either pass
//! an epoch-millisecond `now` directly or hand a [`Clock`] to
//! [`TripDates`](crate::TripDates), which reads it once per top-level call.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Source of the current instant, in epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at one instant. Used for reproducible results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl FixedClock {
    pub fn at<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        FixedClock(instant.timestamp_millis())
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// The calendar year of `now_ms` as seen on a wall clock in `tz`.
///
/// Out-of-range instants fall back to the Unix epoch year.
pub fn reference_year<Tz: TimeZone>(now_ms: i64, tz: &Tz) -> i32 {
    DateTime::from_timestamp_millis(now_ms)
        .map(|dt| dt.with_timezone(tz).year())
        .unwrap_or(1970)
}
