//! Trip-level operations: one raw string in, one number or verdict out.
//!
//! [`TripDates`] binds a time zone and a [`Clock`]. The free functions at the
//! bottom use the host's local time zone and the system clock, which is what
//! a dashboard listing trips wants.

use chrono::{Local, TimeZone};

use crate::clock::{reference_year, Clock, SystemClock};
use crate::lifecycle::{classify, Lifecycle, TripTimeline};
use crate::resolve::{DateResolver, ResolvedTrip, UNRESOLVED};

/// Resolution and classification in a fixed time zone, against a clock.
#[derive(Debug, Clone)]
pub struct TripDates<Tz: TimeZone, C: Clock = SystemClock> {
    resolver: DateResolver<Tz>,
    clock: C,
}

impl TripDates<Local, SystemClock> {
    /// Local wall-clock time and the system clock.
    pub fn local() -> Self {
        TripDates::new(Local, SystemClock)
    }
}

impl<Tz: TimeZone, C: Clock> TripDates<Tz, C> {
    pub fn new(tz: Tz, clock: C) -> Self {
        TripDates {
            resolver: DateResolver::new(tz),
            clock,
        }
    }

    pub fn resolver(&self) -> &DateResolver<Tz> {
        &self.resolver
    }

    /// Read the clock.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Resolve `raw`, taking the default year from `now`.
    pub fn resolve_at(&self, raw: &str, now: i64) -> ResolvedTrip {
        let year = reference_year(now, self.resolver.timezone());
        self.resolver.resolve(raw, year)
    }

    /// Start-biased epoch milliseconds for `raw`, or 0 when unknown.
    pub fn parse_anchor(&self, raw: &str) -> i64 {
        self.resolve_at(raw, self.now()).anchor
    }

    pub fn is_trip_completed(&self, raw: &str, now: i64) -> bool {
        self.timeline(raw, now).is_completed
    }

    pub fn has_trip_started(&self, raw: &str, now: i64) -> bool {
        self.timeline(raw, now).has_started
    }

    pub fn is_trip_completed_now(&self, raw: &str) -> bool {
        self.is_trip_completed(raw, self.now())
    }

    pub fn has_trip_started_now(&self, raw: &str) -> bool {
        self.has_trip_started(raw, self.now())
    }

    /// Both verdicts for `raw`, computed against the same `now`.
    pub fn timeline(&self, raw: &str, now: i64) -> TripTimeline {
        let trip = self.resolve_at(raw, now);
        classify(trip.anchor, trip.completion_boundary, now)
    }

    /// [`timeline`](Self::timeline) with the clock read once.
    pub fn timeline_now(&self, raw: &str) -> TripTimeline {
        self.timeline(raw, self.now())
    }

    pub fn lifecycle(&self, raw: &str, now: i64) -> Lifecycle {
        self.timeline(raw, now).lifecycle
    }

    /// Sort trips by anchor, earliest first.
    ///
    /// Trips without an anchor go last. The sort is stable, so undated trips
    /// (and trips sharing an anchor) keep their input order.
    pub fn sort_by_anchor<T, F>(&self, items: &mut [T], raw_of: F)
    where
        F: Fn(&T) -> &str,
    {
        let now = self.now();
        items.sort_by_cached_key(|item| {
            let anchor = self.resolve_at(raw_of(item), now).anchor;
            (anchor == UNRESOLVED, anchor)
        });
    }
}

/// Anchor of `raw` in local time; 0 when it cannot be resolved.
///
/// ```
/// assert_eq!(trip_dates::parse_anchor("not a date"), 0);
/// assert!(trip_dates::parse_anchor("Jan 1, 2006") > 0);
/// ```
pub fn parse_anchor(raw: &str) -> i64 {
    TripDates::local().parse_anchor(raw)
}

/// Whether the trip described by `raw` ended before `now` (epoch ms).
///
/// ```
/// use chrono::{Local, TimeZone};
///
/// let before = Local.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap().timestamp_millis();
/// let after = Local.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap().timestamp_millis();
/// assert!(!trip_dates::is_trip_completed("2025", before));
/// assert!(trip_dates::is_trip_completed("2025", after));
/// ```
pub fn is_trip_completed(raw: &str, now: i64) -> bool {
    TripDates::local().is_trip_completed(raw, now)
}

/// Whether the trip described by `raw` started before `now` (epoch ms).
///
/// A bare year has no anchor, so it never counts as started.
///
/// ```
/// use chrono::{Local, TimeZone};
///
/// let day_before = Local.with_ymd_and_hms(2026, 1, 3, 12, 0, 0).unwrap().timestamp_millis();
/// let day_of = Local.with_ymd_and_hms(2026, 1, 4, 12, 0, 0).unwrap().timestamp_millis();
/// assert!(!trip_dates::has_trip_started("Jan 04, 2026 - May 27, 2026", day_before));
/// assert!(trip_dates::has_trip_started("Jan 04, 2026 - May 27, 2026", day_of));
/// assert!(!trip_dates::has_trip_started("2026", day_of));
/// ```
pub fn has_trip_started(raw: &str, now: i64) -> bool {
    TripDates::local().has_trip_started(raw, now)
}

/// Upcoming / ongoing / completed for `raw` at `now` (epoch ms).
///
/// ```
/// use chrono::{Local, TimeZone};
/// use trip_dates::{trip_lifecycle, Lifecycle};
///
/// let now = Local.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap().timestamp_millis();
/// assert_eq!(trip_lifecycle("Jan 04, 2026 - May 27, 2026", now), Lifecycle::Ongoing);
/// assert_eq!(trip_lifecycle("Jan 1, 2006", now), Lifecycle::Completed);
/// assert_eq!(trip_lifecycle("Summer 2026", now), Lifecycle::Upcoming);
/// assert_eq!(trip_lifecycle("", now), Lifecycle::Upcoming);
/// ```
pub fn trip_lifecycle(raw: &str, now: i64) -> Lifecycle {
    TripDates::local().lifecycle(raw, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use chrono_tz::Tz;

    fn ny_millis(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> i64 {
        let naive = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(h, min, s, ms)
            .unwrap();
        chrono_tz::America::New_York
            .from_local_datetime(&naive)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn trips_at(now: i64) -> TripDates<Tz, FixedClock> {
        TripDates::new(chrono_tz::America::New_York, FixedClock(now))
    }

    #[test]
    fn test_empty_is_never_started_or_completed() {
        for now in [1, ny_millis(2026, 6, 1, 0, 0, 0, 0), i64::MAX] {
            let t = trips_at(now);
            assert!(!t.is_trip_completed("", now));
            assert!(!t.has_trip_started("", now));
        }
    }

    #[test]
    fn test_year_only_completion_edge() {
        let edge = ny_millis(2025, 12, 31, 23, 59, 59, 0);
        let t = trips_at(edge);
        assert!(!t.is_trip_completed("2025", edge));
        assert!(t.is_trip_completed("2025", edge + 1));
        assert!(!t.has_trip_started("2025", edge + 1));
    }

    #[test]
    fn test_range_completion_edge() {
        let raw = "Jan 04, 2026 - May 27, 2026";
        let end = ny_millis(2026, 5, 27, 23, 59, 59, 999);
        let t = trips_at(end);
        assert!(!t.is_trip_completed(raw, end));
        assert!(t.is_trip_completed(raw, end + 1));
        assert_eq!(t.lifecycle(raw, end), Lifecycle::Ongoing);
        assert_eq!(
            t.lifecycle(raw, ny_millis(2026, 1, 3, 12, 0, 0, 0)),
            Lifecycle::Upcoming
        );
    }

    #[test]
    fn test_past_single_date_is_completed() {
        let now = ny_millis(2026, 10, 18, 9, 0, 0, 0);
        let t = trips_at(now);
        assert!(t.is_trip_completed_now("Jan 1, 2006"));
        assert!(t.has_trip_started_now("Jan 1, 2006"));
    }

    #[test]
    fn test_end_day_past_month_end_still_completes() {
        let raw = "Apr 20, 2026 - Apr 31, 2026";
        let end = ny_millis(2026, 5, 1, 23, 59, 59, 999);
        let t = trips_at(end);
        assert!(!t.is_trip_completed(raw, end));
        assert!(t.is_trip_completed(raw, end + 1));
        assert!(t.is_trip_completed(raw, 4_000_000_000_000));
    }

    #[test]
    fn test_default_year_follows_now() {
        let raw = "Oct 12 - Oct 27";
        let in_2025 = trips_at(ny_millis(2025, 6, 1, 0, 0, 0, 0));
        let in_2026 = trips_at(ny_millis(2026, 6, 1, 0, 0, 0, 0));
        assert_eq!(in_2025.parse_anchor(raw), ny_millis(2025, 10, 12, 0, 0, 0, 0));
        assert_eq!(in_2026.parse_anchor(raw), ny_millis(2026, 10, 12, 0, 0, 0, 0));
    }

    #[test]
    fn test_timeline_uses_one_now() {
        let now = ny_millis(2026, 10, 20, 0, 0, 0, 0);
        let t = trips_at(now).timeline_now("Oct 12 - Oct 27");
        assert_eq!(t.now, now);
        assert_eq!(t.lifecycle, Lifecycle::Ongoing);
    }

    #[test]
    fn test_season_lifecycle() {
        let t = trips_at(0);
        let spring = ny_millis(2025, 3, 20, 0, 0, 0, 0);
        assert_eq!(t.lifecycle("Spring 2025", spring), Lifecycle::Upcoming);
        // Anchor and boundary coincide, so the trip is never "ongoing".
        assert_eq!(t.lifecycle("Spring 2025", spring + 1), Lifecycle::Completed);
    }

    #[test]
    fn test_sort_by_anchor() {
        let t = trips_at(ny_millis(2026, 1, 1, 0, 0, 0, 0));
        let mut trips = vec![
            ("paris", "Jun 3, 2026"),
            ("someday", "TBD"),
            ("ski", "Winter 2025"),
            ("road", "2026"),
            ("beach", "Jan 04, 2026 - Jan 10, 2026"),
        ];
        t.sort_by_anchor(&mut trips, |(_, raw)| *raw);
        let names: Vec<_> = trips.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["ski", "beach", "paris", "someday", "road"]);
    }
}
