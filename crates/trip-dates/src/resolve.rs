//! Turn a [`DateExpression`] into epoch-millisecond instants.
//!
//! Two instants come out of every expression:
//!
//! - the **anchor**, biased toward the start of the trip, used for sorting
//!   and "has started";
//! - the **completion boundary**, biased toward the end, used for "has ended".
//!
//! Both are plain `i64` epoch milliseconds with [`UNRESOLVED`] (`0`) meaning
//! "could not tell". Instants before the Unix epoch also come back as
//! [`UNRESOLVED`], so a resolved value is always positive.
//!
//! | Expression  | Anchor                      | Completion boundary              |
//! |-------------|-----------------------------|----------------------------------|
//! | `Season`    | canonical date, 00:00       | same as anchor                   |
//! | `YearOnly`  | unresolved                  | Dec 31, 23:59:59                 |
//! | `Range`     | start text                  | end text, 23:59:59.999 that day  |
//! | `Single`    | the text                    | the text, 23:59:59.999 that day  |

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use tracing::{debug, trace};

use crate::datetext::{contains_four_digit_year, local_to_zone, parse_date_text};
use crate::expression::{parse_expression, DateExpression, Season};

/// Sentinel for "this date could not be resolved".
pub const UNRESOLVED: i64 = 0;

/// Everything resolved from one raw trip date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTrip {
    /// The input, echoed back.
    pub raw: String,
    pub expression: DateExpression,
    /// Start-biased instant (epoch ms), or 0.
    pub anchor: i64,
    /// End-biased instant (epoch ms), or 0.
    pub completion_boundary: i64,
}

/// Resolves expressions against wall-clock time in one time zone.
#[derive(Debug, Clone)]
pub struct DateResolver<Tz: TimeZone> {
    tz: Tz,
}

impl DateResolver<Local> {
    /// Resolver for the host's local time zone.
    ///
    /// ```
    /// use trip_dates::{DateResolver, UNRESOLVED};
    ///
    /// let resolver = DateResolver::local();
    /// assert!(resolver.resolve("Spring 2025", 2026).anchor > 0);
    /// assert_eq!(DateResolver::default().resolve("2025", 2026).anchor, UNRESOLVED);
    /// ```
    pub fn local() -> Self {
        DateResolver { tz: Local }
    }
}

impl Default for DateResolver<Local> {
    fn default() -> Self {
        DateResolver::local()
    }
}

impl<Tz: TimeZone> DateResolver<Tz> {
    pub fn new(tz: Tz) -> Self {
        DateResolver { tz }
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Classify and resolve `raw` in one step.
    ///
    /// `reference_year` stands in for the year when the text has none.
    pub fn resolve(&self, raw: &str, reference_year: i32) -> ResolvedTrip {
        let expression = parse_expression(raw, reference_year);
        let anchor = self.anchor(&expression);
        let completion_boundary = self.completion_boundary(&expression);
        trace!(
            raw,
            kind = expression.kind(),
            anchor,
            completion_boundary,
            "resolved trip date"
        );
        ResolvedTrip {
            raw: raw.to_string(),
            expression,
            anchor,
            completion_boundary,
        }
    }

    /// The start-biased instant for sorting and "has started" checks.
    ///
    /// A bare year has no anchor and always yields [`UNRESOLVED`].
    pub fn anchor(&self, expr: &DateExpression) -> i64 {
        match expr {
            DateExpression::Season { year, season } => self.season_start(*year, *season),
            DateExpression::YearOnly { .. } => UNRESOLVED,
            DateExpression::Range {
                start_raw,
                year_hint,
                ..
            } => self.resolve_text(start_raw, *year_hint),
            DateExpression::Single { raw, year_hint } => self.resolve_text(raw, *year_hint),
        }
    }

    /// The end-biased instant for "has completed" checks.
    pub fn completion_boundary(&self, expr: &DateExpression) -> i64 {
        match expr {
            DateExpression::Season { year, season } => self.season_start(*year, *season),
            DateExpression::YearOnly { year } => NaiveDate::from_ymd_opt(*year, 12, 31)
                .and_then(|d| d.and_hms_opt(23, 59, 59))
                .map(|naive| self.wall_clock_millis(&naive))
                .unwrap_or(UNRESOLVED),
            DateExpression::Range {
                end_raw, year_hint, ..
            } => self.end_of_day(self.resolve_text(end_raw, *year_hint)),
            DateExpression::Single { raw, year_hint } => {
                self.end_of_day(self.resolve_text(raw, *year_hint))
            }
        }
    }

    /// Resolve one free-text date fragment.
    ///
    /// The fragment is parsed as written first. If that fails, or the text
    /// has no four-digit year of its own, it is parsed again with
    /// `" {year_hint}"` appended and that second result is final. Blank text
    /// is [`UNRESOLVED`] without any parsing.
    pub fn resolve_text(&self, text: &str, year_hint: i32) -> i64 {
        if text.trim().is_empty() {
            return UNRESOLVED;
        }

        let parsed = match parse_date_text(text) {
            Ok(parsed) if contains_four_digit_year(text) => Ok(parsed),
            first => {
                trace!(text, year_hint, first = ?first.err(), "retrying with year hint");
                parse_date_text(&format!("{text} {year_hint}"))
            }
        };

        match parsed {
            Ok(parsed) => parsed
                .in_zone(&self.tz)
                .map(|dt| epoch_millis(&dt))
                .unwrap_or(UNRESOLVED),
            Err(err) => {
                debug!(text, year_hint, error = %err, "unresolved trip date");
                UNRESOLVED
            }
        }
    }

    /// Push `instant` to 23:59:59.999 on its own calendar day in this zone.
    pub fn end_of_day(&self, instant: i64) -> i64 {
        if instant == UNRESOLVED {
            return UNRESOLVED;
        }
        DateTime::from_timestamp_millis(instant)
            .map(|dt| dt.with_timezone(&self.tz).date_naive())
            .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
            .map(|naive| self.wall_clock_millis(&naive))
            .unwrap_or(UNRESOLVED)
    }

    fn season_start(&self, year: i32, season: Season) -> i64 {
        let (month, day) = season.month_day();
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| self.wall_clock_millis(&naive))
            .unwrap_or(UNRESOLVED)
    }

    fn wall_clock_millis(&self, naive: &NaiveDateTime) -> i64 {
        local_to_zone(naive, &self.tz)
            .map(|dt| epoch_millis(&dt))
            .unwrap_or(UNRESOLVED)
    }
}

fn epoch_millis<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    dt.timestamp_millis().max(UNRESOLVED)
}
