//! Rendering of resolved trips for the terminal.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use trip_dates::{Lifecycle, ResolvedTrip, TripTimeline, UNRESOLVED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Json,
    Text,
}

#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub trip: ResolvedTrip,
    pub anchor_local: Option<String>,
    pub completion_boundary_local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub now: Option<String>,
    pub has_started: bool,
    pub is_completed: bool,
    pub lifecycle: Lifecycle,
}

impl Report {
    pub fn new<Tz>(trip: ResolvedTrip, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Report {
            anchor_local: format_instant(trip.anchor, tz),
            completion_boundary_local: format_instant(trip.completion_boundary, tz),
            trip,
            status: None,
        }
    }

    pub fn with_timeline<Tz>(mut self, timeline: &TripTimeline, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.status = Some(Status {
            now: format_instant(timeline.now, tz),
            has_started: timeline.has_started,
            is_completed: timeline.is_completed,
            lifecycle: timeline.lifecycle,
        });
        self
    }

    /// One tab-separated line: raw, kind, anchor, boundary[, lifecycle].
    pub fn text_line(&self) -> String {
        let mut cols = vec![
            self.trip.raw.clone(),
            self.trip.expression.kind().to_string(),
            self.anchor_local.clone().unwrap_or_else(|| "-".to_string()),
            self.completion_boundary_local
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ];
        if let Some(status) = &self.status {
            cols.push(status.lifecycle.to_string());
        }
        cols.join("\t")
    }
}

/// RFC 3339 in `tz`, or `None` for the unresolved sentinel.
pub fn format_instant<Tz>(millis: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if millis == UNRESOLVED {
        return None;
    }
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(tz).to_rfc3339())
}
