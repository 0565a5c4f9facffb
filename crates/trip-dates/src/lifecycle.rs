//! Started / completed verdicts for a resolved trip.
//!
//! Pure comparisons against a caller-supplied `now`. An unresolved instant
//! never satisfies a predicate, so a trip whose dates cannot be read stays
//! upcoming (or ongoing) forever and is never reported as completed.

use std::fmt;

use serde::Serialize;

use crate::resolve::UNRESOLVED;

/// Presentation bucket derived from the two predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Upcoming,
    Ongoing,
    Completed,
}

impl Lifecycle {
    /// Completed wins regardless of `has_started`.
    pub fn from_flags(has_started: bool, is_completed: bool) -> Self {
        match (has_started, is_completed) {
            (_, true) => Lifecycle::Completed,
            (true, false) => Lifecycle::Ongoing,
            (false, false) => Lifecycle::Upcoming,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Upcoming => "upcoming",
            Lifecycle::Ongoing => "ongoing",
            Lifecycle::Completed => "completed",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trip's instants together with the verdicts computed from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripTimeline {
    pub anchor: i64,
    pub completion_boundary: i64,
    /// The `now` the verdicts were computed against.
    pub now: i64,
    pub has_started: bool,
    pub is_completed: bool,
    pub lifecycle: Lifecycle,
}

pub fn has_started(anchor: i64, now: i64) -> bool {
    anchor != UNRESOLVED && anchor < now
}

pub fn is_completed(completion_boundary: i64, now: i64) -> bool {
    completion_boundary != UNRESOLVED && completion_boundary < now
}

/// Compute both verdicts against the same `now`.
pub fn classify(anchor: i64, completion_boundary: i64, now: i64) -> TripTimeline {
    let started = has_started(anchor, now);
    let completed = is_completed(completion_boundary, now);
    TripTimeline {
        anchor,
        completion_boundary,
        now,
        has_started: started,
        is_completed: completed,
        lifecycle: Lifecycle::from_flags(started, completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_000_000;
    const END: i64 = 2_000_000;

    #[test]
    fn test_before_start_is_upcoming() {
        let t = classify(START, END, START - 1);
        assert!(!t.has_started);
        assert!(!t.is_completed);
        assert_eq!(t.lifecycle, Lifecycle::Upcoming);
    }

    #[test]
    fn test_comparisons_are_strict() {
        let at_start = classify(START, END, START);
        assert!(!at_start.has_started);
        let at_end = classify(START, END, END);
        assert!(!at_end.is_completed);
        assert_eq!(at_end.lifecycle, Lifecycle::Ongoing);
    }

    #[test]
    fn test_between_is_ongoing() {
        assert_eq!(classify(START, END, START + 1).lifecycle, Lifecycle::Ongoing);
    }

    #[test]
    fn test_after_end_is_completed() {
        let t = classify(START, END, END + 1);
        assert!(t.has_started);
        assert!(t.is_completed);
        assert_eq!(t.lifecycle, Lifecycle::Completed);
    }

    #[test]
    fn test_completed_without_anchor() {
        // Bare years resolve a boundary but no anchor.
        let t = classify(UNRESOLVED, END, END + 1);
        assert!(!t.has_started);
        assert!(t.is_completed);
        assert_eq!(t.lifecycle, Lifecycle::Completed);
    }

    #[test]
    fn test_unresolved_never_completes() {
        let t = classify(START, UNRESOLVED, i64::MAX);
        assert!(t.has_started);
        assert!(!t.is_completed);
        assert_eq!(t.lifecycle, Lifecycle::Ongoing);

        let t = classify(UNRESOLVED, UNRESOLVED, i64::MAX);
        assert_eq!(t.lifecycle, Lifecycle::Upcoming);
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(Lifecycle::Completed.to_string(), "completed");
        assert_eq!(
            serde_json::to_value(Lifecycle::Ongoing).unwrap(),
            serde_json::json!("ongoing")
        );
    }
}
