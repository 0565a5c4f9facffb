//! Classification of raw trip date strings into expression shapes.
//!
//! Every string maps to exactly one [`DateExpression`]. Matching is ordered
//! and the first rule that applies wins:
//!
//! 1. a season keyword anywhere in the text (`"Spring 2025"`)
//! 2. a bare four-digit year (`"2025"`)
//! 3. a hyphen, split on the first one (`"Oct 12 - Oct 27"`)
//! 4. anything else, kept whole (`"Jan 1, 2006"`)
//!
//! Keyword matching is plain substring containment, so `"Springfield 2025"`
//! is a spring trip and `"2025-10-12"` is a range of `"2025"` to `"10-12"`.
//! Both follow from the matching rules and are kept as is.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// A season keyword, anchored to a fixed calendar date in any year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    /// Also matched by "autumn".
    Fall,
    Winter,
}

impl Season {
    /// Find a season keyword in already lower-cased text.
    ///
    /// Checked in calendar order, so `"spring/summer"` is spring.
    pub fn detect(lowered: &str) -> Option<Season> {
        if lowered.contains("spring") {
            Some(Season::Spring)
        } else if lowered.contains("summer") {
            Some(Season::Summer)
        } else if lowered.contains("fall") || lowered.contains("autumn") {
            Some(Season::Fall)
        } else if lowered.contains("winter") {
            Some(Season::Winter)
        } else {
            None
        }
    }

    /// The canonical (month, day) the season starts on.
    pub fn month_day(self) -> (u32, u32) {
        match self {
            Season::Spring => (3, 20),
            Season::Summer => (6, 21),
            Season::Fall => (9, 22),
            Season::Winter => (12, 21),
        }
    }
}

/// The shape of a raw trip date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateExpression {
    /// `"Summer 2025"`: the season's canonical date in `year`.
    Season { year: i32, season: Season },
    /// `"2025"`: the whole calendar year.
    YearOnly { year: i32 },
    /// `"Oct 12 - Oct 27"`: free text on each side of the first hyphen.
    Range {
        start_raw: String,
        end_raw: String,
        year_hint: i32,
    },
    /// Anything else, including the empty string.
    Single { raw: String, year_hint: i32 },
}

impl DateExpression {
    /// Short name of the variant, for logs and text output.
    pub fn kind(&self) -> &'static str {
        match self {
            DateExpression::Season { .. } => "season",
            DateExpression::YearOnly { .. } => "year_only",
            DateExpression::Range { .. } => "range",
            DateExpression::Single { .. } => "single",
        }
    }
}

pub(crate) fn four_digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{4}").expect("four-digit pattern compiles"))
}

fn bare_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("bare-year pattern compiles"))
}

/// The first run of four digits in `raw`, or `reference_year` when there is none.
///
/// Longer digit runs count too: `"12345"` yields `1234`.
pub fn year_hint(raw: &str, reference_year: i32) -> i32 {
    four_digit_run()
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(reference_year)
}

/// Classify `raw` into a [`DateExpression`].
///
/// `reference_year` is the calendar year of the caller's "now"; it only
/// matters when the text carries no four-digit year of its own. Never fails.
///
/// # Examples
///
/// ```
/// use trip_dates::expression::{parse_expression, DateExpression, Season};
///
/// assert_eq!(
///     parse_expression("Spring 2025", 2030),
///     DateExpression::Season { year: 2025, season: Season::Spring }
/// );
/// assert_eq!(parse_expression(" 2024 ", 2030), DateExpression::YearOnly { year: 2024 });
/// ```
pub fn parse_expression(raw: &str, reference_year: i32) -> DateExpression {
    let lowered = raw.to_lowercase();
    let hint = year_hint(raw, reference_year);

    if let Some(season) = Season::detect(&lowered) {
        return DateExpression::Season { year: hint, season };
    }

    let trimmed = raw.trim();
    if bare_year().is_match(trimmed) {
        if let Ok(year) = trimmed.parse() {
            return DateExpression::YearOnly { year };
        }
    }

    if let Some((start, end)) = raw.split_once('-') {
        return DateExpression::Range {
            start_raw: start.trim().to_string(),
            end_raw: end.trim().to_string(),
            year_hint: hint,
        };
    }

    DateExpression::Single {
        raw: raw.to_string(),
        year_hint: hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── year_hint ───────────────────────────────────────────────────────

    #[test]
    fn test_year_hint_first_run_wins() {
        assert_eq!(year_hint("Dec 2024 - Jan 2025", 1999), 2024);
    }

    #[test]
    fn test_year_hint_falls_back_to_reference() {
        assert_eq!(year_hint("Oct 12 - Oct 27", 2026), 2026);
        assert_eq!(year_hint("", 2026), 2026);
    }

    #[test]
    fn test_year_hint_takes_prefix_of_longer_run() {
        assert_eq!(year_hint("ref 123456", 2026), 1234);
    }

    #[test]
    fn test_year_hint_ignores_short_runs() {
        assert_eq!(year_hint("10/12/25", 2026), 2026);
    }

    // ── seasons ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_season_with_year() {
        assert_eq!(
            parse_expression("Summer 2025", 2030),
            DateExpression::Season {
                year: 2025,
                season: Season::Summer
            }
        );
    }

    #[test]
    fn test_parse_season_case_insensitive() {
        assert_eq!(
            parse_expression("WINTER break", 2026),
            DateExpression::Season {
                year: 2026,
                season: Season::Winter
            }
        );
    }

    #[test]
    fn test_parse_autumn_is_fall() {
        assert_eq!(
            parse_expression("Autumn 2024", 2030),
            DateExpression::Season {
                year: 2024,
                season: Season::Fall
            }
        );
    }

    #[test]
    fn test_parse_season_substring_match() {
        // Keyword containment, not word matching.
        assert_eq!(
            parse_expression("Springfield 2025", 2030),
            DateExpression::Season {
                year: 2025,
                season: Season::Spring
            }
        );
    }

    #[test]
    fn test_parse_season_beats_range() {
        assert_eq!(
            parse_expression("Fall 2025 - Winter 2026", 2030),
            DateExpression::Season {
                year: 2025,
                season: Season::Fall
            }
        );
    }

    #[test]
    fn test_season_month_days() {
        assert_eq!(Season::Spring.month_day(), (3, 20));
        assert_eq!(Season::Summer.month_day(), (6, 21));
        assert_eq!(Season::Fall.month_day(), (9, 22));
        assert_eq!(Season::Winter.month_day(), (12, 21));
    }

    // ── year only ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_year_only_trimmed() {
        assert_eq!(
            parse_expression("  2025\n", 2030),
            DateExpression::YearOnly { year: 2025 }
        );
    }

    #[test]
    fn test_parse_five_digits_is_not_year_only() {
        assert_eq!(
            parse_expression("20250", 2030),
            DateExpression::Single {
                raw: "20250".to_string(),
                year_hint: 2025
            }
        );
    }

    // ── ranges ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_range_splits_and_trims() {
        assert_eq!(
            parse_expression("Jan 04, 2026 - May 27, 2026", 2030),
            DateExpression::Range {
                start_raw: "Jan 04, 2026".to_string(),
                end_raw: "May 27, 2026".to_string(),
                year_hint: 2026
            }
        );
    }

    #[test]
    fn test_parse_range_without_year_uses_reference() {
        assert_eq!(
            parse_expression("Oct 12 - Oct 27", 2026),
            DateExpression::Range {
                start_raw: "Oct 12".to_string(),
                end_raw: "Oct 27".to_string(),
                year_hint: 2026
            }
        );
    }

    #[test]
    fn test_parse_iso_date_splits_on_first_hyphen() {
        assert_eq!(
            parse_expression("2025-10-12", 2030),
            DateExpression::Range {
                start_raw: "2025".to_string(),
                end_raw: "10-12".to_string(),
                year_hint: 2025
            }
        );
    }

    #[test]
    fn test_parse_lone_hyphen() {
        assert_eq!(
            parse_expression("-", 2026),
            DateExpression::Range {
                start_raw: String::new(),
                end_raw: String::new(),
                year_hint: 2026
            }
        );
    }

    // ── single ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_single_keeps_raw_text() {
        assert_eq!(
            parse_expression("Jan 1, 2006", 2030),
            DateExpression::Single {
                raw: "Jan 1, 2006".to_string(),
                year_hint: 2006
            }
        );
    }

    #[test]
    fn test_parse_empty_is_single() {
        assert_eq!(
            parse_expression("", 2026),
            DateExpression::Single {
                raw: String::new(),
                year_hint: 2026
            }
        );
    }

    #[test]
    fn test_expression_serializes_with_kind_tag() {
        let json = serde_json::to_value(parse_expression("Fall 2025", 2030)).unwrap();
        assert_eq!(json["kind"], "season");
        assert_eq!(json["season"], "fall");
        assert_eq!(json["year"], 2025);
    }
}
