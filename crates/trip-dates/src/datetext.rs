//! Grammar for a single human-written calendar date.
//!
//! Accepts the shapes people actually type into a trip form:
//!
//! - RFC 3339 instants: `2026-01-04T05:00:00.000Z`, `2026-01-04T10:00:00+02:00`
//! - ISO dates and local date-times: `2026-01-04`, `2026-01-04T10:30:00`, `2026/01/04`
//! - US numeric dates: `1/4/2026`
//! - Month names, either order: `Jan 04, 2026`, `12 Oct 2025`, `March 3rd, 2025`,
//!   `Sat, Jan 4 2026`, `October 2025` (first of the month)
//! - An optional time after any of the above: `10:30`, `7:15 pm`, `9am`,
//!   optionally followed by `Z`, `UTC` or `GMT`
//!
//! Words before the first number are skipped (`"early Oct 2025"`). Days past
//! the end of the month roll into the next one, so `"Feb 30, 2026"` is
//! March 2nd and `"Apr 31"` is May 1st. A date
//! must name a month and carry a four-digit year; anything missing is an
//! error rather than a guess; the resolver decides what to retry.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{DateTextError, Result};
use crate::expression::four_digit_run;

/// A successfully parsed date fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// Wall-clock date-time, to be placed in the caller's time zone.
    Local(NaiveDateTime),
    /// An exact instant; the text carried its own offset.
    Instant(DateTime<FixedOffset>),
}

impl ParsedDate {
    /// Pin the parsed value to an instant in `tz`.
    ///
    /// Local times inside a DST gap move forward an hour; ambiguous local
    /// times take the earlier of the two instants.
    pub fn in_zone<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        match self {
            ParsedDate::Instant(dt) => Some(dt.with_timezone(tz)),
            ParsedDate::Local(naive) => local_to_zone(naive, tz),
        }
    }
}

/// Place a wall-clock time in `tz`, shifting out of DST gaps.
pub(crate) fn local_to_zone<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(naive).earliest().or_else(|| {
        let shifted = naive.checked_add_signed(chrono::Duration::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

/// Whether `text` contains a run of four digits anywhere.
pub fn contains_four_digit_year(text: &str) -> bool {
    four_digit_run().is_match(text)
}

/// Parse one date fragment.
///
/// # Errors
///
/// Returns [`DateTextError::MissingYear`] for otherwise valid dates without a
/// four-digit year (`"Oct 12"`), [`DateTextError::MissingMonth`] when no month
/// can be identified, and the other variants for malformed text.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use trip_dates::datetext::{parse_date_text, ParsedDate};
///
/// let parsed = parse_date_text("Jan 04, 2026").unwrap();
/// let expected = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// assert_eq!(parsed, ParsedDate::Local(expected));
/// ```
pub fn parse_date_text(text: &str) -> Result<ParsedDate> {
    let s = text.trim();
    if s.is_empty() {
        return Err(DateTextError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedDate::Instant(dt));
    }
    if let Some(naive) = parse_numeric_layout(s) {
        return Ok(ParsedDate::Local(naive));
    }

    parse_loose(s)
}

// ── Fixed numeric layouts ───────────────────────────────────────────────────

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn parse_numeric_layout(s: &str) -> Option<NaiveDateTime> {
    // Both orders need a full year; chrono would otherwise accept "1/4/26" as year 26.
    if !contains_four_digit_year(s) {
        return None;
    }
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

// ── Loose token grammar ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number { value: u32, digits: usize },
    Word(String),
    Punct(char),
}

fn tokenize(s: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            let mut buf = String::new();
            while let Some(&d) = chars.peek().filter(|c| c.is_ascii_digit()) {
                buf.push(d);
                chars.next();
            }
            let value = buf
                .parse()
                .map_err(|_| DateTextError::InvalidDate(format!("number too long: '{buf}'")))?;
            tokens.push(Token::Number {
                value,
                digits: buf.len(),
            });
        } else if ch.is_alphabetic() {
            let mut buf = String::new();
            while let Some(&c) = chars.peek().filter(|c| c.is_alphabetic()) {
                buf.extend(c.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(buf));
        } else if ch.is_whitespace() {
            chars.next();
        } else {
            tokens.push(Token::Punct(ch));
            chars.next();
        }
    }

    Ok(tokens)
}

/// Fields collected while walking the token stream.
#[derive(Debug, Default)]
struct Fields {
    month: Option<u32>,
    numbers: Vec<(u32, usize)>,
    time: Option<(u32, u32, u32, u32)>, // hour, minute, second, nanos
    pm: Option<bool>,
    utc: bool,
}

fn parse_loose(s: &str) -> Result<ParsedDate> {
    let tokens = tokenize(s)?;
    let mut fields = Fields::default();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Number { value, digits } => {
                match tokens.get(i + 1) {
                    Some(Token::Punct(':')) => {
                        i = read_clock(&tokens, i, &mut fields)?;
                        continue;
                    }
                    Some(Token::Word(w)) if parse_meridiem(w).is_some() => {
                        set_time(&mut fields, (*value, 0, 0, 0), s)?;
                    }
                    Some(Token::Word(w)) if is_ordinal_suffix(w) => {
                        fields.numbers.push((*value, *digits));
                        i += 1;
                    }
                    _ => fields.numbers.push((*value, *digits)),
                }
            }
            Token::Word(w) => {
                if let Some(month) = parse_month(w) {
                    if fields.month.replace(month).is_some() {
                        return Err(DateTextError::TrailingInput(s.to_string()));
                    }
                } else if let Some(pm) = parse_meridiem(w) {
                    fields.pm = Some(pm);
                } else if matches!(w.as_str(), "z" | "utc" | "gmt") {
                    fields.utc = true;
                } else if is_weekday(w) || matches!(w.as_str(), "at" | "of" | "the") {
                    // filler
                } else if fields.numbers.is_empty() && fields.time.is_none() {
                    // leading noise such as "early" or "mid"
                } else {
                    return Err(DateTextError::UnknownWord(w.clone()));
                }
            }
            Token::Punct(',' | '.' | '/' | '-') => {}
            Token::Punct('(') => {
                // Parenthesized comments are skipped entirely.
                while i < tokens.len() && tokens[i] != Token::Punct(')') {
                    i += 1;
                }
            }
            Token::Punct(other) => {
                return Err(DateTextError::UnknownWord(other.to_string()));
            }
        }
        i += 1;
    }

    assemble(s, fields)
}

/// Consume `H:MM[:SS[.fff]]` starting at `start`; returns the index after it.
fn read_clock(tokens: &[Token], start: usize, fields: &mut Fields) -> Result<usize> {
    let number_at = |idx: usize| match tokens.get(idx) {
        Some(Token::Number { value, digits }) => Some((*value, *digits)),
        _ => None,
    };
    let bad = || DateTextError::InvalidTime(format!("{:?}", &tokens[start..]));

    let (hour, _) = number_at(start).ok_or_else(bad)?;
    let (minute, minute_digits) = number_at(start + 2).ok_or_else(bad)?;
    if minute_digits != 2 {
        return Err(bad());
    }
    let mut next = start + 3;

    let mut second = 0;
    if tokens.get(next) == Some(&Token::Punct(':')) {
        let (s, digits) = number_at(next + 1).ok_or_else(bad)?;
        if digits != 2 {
            return Err(bad());
        }
        second = s;
        next += 2;
    }

    let mut nanos = 0;
    if tokens.get(next) == Some(&Token::Punct('.')) {
        if let Some((frac, digits)) = number_at(next + 1) {
            if digits <= 9 {
                nanos = frac * 10u32.pow(9 - digits as u32);
                next += 2;
            }
        }
    }

    if fields.time.is_some() {
        return Err(bad());
    }
    fields.time = Some((hour, minute, second, nanos));
    Ok(next)
}

fn set_time(fields: &mut Fields, time: (u32, u32, u32, u32), s: &str) -> Result<()> {
    if fields.time.replace(time).is_some() {
        return Err(DateTextError::InvalidTime(s.to_string()));
    }
    Ok(())
}

fn assemble(s: &str, fields: Fields) -> Result<ParsedDate> {
    let mut year = None;
    let mut rest = Vec::new();
    for &(value, digits) in &fields.numbers {
        match digits {
            4 if year.is_none() => year = Some(value as i32),
            1 | 2 => rest.push(value),
            _ => return Err(DateTextError::TrailingInput(s.to_string())),
        }
    }

    let (month, day) = match (fields.month, rest.as_slice()) {
        (Some(m), []) => (m, 1),
        (Some(m), [d]) => (m, *d),
        (None, [m, d]) => (*m, *d),
        (None, _) => return Err(DateTextError::MissingMonth(s.to_string())),
        (Some(_), _) => return Err(DateTextError::TrailingInput(s.to_string())),
    };

    let year = year.ok_or_else(|| DateTextError::MissingYear(s.to_string()))?;
    let date = calendar_date(year, month, day)
        .ok_or_else(|| DateTextError::InvalidDate(s.to_string()))?;

    let time = match fields.time {
        Some((hour, minute, second, nanos)) => {
            let hour = apply_meridiem(hour, fields.pm)
                .ok_or_else(|| DateTextError::InvalidTime(s.to_string()))?;
            NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
                .ok_or_else(|| DateTextError::InvalidTime(s.to_string()))?
        }
        None if fields.pm.is_some() => return Err(DateTextError::InvalidTime(s.to_string())),
        None => NaiveTime::MIN,
    };

    let naive = date.and_time(time);
    if fields.utc {
        Ok(ParsedDate::Instant(Utc.from_utc_datetime(&naive).fixed_offset()))
    } else {
        Ok(ParsedDate::Local(naive))
    }
}

/// Day 1..=31 in any month; overflow rolls forward into the next month.
fn calendar_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
}

// ── Word tables ─────────────────────────────────────────────────────────────

fn apply_meridiem(hour: u32, pm: Option<bool>) -> Option<u32> {
    match pm {
        None if hour <= 23 => Some(hour),
        None => None,
        Some(_) if hour == 0 || hour > 12 => None,
        Some(true) if hour == 12 => Some(12),
        Some(false) if hour == 12 => Some(0),
        Some(true) => Some(hour + 12),
        Some(false) => Some(hour),
    }
}

fn parse_meridiem(s: &str) -> Option<bool> {
    match s {
        "am" => Some(false),
        "pm" => Some(true),
        _ => None,
    }
}

fn is_ordinal_suffix(s: &str) -> bool {
    matches!(s, "st" | "nd" | "rd" | "th")
}

/// Parse a month name to number (1-12), full or abbreviated.
fn parse_month(s: &str) -> Option<u32> {
    match s {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

fn is_weekday(s: &str) -> bool {
    matches!(
        s,
        "monday"
            | "mon"
            | "tuesday"
            | "tue"
            | "tues"
            | "wednesday"
            | "wed"
            | "thursday"
            | "thu"
            | "thurs"
            | "friday"
            | "fri"
            | "saturday"
            | "sat"
            | "sunday"
            | "sun"
    )
}
