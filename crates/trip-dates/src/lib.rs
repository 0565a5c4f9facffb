//! # trip-dates
//!
//! Free-text trip date resolution and lifecycle classification.
//!
//! Trip dates are typed by people: `"Spring 2025"`, `"Oct 12 - Oct 27"`,
//! `"2025"`, `"Jan 04, 2026 - May 27, 2026"`. This crate turns such a string
//! into a sortable anchor instant and an end-of-trip boundary, then answers
//! "has it started?" and "has it ended?" against a caller-supplied `now`.
//!
//! Nothing here fails. Input that cannot be read resolves to the sentinel
//! `0`, and a `0` instant never satisfies "started" or "completed".
//!
//! ## Modules
//!
//! - [`expression`]: raw string → [`DateExpression`] (season, year, range, single)
//! - [`datetext`]: grammar for one human-written calendar date
//! - [`resolve`]: expression → anchor and completion boundary (epoch ms)
//! - [`lifecycle`]: anchor/boundary + now → started, completed, [`Lifecycle`]
//! - [`clock`]: injectable reference clock
//! - [`trips`]: one-call operations over raw strings, and [`TripDates`]
//! - [`error`]: Error types

pub mod clock;
pub mod datetext;
pub mod error;
pub mod expression;
pub mod lifecycle;
pub mod resolve;
pub mod trips;

pub use clock::{reference_year, Clock, FixedClock, SystemClock};
pub use error::DateTextError;
pub use expression::{parse_expression, DateExpression, Season};
pub use lifecycle::{classify, Lifecycle, TripTimeline};
pub use resolve::{DateResolver, ResolvedTrip, UNRESOLVED};
pub use trips::{
    has_trip_started, is_trip_completed, parse_anchor, trip_lifecycle, TripDates,
};
