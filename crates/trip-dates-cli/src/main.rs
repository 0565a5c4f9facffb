//! `trip-dates`: show how free-text trip dates are read.
//!
//! ```text
//! trip-dates parse "Spring 2025" "Oct 12 - Oct 27"
//! trip-dates status --now 2026-06-01T00:00:00Z --tz Europe/Berlin "2025"
//! cat trips.txt | trip-dates sort --format text
//! ```

mod logging;
mod report;

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, TimeZone};
use clap::{Parser, Subcommand};
use trip_dates::{Clock, FixedClock, SystemClock, TripDates};

use report::{Format, Report};

#[derive(Debug, Parser)]
#[command(name = "trip-dates", version, about = "Resolve and classify free-text trip dates")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// IANA time zone for wall-clock dates (default: the local zone)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Reference instant as RFC 3339 (default: the system clock)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the expression, anchor and completion boundary of each date
    Parse {
        /// Raw date strings; read one per line from stdin when omitted
        inputs: Vec<String>,
    },
    /// Show whether each trip has started or completed
    Status { inputs: Vec<String> },
    /// Print the dates ordered by anchor, undated last
    Sort { inputs: Vec<String> },
}

impl Command {
    fn inputs(&self) -> &[String] {
        match self {
            Command::Parse { inputs } | Command::Status { inputs } | Command::Sort { inputs } => {
                inputs
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let now = match &cli.now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --now '{raw}', expected RFC 3339"))?
            .timestamp_millis(),
        None => SystemClock.now_millis(),
    };

    let mut inputs = cli.command.inputs().to_vec();
    if inputs.is_empty() {
        inputs = read_stdin_lines()?;
    }
    tracing::debug!(count = inputs.len(), now, "resolving trip dates");

    match &cli.tz {
        Some(name) => {
            let tz: chrono_tz::Tz = name
                .parse()
                .map_err(|_| anyhow!("unknown time zone '{name}'"))?;
            run(&cli.command, &inputs, TripDates::new(tz, FixedClock(now)), cli.format)
        }
        None => run(&cli.command, &inputs, TripDates::new(Local, FixedClock(now)), cli.format),
    }
}

fn run<Tz>(
    command: &Command,
    inputs: &[String],
    trips: TripDates<Tz, FixedClock>,
    format: Format,
) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = trips.resolver().timezone().clone();
    let now = trips.now();

    let mut out = io::stdout().lock();
    match command {
        Command::Parse { .. } | Command::Status { .. } => {
            let with_status = matches!(command, Command::Status { .. });
            let reports: Vec<Report> = inputs
                .iter()
                .map(|raw| {
                    let report = Report::new(trips.resolve_at(raw, now), &tz);
                    if with_status {
                        report.with_timeline(&trips.timeline(raw, now), &tz)
                    } else {
                        report
                    }
                })
                .collect();
            match format {
                Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?,
                Format::Text => {
                    for report in &reports {
                        writeln!(out, "{}", report.text_line())?;
                    }
                }
            }
        }
        Command::Sort { .. } => {
            let mut sorted = inputs.to_vec();
            trips.sort_by_anchor(&mut sorted, |raw| raw.as_str());
            match format {
                Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&sorted)?)?,
                Format::Text => {
                    for raw in &sorted {
                        writeln!(out, "{raw}")?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn read_stdin_lines() -> Result<Vec<String>> {
    io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read dates from stdin")
}
