//! Timestamp utilities
//!
//! Wall-clock helpers shared by the `%d` directive and the file appender's
//! day-rollover check.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

/// Default sub-pattern of the `%d` directive.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_PER_DAY: i64 = 86_400;

static START: OnceLock<Instant> = OnceLock::new();

/// Timezone used when rendering `%d`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timezone {
    /// Local time of the host
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
}

/// Source of the current wall-clock time, in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// [`Clock`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        unix_now()
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Milliseconds elapsed since the library clock started.
///
/// The clock starts the first time this is called (the registry touches it
/// on construction).
pub fn elapsed_ms() -> u64 {
    let start = START.get_or_init(Instant::now);
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// UTC day number of a unix timestamp.
pub fn utc_day(unix_secs: i64) -> i64 {
    unix_secs.div_euclid(SECONDS_PER_DAY)
}

/// Returns `true` if `format` is a strftime pattern chrono can render.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render `unix_secs` with a strftime pattern.
///
/// `format` must have passed [`is_valid_format`]; out-of-range timestamps
/// render as nothing.
pub fn write_unix<W: fmt::Write>(
    out: &mut W,
    unix_secs: i64,
    format: &str,
    timezone: Timezone,
) -> fmt::Result {
    match timezone {
        Timezone::Local => match Local.timestamp_opt(unix_secs, 0).earliest() {
            Some(datetime) => write_datetime(out, &datetime, format),
            None => Ok(()),
        },
        Timezone::Utc => match Utc.timestamp_opt(unix_secs, 0).single() {
            Some(datetime) => write_datetime(out, &datetime, format),
            None => Ok(()),
        },
    }
}

fn write_datetime<W, Tz>(out: &mut W, datetime: &DateTime<Tz>, format: &str) -> fmt::Result
where
    W: fmt::Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    write!(out, "{}", datetime.format(format))
}
