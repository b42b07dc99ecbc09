//! Timestamp normalization to epoch milliseconds
//!
//! Telemetry sources disagree on how they write time. This module accepts the
//! conventions seen in practice and converts them to a single `i64` count of
//! milliseconds since the Unix epoch.
//!
//! Resolution order:
//! 1. Bare digit strings of at most 13 characters are Unix timestamps: up to
//!    10 digits are seconds, 11 to 13 digits are milliseconds.
//! 2. A fixed-offset ISO-8601 fast path (`YYYY-MM-DDTHH:MM:SS`, `T` or space
//!    separator, optional `.fff` and `Z`) computed with a simplified leap-year
//!    count. The fast path only accepts years 1970-2099, where that count is
//!    exact, so it never disagrees with step 3.
//! 3. A fallback list of textual formats parsed with chrono, first match wins.
//!
//! Anything else is an error. Decoders turn errors into the sentinel value
//! [`TIMESTAMP_SENTINEL`].

use crate::constants::{
    DATE_ONLY_FORMAT, FAST_PATH_YEAR_RANGE, MAX_UNIX_DIGITS, MAX_UNIX_SECONDS_DIGITS,
    NAIVE_DATETIME_FORMATS, TIMESTAMP_SENTINEL,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Failure to normalize a timestamp
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// The field was empty or whitespace only
    #[error("timestamp is empty")]
    Empty,

    /// No supported convention matched
    #[error("unable to parse timestamp: '{0}'")]
    Unrecognized(String),
}

/// Cumulative day counts at the start of each month in a non-leap year
const MONTH_START_DAYS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

const MILLIS_PER_SECOND: i64 = 1000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Normalize a timestamp string to epoch milliseconds
pub fn normalize(input: &str) -> Result<i64, TimestampError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Some(millis) = parse_unix_digits(value) {
        return Ok(millis);
    }

    if let Some(millis) = parse_iso_fast(value) {
        return Ok(millis);
    }

    parse_fallback(value).ok_or_else(|| TimestampError::Unrecognized(value.to_string()))
}

/// Normalize a timestamp, mapping failures to the sentinel value
pub fn normalize_or_sentinel(input: &str) -> i64 {
    normalize(input).unwrap_or(TIMESTAMP_SENTINEL)
}

/// Interpret a bare digit string as a Unix timestamp
pub fn parse_unix_digits(value: &str) -> Option<i64> {
    if value.is_empty()
        || value.len() > MAX_UNIX_DIGITS
        || !value.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    // At most 13 digits always fits in an i64
    let number = value
        .bytes()
        .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));

    if value.len() <= MAX_UNIX_SECONDS_DIGITS {
        Some(number * MILLIS_PER_SECOND)
    } else {
        Some(number)
    }
}

/// Fixed-offset ISO-8601 parser
///
/// Returns `None` whenever the input does not match the strict layout, so the
/// caller can fall through to the general format list.
pub fn parse_iso_fast(value: &str) -> Option<i64> {
    let bytes = value.as_bytes();
    if bytes.len() < 19 {
        return None;
    }
    if !matches!(bytes[10], b'T' | b' ')
        || bytes[4] != b'-'
        || bytes[7] != b'-'
        || bytes[13] != b':'
        || bytes[16] != b':'
    {
        return None;
    }

    let year = digits(&bytes[0..4])? as i32;
    let month = digits(&bytes[5..7])? as u32;
    let day = digits(&bytes[8..10])? as u32;
    let hour = digits(&bytes[11..13])?;
    let minute = digits(&bytes[14..16])?;
    let second = digits(&bytes[17..19])?;

    let fraction_millis = parse_fast_suffix(&bytes[19..])?;

    let (min_year, max_year) = FAST_PATH_YEAR_RANGE;
    if year < min_year || year > max_year {
        return None;
    }
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let days = simplified_days_since_epoch(year, month, day);
    let seconds = days * SECONDS_PER_DAY + hour * 3600 + minute * 60 + second;
    Some(seconds * MILLIS_PER_SECOND + fraction_millis)
}

/// Days since 1970-01-01 using a 4-year leap cycle with no century exceptions
///
/// Exact for 1901-2099; only used by the fast path, which is limited to
/// [`FAST_PATH_YEAR_RANGE`] and checks `month` is 1-12 before calling.
fn simplified_days_since_epoch(year: i32, month: u32, day: u32) -> i64 {
    let year = i64::from(year);
    let mut days = (year - 1970) * 365 + (year - 1969) / 4;
    days += MONTH_START_DAYS[(month - 1) as usize] + i64::from(day) - 1;
    if month > 2 && year % 4 == 0 {
        days += 1;
    }
    days
}

/// Try the general format list, first match wins
pub fn parse_fallback(value: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(value, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Accepts "", "Z", ".fff" or ".fffZ"; returns the millisecond part
fn parse_fast_suffix(suffix: &[u8]) -> Option<i64> {
    let suffix = suffix.strip_suffix(b"Z").unwrap_or(suffix);
    if suffix.is_empty() {
        return Some(0);
    }

    let fraction = suffix.strip_prefix(b".")?;
    if fraction.is_empty() || !fraction.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let millis = fraction
        .iter()
        .chain(std::iter::repeat(&b'0'))
        .take(3)
        .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));
    Some(millis)
}

fn digits(run: &[u8]) -> Option<i64> {
    run.iter().try_fold(0i64, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + i64::from(b - b'0'))
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
