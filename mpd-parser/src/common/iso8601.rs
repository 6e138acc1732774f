//! ISO-8601 scalar codecs for MPD attributes.
//!
//! MPD documents encode timing as `xs:duration` (`PT10M54.00S`) and
//! `xs:dateTime` (`2013-08-10T22:03:00Z`) strings, which the XML layer hands
//! over as plain text. These functions turn them into [`std::time::Duration`]
//! and [`chrono::DateTime`] values and back.
//!
//! Both readers are pure: they do not consult the clock, the locale or the
//! local timezone. UTC offsets are taken literally from the input.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use regex::Regex;
use thiserror::Error;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
// Nominal calendar lengths; MPD producers put presentation lengths in the time fields.
const SECONDS_PER_MONTH: u64 = 30 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:([0-9]+)Y)?(?:([0-9]+)M)?(?:([0-9]+)D)?(?:T(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+)(?:\.([0-9]+))?S)?)?$",
    )
    .expect("duration pattern is valid")
});

static WEEK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P([0-9]+)W$").expect("week pattern is valid"));

/// Failure of a scalar codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    #[error("malformed duration {input:?}: {reason}")]
    MalformedDuration { input: String, reason: &'static str },

    #[error("malformed timestamp {input:?}: {source}")]
    MalformedTimestamp {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

fn malformed_duration(input: &str, reason: &'static str) -> ScalarError {
    ScalarError::MalformedDuration {
        input: input.to_string(),
        reason,
    }
}

/// Parse an `xs:duration` string (`PnYnMnDTnHnMnS` or `PnW`).
///
/// Seconds may carry a fraction, kept to nanosecond precision. Years and
/// months are converted with nominal lengths of 365 and 30 days.
///
/// # Errors
///
/// Returns [`ScalarError::MalformedDuration`] when the `P` designator is
/// missing, a field is not numeric, fields are out of order, no field is
/// present, the duration is negative, or the total overflows.
pub fn parse_duration(input: &str) -> Result<Duration, ScalarError> {
    let s = input.trim();

    if s.is_empty() {
        return Err(malformed_duration(input, "empty value"));
    }
    if s.starts_with('-') {
        return Err(malformed_duration(input, "negative durations are not supported"));
    }
    if !s.starts_with('P') {
        return Err(malformed_duration(input, "missing 'P' designator"));
    }

    if let Some(caps) = WEEK_PATTERN.captures(s) {
        let weeks = parse_field(input, caps.get(1).map(|m| m.as_str()))?;
        let secs = weeks
            .checked_mul(SECONDS_PER_WEEK)
            .ok_or_else(|| malformed_duration(input, "value out of range"))?;
        return Ok(Duration::from_secs(secs));
    }

    let caps = DURATION_PATTERN
        .captures(s)
        .ok_or_else(|| malformed_duration(input, "does not match PnYnMnDTnHnMnS"))?;

    if (1..=6).all(|i| caps.get(i).is_none()) {
        return Err(malformed_duration(input, "no date or time components"));
    }
    if s.contains('T') && (4..=6).all(|i| caps.get(i).is_none()) {
        return Err(malformed_duration(input, "'T' designator without time components"));
    }

    let units = [
        SECONDS_PER_YEAR,
        SECONDS_PER_MONTH,
        SECONDS_PER_DAY,
        SECONDS_PER_HOUR,
        SECONDS_PER_MINUTE,
        1,
    ];

    let mut secs: u64 = 0;
    for (index, unit) in units.iter().enumerate() {
        let value = parse_field(input, caps.get(index + 1).map(|m| m.as_str()))?;
        secs = value
            .checked_mul(*unit)
            .and_then(|v| secs.checked_add(v))
            .ok_or_else(|| malformed_duration(input, "value out of range"))?;
    }

    let nanos = match caps.get(7) {
        Some(m) => fraction_to_nanos(input, m.as_str())?,
        None => 0,
    };

    Ok(Duration::new(secs, nanos))
}

fn parse_field(input: &str, field: Option<&str>) -> Result<u64, ScalarError> {
    match field {
        Some(digits) => digits
            .parse::<u64>()
            .map_err(|_| malformed_duration(input, "value out of range")),
        None => Ok(0),
    }
}

// Digits past nanosecond precision are truncated.
fn fraction_to_nanos(input: &str, digits: &str) -> Result<u32, ScalarError> {
    let kept = digits.get(..digits.len().min(9)).unwrap_or(digits);
    let value: u32 = kept
        .parse()
        .map_err(|_| malformed_duration(input, "non-numeric fraction"))?;
    Ok(value * 10u32.pow(9 - kept.len() as u32))
}

/// Write a duration in the canonical `PT…H…M…S` form.
///
/// Zero is written as `PT0S`; fractional seconds drop trailing zeros.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let nanos = duration.subsec_nanos();

    if total == 0 && nanos == 0 {
        return "PT0S".to_string();
    }

    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;

    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if seconds > 0 || nanos > 0 {
        out.push_str(&seconds.to_string());
        if nanos > 0 {
            let fraction = format!("{:09}", nanos);
            out.push('.');
            out.push_str(fraction.trim_end_matches('0'));
        }
        out.push('S');
    }
    out
}

/// Parse an RFC 3339 timestamp, keeping its UTC offset.
///
/// # Errors
///
/// Returns [`ScalarError::MalformedTimestamp`] for any string that is not a
/// valid RFC 3339 date-time (including out-of-range fields such as month 13).
pub fn parse_date_time(input: &str) -> Result<DateTime<FixedOffset>, ScalarError> {
    DateTime::parse_from_rfc3339(input.trim()).map_err(|source| ScalarError::MalformedTimestamp {
        input: input.to_string(),
        source,
    })
}

/// Write a timestamp as RFC 3339, using `Z` for a zero offset.
pub fn format_date_time(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
