//! Unix timestamps and date-time literals.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{PastelensError, Result};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Resolution of a Unix timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Seconds,
    Milliseconds,
}

/// One instant in every representation the transforms show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeDetail {
    pub utc:          DateTime<Utc>,
    pub rfc3339:      String,
    pub unix_seconds: i64,
    pub unix_millis:  i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision:    Option<Precision>,
}

impl TimeDetail {
    fn new(utc: DateTime<Utc>, precision: Option<Precision>) -> Self {
        Self {
            utc,
            rfc3339: utc.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            unix_seconds: utc.timestamp(),
            unix_millis: utc.timestamp_millis(),
            precision,
        }
    }
}

/// Exactly 10 (seconds) or 13 (milliseconds) decimal digits.
pub fn looks_like_unix_timestamp(text: &str) -> bool {
    matches!(text.len(), 10 | 13) && text.bytes().all(|b| b.is_ascii_digit())
}

/// Converts a 10- or 13-digit Unix timestamp to UTC.
pub fn parse_unix_timestamp(text: &str) -> Result<TimeDetail> {
    let invalid = || {
        PastelensError::InvalidTimestamp {
            input: text.to_owned(),
        }
    };
    if !looks_like_unix_timestamp(text) {
        return Err(invalid());
    }
    let value: i64 = text.parse().map_err(|_| invalid())?;
    let (utc, precision) = if text.len() == 13 {
        (DateTime::from_timestamp_millis(value), Precision::Milliseconds)
    }
    else {
        (DateTime::from_timestamp(value, 0), Precision::Seconds)
    };
    Ok(TimeDetail::new(utc.ok_or_else(invalid)?, Some(precision)))
}

/// Parses RFC 3339, RFC 2822, `YYYY-MM-DD[ HH:MM[:SS]]` or
/// `YYYY/MM/DD[ HH:MM[:SS]]`. Literals without an offset are taken as UTC.
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// [`parse_date_time`] as a transform result.
pub fn date_time_detail(text: &str) -> Result<TimeDetail> {
    parse_date_time(text)
        .map(|utc| TimeDetail::new(utc, None))
        .ok_or_else(|| {
            PastelensError::InvalidTimestamp {
                input: text.to_owned(),
            }
        })
}
