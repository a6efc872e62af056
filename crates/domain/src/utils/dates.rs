//! Date formatting for Fishbowl payloads
//!
//! Fishbowl takes calendar dates as `YYYY-MM-DD` and timestamps as RFC 3339
//! in UTC. Inputs may be RFC 3339 strings, bare dates, naive date-times
//! (read as UTC) or epoch milliseconds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

use crate::errors::{FishbowlError, Result};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a JSON date value into a UTC timestamp.
pub fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_str(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .ok_or_else(|| invalid_date(&number.to_string())),
        other => Err(invalid_date(&other.to_string())),
    }
}

/// Parse a textual date or timestamp into UTC.
pub fn parse_timestamp_str(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| invalid_date(text))
}

/// `YYYY-MM-DD` in UTC.
pub fn format_date(value: &Value) -> Result<String> {
    Ok(parse_timestamp(value)?.format("%Y-%m-%d").to_string())
}

/// RFC 3339 UTC timestamp with millisecond precision.
pub fn format_date_time(value: &Value) -> Result<String> {
    Ok(to_iso_string(&parse_timestamp(value)?))
}

/// Render a timestamp the way Fishbowl's `modifiedAfter` filter expects it.
pub fn to_iso_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn invalid_date(input: &str) -> FishbowlError {
    FishbowlError::Validation(format!("Invalid date: {input}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn format_date_from_rfc3339_converts_to_utc() {
        assert_eq!(format_date(&json!("2024-03-01T23:30:00-02:00")).unwrap(), "2024-03-02");
        assert_eq!(format_date(&json!("2024-03-01T10:00:00Z")).unwrap(), "2024-03-01");
    }

    #[test]
    fn format_date_accepts_plain_dates_and_naive_times() {
        assert_eq!(format_date(&json!("2024-12-31")).unwrap(), "2024-12-31");
        assert_eq!(format_date(&json!("2024-12-31T08:15:00")).unwrap(), "2024-12-31");
        assert_eq!(format_date(&json!("2024-12-31 08:15:00")).unwrap(), "2024-12-31");
    }

    #[test]
    fn format_date_accepts_epoch_millis() {
        assert_eq!(format_date(&json!(0)).unwrap(), "1970-01-01");
    }

    #[test]
    fn format_date_time_has_millisecond_precision() {
        assert_eq!(
            format_date_time(&json!("2024-05-06T07:08:09+00:00")).unwrap(),
            "2024-05-06T07:08:09.000Z"
        );
    }

    #[test]
    fn invalid_dates_are_validation_errors() {
        let err = format_date(&json!("next tuesday")).unwrap_err();
        assert!(matches!(
            err,
            FishbowlError::Validation(message) if message.contains("next tuesday")
        ));
        assert!(format_date(&json!(true)).is_err());
    }
}
