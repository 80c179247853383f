//! Registered-claim helpers shared by verification and display.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A NumericDate claim (`exp`, `nbf`, `iat`) as found in a payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericDate<'a> {
    /// The claim is not present.
    Absent,
    /// Seconds since the Unix epoch, possibly fractional.
    Seconds(f64),
    /// The claim is present but not a JSON number.
    NotANumber(&'a Value),
}

/// Read a NumericDate claim from `payload`.
pub fn numeric_date<'a>(payload: &'a Map<String, Value>, name: &str) -> NumericDate<'a> {
    match payload.get(name) {
        None => NumericDate::Absent,
        Some(value) => match value.as_f64() {
            Some(secs) => NumericDate::Seconds(secs),
            None => NumericDate::NotANumber(value),
        },
    }
}

/// Convert NumericDate seconds to a UTC timestamp, if representable.
pub fn to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs.floor() as i64, 0)
}

/// Render NumericDate seconds for people, e.g. `2024-01-15 14:30:00 UTC`.
///
/// Values outside chrono's range fall back to the raw number.
pub fn format_timestamp(secs: f64) -> String {
    match to_datetime(secs) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => secs.to_string(),
    }
}

/// Whether an `aud` claim names `expected`.
///
/// A string matches by equality; an array matches if any string element
/// does. Anything else never matches.
pub fn audience_contains(aud: &Value, expected: &str) -> bool {
    match aud {
        Value::String(single) => single == expected,
        Value::Array(items) => items.iter().any(|item| item.as_str() == Some(expected)),
        _ => false,
    }
}
