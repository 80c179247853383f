//! Time-travel debugging for JWT temporal claims.
//!
//! Parses time expressions (relative like "+7d" or absolute like ISO 8601)
//! into the instant at which `exp` and `nbf` should be evaluated.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::error::JwtForgeError;

const UNRECOGNIZED: &str =
    "expected a relative offset like +7d, an ISO 8601 timestamp, or Unix seconds";

/// A parsed time target for time-travel evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTarget {
    /// The resolved absolute timestamp.
    pub timestamp: DateTime<Utc>,
    /// The original expression provided by the user.
    pub expression: String,
}

/// Parse a time-travel expression relative to the current time.
///
/// Supports the following formats:
/// - Relative: `+7d`, `-1h`, `+30m`, `+1y`, `-5s`, `+2w`
/// - Absolute ISO 8601: `2024-01-15T14:30:00Z`, `2024-01-15T14:30:00`,
///   `2024-01-15`
/// - Absolute Unix epoch: `1705312200`
///
/// # Errors
///
/// Returns an error if the expression doesn't match any known format.
pub fn parse_time_expression(expression: &str) -> Result<TimeTarget, JwtForgeError> {
    parse_time_expression_at(expression, Utc::now())
}

/// Like [`parse_time_expression`], with relative offsets applied to `now`.
pub fn parse_time_expression_at(
    expression: &str,
    now: DateTime<Utc>,
) -> Result<TimeTarget, JwtForgeError> {
    let trimmed = expression.trim();
    let invalid = |reason: &str| JwtForgeError::InvalidTimeExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("expression is empty"));
    }

    let timestamp = if let Some(offset) = trimmed.strip_prefix('+') {
        let delta = parse_offset(offset).map_err(invalid)?;
        now.checked_add_signed(delta)
            .ok_or_else(|| invalid("offset is out of range"))?
    } else if let Some(offset) = trimmed.strip_prefix('-') {
        let delta = parse_offset(offset).map_err(invalid)?;
        now.checked_sub_signed(delta)
            .ok_or_else(|| invalid("offset is out of range"))?
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        trimmed
            .parse()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| invalid("epoch seconds are out of range"))?
    } else {
        parse_absolute(trimmed).ok_or_else(|| invalid(UNRECOGNIZED))?
    };

    Ok(TimeTarget {
        timestamp,
        expression: expression.to_string(),
    })
}

/// Parse `<amount><unit>` after the sign has been stripped.
fn parse_offset(offset: &str) -> Result<TimeDelta, &'static str> {
    let split = offset
        .find(|c: char| !c.is_ascii_digit())
        .ok_or("missing unit (use s, m, h, d, w or y)")?;
    let (amount, unit) = offset.split_at(split);
    if amount.is_empty() {
        return Err("missing amount before the unit");
    }
    let amount: i64 = amount.parse().map_err(|_| "amount is too large")?;

    let seconds_per_unit = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 604_800,
        "y" => 31_536_000,
        _ => return Err("unknown unit (use s, m, h, d, w or y)"),
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(TimeDelta::try_seconds)
        .ok_or("offset is out of range")
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
