//! Token status display for temporal claims.
//!
//! Renders human-readable status information for JWT temporal claims
//! (`exp`, `iat`, `nbf`) including expiry status with color coding.

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::{Map, Value};

use jwt_forge::core::claims::{self, NumericDate};

/// Display the temporal status of a JWT's claims.
///
/// Examines `exp`, `iat`, and `nbf` claims in the payload and prints
/// human-readable status information:
/// - Expired tokens: red "EXPIRED (X ago)"
/// - Valid tokens: green "VALID (expires in X)"
/// - Not-yet-valid tokens: yellow "NOT YET VALID (valid in X)"
pub fn display_token_status(payload: &Map<String, Value>, now: DateTime<Utc>) {
    for line in status_lines(payload, now) {
        println!("{line}");
    }
}

/// The lines [`display_token_status`] prints.
pub fn status_lines(payload: &Map<String, Value>, now: DateTime<Utc>) -> Vec<String> {
    let now_secs = now.timestamp() as f64;
    let mut lines = Vec::new();

    if let NumericDate::Seconds(iat) = claims::numeric_date(payload, "iat") {
        lines.push(format!(
            "Issued at:  {} ({} ago)",
            claims::format_timestamp(iat),
            humanize(now_secs - iat)
        ));
    }

    let nbf = match claims::numeric_date(payload, "nbf") {
        NumericDate::Seconds(nbf) => Some(nbf),
        _ => None,
    };
    if let Some(nbf) = nbf {
        lines.push(format!("Not before: {}", claims::format_timestamp(nbf)));
    }

    let status = match (claims::numeric_date(payload, "exp"), nbf) {
        (_, Some(nbf)) if now_secs < nbf => format!(
            "NOT YET VALID (valid in {})",
            humanize(nbf - now_secs)
        )
        .yellow(),
        (NumericDate::Seconds(exp), _) if now_secs >= exp => {
            format!("EXPIRED ({} ago)", humanize(now_secs - exp)).red()
        }
        (NumericDate::Seconds(exp), _) => {
            format!("VALID (expires in {})", humanize(exp - now_secs)).green()
        }
        (NumericDate::NotANumber(_), _) => "UNKNOWN (exp is not a number)".red(),
        (NumericDate::Absent, _) => "VALID (no expiration)".green(),
    };

    if let NumericDate::Seconds(exp) = claims::numeric_date(payload, "exp") {
        lines.push(format!("Expires:    {}", claims::format_timestamp(exp)));
    }
    lines.push(format!("Status:     {status}"));
    lines
}

/// Render a duration in seconds as its two largest units, e.g. `2d 3h`.
pub fn humanize(seconds: f64) -> String {
    let total = seconds.abs().floor() as u64;
    let units: [(&str, u64); 4] = [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)];

    let parts: Vec<String> = units
        .iter()
        .scan(total, |rest, &(suffix, size)| {
            let amount = *rest / size;
            *rest %= size;
            Some((amount, suffix))
        })
        .skip_while(|(amount, _)| *amount == 0)
        .take(2)
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, suffix)| format!("{amount}{suffix}"))
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
