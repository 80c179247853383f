//! Handler for the `verify` subcommand.
//!
//! Verifies a JWT's signature using a shared secret, a PEM public key,
//! or a JWK / JWK Set file, then checks `exp`, `nbf`, `aud` and `iss`.
//! Also supports time-travel debugging for expiry and not-before
//! evaluation.

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use jwt_forge::VerifyOptions;
use jwt_forge::core::time_travel::parse_time_expression;

use super::input::{resolve_key, resolve_token};
use crate::cli::VerifyArgs;
use crate::display::json_printer::print_json;

/// Execute the `verify` subcommand. Returns whether the token is valid.
pub fn execute(args: &VerifyArgs) -> Result<bool> {
    let token = resolve_token(&args.input)?;
    let key = resolve_key(&args.key)?;

    let mut options =
        VerifyOptions::new().with_leeway(TimeDelta::seconds(i64::from(args.leeway)));
    if let Some(audience) = &args.audience {
        options = options.with_audience(audience);
    }
    if let Some(issuer) = &args.issuer {
        options = options.with_issuer(issuer);
    }
    let target = match &args.time_travel {
        Some(expression) => Some(parse_time_expression(expression)?),
        None => None,
    };
    if let Some(target) = &target {
        debug!(at = %target.timestamp, "evaluating claims at simulated time");
        options = options.at(target.timestamp);
    }
    let evaluated_at = options.now.unwrap_or_else(Utc::now);

    let outcome = jwt_forge::verify(&token, &key, &options)?;

    if args.json {
        print_json(
            &json!({
                "valid": outcome.is_valid(),
                "reason": outcome.reason(),
                "evaluated_at": evaluated_at.to_rfc3339(),
            }),
            false,
        );
    } else if outcome.is_valid() {
        println!("{} {}", "VALID".green().bold(), outcome.reason());
    } else {
        println!("{} {}", "INVALID".red().bold(), outcome.reason());
    }

    if let Some(target) = target.filter(|_| !args.json) {
        let at = evaluated_at.format("%Y-%m-%d %H:%M:%S UTC");
        let note = format!("(evaluated at {at}, time travel {})", target.expression);
        println!("{}", note.dimmed());
    }

    Ok(outcome.is_valid())
}
