//! Handler for the `decode` subcommand.
//!
//! Decodes and pretty-prints a JWT's header and payload without
//! verifying its signature. Supports reading the token from a CLI
//! argument, environment variable, or stdin.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde_json::{Value, json};

use super::input::resolve_token;
use crate::cli::DecodeArgs;
use crate::display::json_printer::print_json;
use crate::display::token_status::display_token_status;

/// Execute the `decode` subcommand with the given arguments.
pub fn execute(args: &DecodeArgs) -> Result<()> {
    let token = resolve_token(&args.input)?;
    let decoded = jwt_forge::decode(&token)?;

    if args.json {
        let document = json!({
            "header": Value::Object(decoded.header.clone()),
            "payload": Value::Object(decoded.payload.clone()),
            "signature": decoded.signature,
        });
        print_json(&document, false);
        return Ok(());
    }

    println!("{}", "Header".bold());
    print_json(&Value::Object(decoded.header.clone()), true);
    println!();
    println!("{}", "Payload".bold());
    print_json(&Value::Object(decoded.payload.clone()), true);
    println!();

    let signature = match decoded.signature_bytes() {
        Ok(bytes) if bytes.is_empty() => "none (unsecured token)".yellow(),
        Ok(bytes) => format!("present ({} bytes, not verified)", bytes.len()).normal(),
        Err(_) => "present (not valid base64url)".red(),
    };
    println!("{} {signature}", "Signature:".bold());
    println!();

    println!("{}", "Token Status".bold());
    display_token_status(&decoded.payload, Utc::now());
    Ok(())
}
