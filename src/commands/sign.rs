//! Handler for the `sign` subcommand.
//!
//! Builds a header from `--alg`, `--kid` and optional `--header` members,
//! signs the `--claims` object, and prints the compact token.

use anyhow::Result;
use serde_json::{Map, Value};

use jwt_forge::JwtForgeError;

use super::input::resolve_key;
use crate::cli::SignArgs;

/// Execute the `sign` subcommand with the given arguments.
pub fn execute(args: &SignArgs) -> Result<()> {
    let claims = parse_object("--claims", &args.claims)?;
    let header = build_header(args)?;
    let key = resolve_key(&args.key)?;

    let token = jwt_forge::sign(&header, &claims, &key)?;
    println!("{token}");
    Ok(())
}

fn build_header(args: &SignArgs) -> Result<Map<String, Value>, JwtForgeError> {
    let mut header = match &args.header {
        Some(raw) => parse_object("--header", raw)?,
        None => Map::new(),
    };
    header
        .entry("typ")
        .or_insert_with(|| Value::String("JWT".to_string()));
    header.insert("alg".to_string(), Value::String(args.alg.to_string()));
    if let Some(kid) = &args.kid {
        header.insert("kid".to_string(), Value::String(kid.clone()));
    }
    Ok(header)
}

fn parse_object(argument: &str, raw: &str) -> Result<Map<String, Value>, JwtForgeError> {
    let invalid = |reason: String| JwtForgeError::InvalidJsonArgument {
        argument: argument.to_string(),
        reason,
    };
    match serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))? {
        Value::Object(map) => Ok(map),
        _ => Err(invalid("expected a JSON object".to_string())),
    }
}
