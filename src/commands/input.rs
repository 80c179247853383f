//! Token and key resolution shared by the subcommands.
//!
//! Tokens come from the positional argument, then `--token-env`, then
//! piped stdin. Keys come from `--secret`, `--secret-env`, or
//! `--key-file`.

use std::fs;
use std::io::{self, IsTerminal, Read};

use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::{KeyInput, TokenInput};
use jwt_forge::JwtForgeError;

/// Resolve the token text, trimmed of surrounding whitespace.
pub fn resolve_token(input: &TokenInput) -> Result<Zeroizing<String>, JwtForgeError> {
    if let Some(token) = &input.token {
        return non_empty(token);
    }

    if let Some(name) = &input.token_env {
        debug!(var = %name, "reading token from environment");
        let value = read_env(name)?;
        return non_empty(&value);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(JwtForgeError::NoTokenProvided);
    }
    debug!("reading token from stdin");
    let mut buffer = Zeroizing::new(String::new());
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .map_err(|_| JwtForgeError::NoTokenProvided)?;
    non_empty(&buffer)
}

/// Read an environment variable, rejecting names `std::env::var` would
/// panic on or could never match.
fn read_env(name: &str) -> Result<Zeroizing<String>, JwtForgeError> {
    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(JwtForgeError::InvalidEnvVarName {
            name: name.to_string(),
        });
    }
    std::env::var(name)
        .map(Zeroizing::new)
        .map_err(|_| JwtForgeError::EnvVarNotFound {
            name: name.to_string(),
        })
}

fn non_empty(raw: &str) -> Result<Zeroizing<String>, JwtForgeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JwtForgeError::NoTokenProvided);
    }
    Ok(Zeroizing::new(trimmed.to_string()))
}

/// Resolve the key text from whichever source was given.
///
/// Secrets are used exactly as given. Key files are read whole.
pub fn resolve_key(input: &KeyInput) -> Result<Zeroizing<String>, JwtForgeError> {
    if let Some(secret) = &input.secret {
        return Ok(secret.clone());
    }

    if let Some(name) = &input.secret_env {
        debug!(var = %name, "reading secret from environment");
        return read_env(name);
    }

    if let Some(path) = &input.key_file {
        debug!(path = %path.display(), "reading key file");
        return fs::read_to_string(path)
            .map(Zeroizing::new)
            .map_err(|e| JwtForgeError::KeyFileError {
                path: path.display().to_string(),
                reason: e.to_string(),
            });
    }

    Err(JwtForgeError::NoKeyProvided)
}
