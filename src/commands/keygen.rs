//! Handler for the `keygen` subcommand.
//!
//! Generates an RSA or P-256 key pair and either prints it or writes
//! `private.pem`, `public.pem` and `jwks.json` into a directory.

use std::fs;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use jwt_forge::{GeneratedKeyPair, JwtForgeError, KeySpec};

use crate::cli::{KeyType, KeygenArgs};
use crate::display::json_printer::print_json;

/// Execute the `keygen` subcommand with the given arguments.
pub fn execute(args: &KeygenArgs) -> Result<()> {
    let spec = match args.algorithm {
        KeyType::Rsa => KeySpec::Rsa { bits: args.bits },
        KeyType::Ec => KeySpec::Ec,
    };
    let pair = jwt_forge::generate_key_pair(spec)?;
    let jwks = serde_json::to_string_pretty(&pair.key_set)?;

    if let Some(dir) = &args.out_dir {
        write_files(dir, &pair, &jwks)?;
        if args.json {
            print_json(
                &json!({
                    "kid": pair.key_id,
                    "algorithm": pair.algorithm.as_str(),
                    "directory": dir.display().to_string(),
                }),
                false,
            );
        } else {
            println!(
                "{} {} key pair (kid {}) in {}",
                "Wrote".green().bold(),
                pair.algorithm,
                pair.key_id,
                dir.display()
            );
        }
        return Ok(());
    }

    if args.json {
        print_json(
            &json!({
                "kid": pair.key_id,
                "algorithm": pair.algorithm.as_str(),
                "private_key": pair.private_key.as_str(),
                "public_key": pair.public_key,
                "jwks": pair.key_set,
            }),
            false,
        );
    } else {
        print!("{}", pair.private_key.as_str());
        print!("{}", pair.public_key);
        println!("{jwks}");
    }
    Ok(())
}

fn write_files(dir: &Path, pair: &GeneratedKeyPair, jwks: &str) -> Result<(), JwtForgeError> {
    fs::create_dir_all(dir).map_err(|e| output_error(dir, &e))?;
    write_private(&dir.join("private.pem"), pair.private_key.as_bytes())?;

    let public = dir.join("public.pem");
    fs::write(&public, &pair.public_key).map_err(|e| output_error(&public, &e))?;

    let key_set = dir.join("jwks.json");
    fs::write(&key_set, format!("{jwks}\n")).map_err(|e| output_error(&key_set, &e))?;
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> Result<(), JwtForgeError> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .and_then(|mut file| file.write_all(contents))
        .map_err(|e| output_error(path, &e))
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> Result<(), JwtForgeError> {
    fs::write(path, contents).map_err(|e| output_error(path, &e))
}

fn output_error(path: &Path, err: &std::io::Error) -> JwtForgeError {
    JwtForgeError::OutputError {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
