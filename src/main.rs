//! jwt-forge: an offline workbench for JSON Web Tokens.
//!
//! Entry point for the application. Parses CLI arguments, installs the
//! log subscriber, and delegates to the appropriate command handler.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod display;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

/// Environment variable holding an `EnvFilter` directive.
const LOG_ENV: &str = "JWT_FORGE_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `JWT_FORGE_LOG` when set.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Dispatch to the appropriate command handler.
///
/// Returns `ExitCode` so the caller can exit without `process::exit`,
/// allowing all destructors (including `Zeroizing`) to run.
fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Decode(args) => {
            commands::decode::execute(args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify(args) => {
            let token_valid = commands::verify::execute(args)?;
            Ok(if token_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Sign(args) => {
            commands::sign::execute(args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Keygen(args) => {
            commands::keygen::execute(args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
