//! CLI argument definitions for jwt-forge.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! Argument structs that can carry tokens or secrets implement a custom
//! `Debug` that redacts them, preventing accidental leakage through
//! debug formatting, error chains, or logging.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jwt_forge::Algorithm;
use zeroize::Zeroizing;

/// An offline workbench for signing, decoding, and verifying JSON Web
/// Tokens (JWTs) and generating signing keys.
#[derive(Debug, Parser)]
#[command(name = "jwt-forge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr (overridden by JWT_FORGE_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode and inspect a JWT without verifying its signature.
    Decode(DecodeArgs),

    /// Verify a JWT's signature and registered claims.
    Verify(VerifyArgs),

    /// Sign a claim set and print the compact token.
    Sign(SignArgs),

    /// Generate an RSA or P-256 signing key pair.
    Keygen(KeygenArgs),
}

/// Where the token comes from. Falls back to stdin when neither is set.
#[derive(Args)]
pub struct TokenInput {
    /// The JWT token. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,
}

impl fmt::Debug for TokenInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInput")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .finish()
    }
}

/// Where the key comes from. Exactly one source is expected.
#[derive(Args)]
#[group(multiple = false)]
pub struct KeyInput {
    /// HMAC shared secret.
    ///
    /// WARNING: Passing secrets via CLI arguments may expose them in shell
    /// history. Prefer --secret-env or --key-file instead.
    #[arg(long, value_name = "SECRET", value_parser = parse_zeroizing_string)]
    pub secret: Option<Zeroizing<String>>,

    /// Read the HMAC secret from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub secret_env: Option<String>,

    /// Path to a key file: PEM (RSA or P-256), JWK, or JWK Set.
    #[arg(long, value_name = "FILE")]
    pub key_file: Option<PathBuf>,
}

impl fmt::Debug for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyInput")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("secret_env", &self.secret_env)
            .field("key_file", &self.key_file)
            .finish()
    }
}

/// Arguments for the `decode` subcommand.
#[derive(Debug, Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: TokenInput,

    /// Output raw JSON without colors (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `verify` subcommand.
#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub input: TokenInput,

    #[command(flatten)]
    pub key: KeyInput,

    /// Require the `aud` claim to contain this value.
    #[arg(long, value_name = "AUD")]
    pub audience: Option<String>,

    /// Require the `iss` claim to equal this value.
    #[arg(long, value_name = "ISS")]
    pub issuer: Option<String>,

    /// Clock skew tolerated on `exp` and `nbf`, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 1)]
    pub leeway: u32,

    /// Simulate a different current time for exp/nbf checks.
    ///
    /// Accepts relative expressions like "+7d", "-1h", "+30m" or
    /// absolute timestamps in ISO 8601 or Unix epoch format.
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    pub time_travel: Option<String>,

    /// Output raw JSON without colors (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `sign` subcommand.
#[derive(Debug, Args)]
pub struct SignArgs {
    /// Claim set as a JSON object, e.g. '{"sub":"alice"}'.
    #[arg(long, value_name = "JSON")]
    pub claims: String,

    /// Signing algorithm.
    #[arg(long, value_name = "ALG", default_value = "HS256")]
    pub alg: Algorithm,

    /// Key ID placed in the header's `kid`.
    #[arg(long, value_name = "KID")]
    pub kid: Option<String>,

    /// Extra header members as a JSON object. `alg` and `kid` flags win.
    #[arg(long, value_name = "JSON")]
    pub header: Option<String>,

    #[command(flatten)]
    pub key: KeyInput,
}

/// Key pair types offered by `keygen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyType {
    /// RSA, for RS256.
    Rsa,
    /// P-256, for ES256.
    Ec,
}

/// Arguments for the `keygen` subcommand.
#[derive(Debug, Args)]
pub struct KeygenArgs {
    /// Key type to generate.
    #[arg(long, value_enum)]
    pub algorithm: KeyType,

    /// RSA modulus size (2048 or 4096). Ignored for EC keys.
    #[arg(long, default_value_t = 2048)]
    pub bits: usize,

    /// Write private.pem, public.pem and jwks.json into this directory
    /// instead of printing them.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print a single JSON document instead of PEM blocks.
    #[arg(long)]
    pub json: bool,
}

/// Parse a string into a `Zeroizing<String>` for secure CLI arguments.
fn parse_zeroizing_string(s: &str) -> Result<Zeroizing<String>, std::convert::Infallible> {
    Ok(Zeroizing::new(s.to_string()))
}
