//! Signature and claim verification.
//!
//! [`verify_token`] walks a fixed sequence of checks and stops at the
//! first failure: structure, algorithm, signature, `exp`, `nbf`, `aud`,
//! `iss`. A rejected token is an ordinary outcome, not an error; only
//! unusable key material is reported through `Err`.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use super::algorithm::HeaderAlgorithm;
use super::claims::{self, NumericDate};
use super::crypto::CryptoProvider;
use super::decoder::decode_token;
use super::signer::scheme_for;
use crate::error::{DecodeError, JwtForgeError};

/// Clock skew tolerated on `exp` and `nbf`, in seconds.
///
/// Expiry is checked as `now >= exp + leeway`, so one second still rejects a
/// token whose `exp` is one second in the past. A larger default would let
/// such a token through.
pub const DEFAULT_LEEWAY_SECS: i64 = 1;

/// Claim expectations and clock settings for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Required `aud` value, if any.
    pub audience: Option<String>,
    /// Required `iss` value, if any.
    pub issuer: Option<String>,
    /// Clock skew tolerated on `exp` and `nbf`.
    pub leeway: TimeDelta,
    /// Evaluate time claims at this instant instead of the system clock.
    pub now: Option<DateTime<Utc>>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            audience: None,
            issuer: None,
            leeway: TimeDelta::seconds(DEFAULT_LEEWAY_SECS),
            now: None,
        }
    }
}

impl VerifyOptions {
    /// Options with no claim expectations and the default leeway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `aud` to name `audience` when the token carries one.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Require `iss` to equal `issuer` when the token carries one.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Override the clock skew tolerance.
    pub fn with_leeway(mut self, leeway: TimeDelta) -> Self {
        self.leeway = leeway;
        self
    }

    /// Evaluate time claims at a fixed instant.
    pub fn at(mut self, instant: DateTime<Utc>) -> Self {
        self.now = Some(instant);
        self
    }
}

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The token did not decode.
    Malformed(DecodeError),
    /// The header names the unsecured `none` algorithm.
    AlgorithmNone,
    /// The header names an algorithm the engine does not support.
    UnsupportedAlgorithm(String),
    /// The signature does not match the signing input under the key.
    SignatureInvalid,
    /// `exp` or `nbf` is present but not a number.
    InvalidTimeClaim {
        /// Name of the claim.
        claim: &'static str,
    },
    /// The current time is past `exp` plus leeway.
    Expired {
        /// The `exp` claim, in seconds.
        expired_at: f64,
    },
    /// The current time is before `nbf` minus leeway.
    NotYetValid {
        /// The `nbf` claim, in seconds.
        not_before: f64,
    },
    /// `aud` does not name the expected audience.
    AudienceMismatch {
        /// Expected audience, JSON-rendered.
        expected: String,
        /// The token's `aud` claim, JSON-rendered.
        actual: String,
    },
    /// `iss` does not equal the expected issuer.
    IssuerMismatch {
        /// Expected issuer, JSON-rendered.
        expected: String,
        /// The token's `iss` claim, JSON-rendered.
        actual: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed token: {err}"),
            Self::AlgorithmNone => f.write_str("algorithm none not accepted"),
            Self::UnsupportedAlgorithm(alg) => write!(f, "unsupported algorithm: {alg}"),
            Self::SignatureInvalid => f.write_str("signature is invalid"),
            Self::InvalidTimeClaim { claim } => write!(f, "{claim} claim must be a numeric date"),
            Self::Expired { expired_at } => write!(
                f,
                "token expired at {}",
                claims::format_timestamp(*expired_at)
            ),
            Self::NotYetValid { not_before } => write!(
                f,
                "token not valid before {}",
                claims::format_timestamp(*not_before)
            ),
            Self::AudienceMismatch { expected, actual } => {
                write!(f, "audience mismatch: expected {expected}, got {actual}")
            }
            Self::IssuerMismatch { expected, actual } => {
                write!(f, "issuer mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

/// Result of verifying a token.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Signature and all claim checks passed.
    Valid,
    /// The first check that failed.
    Invalid(Rejection),
}

impl ValidationOutcome {
    /// Whether the token passed every check.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Valid => None,
            Self::Invalid(rejection) => Some(rejection),
        }
    }

    /// Human-readable summary of the outcome.
    pub fn reason(&self) -> String {
        match self {
            Self::Valid => "token signature and claims are valid".to_string(),
            Self::Invalid(rejection) => rejection.to_string(),
        }
    }
}

/// Verify `token` against `key` and `options`.
///
/// # Errors
///
/// Returns [`JwtForgeError::InvalidKeyMaterial`] when `key` cannot be used
/// with the token's algorithm. Every other failure is reported as
/// [`ValidationOutcome::Invalid`].
pub fn verify_token(
    provider: &dyn CryptoProvider,
    token: &str,
    key: &str,
    options: &VerifyOptions,
) -> Result<ValidationOutcome, JwtForgeError> {
    let decoded = match decode_token(token) {
        Ok(decoded) => decoded,
        Err(err) => return Ok(reject(Rejection::Malformed(err))),
    };

    let alg = match decoded.algorithm() {
        HeaderAlgorithm::Supported(alg) => alg,
        HeaderAlgorithm::None => return Ok(reject(Rejection::AlgorithmNone)),
        HeaderAlgorithm::Unrecognized(raw) => {
            return Ok(reject(Rejection::UnsupportedAlgorithm(raw)));
        }
    };

    let scheme = scheme_for(alg);
    let key = scheme.verification_key(provider, alg, key, decoded.key_id())?;

    let Ok(signature) = decoded.signature_bytes() else {
        return Ok(reject(Rejection::SignatureInvalid));
    };
    let input = decoded.signing_input();
    if !scheme.verify(provider, alg, &key, input.as_bytes(), &signature)? {
        return Ok(reject(Rejection::SignatureInvalid));
    }

    let now = options.now.unwrap_or_else(Utc::now);
    match check_claims(&decoded.payload, options, now) {
        Some(rejection) => Ok(reject(rejection)),
        None => {
            debug!(alg = %alg, "token verified");
            Ok(ValidationOutcome::Valid)
        }
    }
}

fn reject(rejection: Rejection) -> ValidationOutcome {
    debug!(reason = %rejection, "token rejected");
    ValidationOutcome::Invalid(rejection)
}

/// Registered-claim checks, in order. Returns the first failure.
fn check_claims(
    payload: &Map<String, Value>,
    options: &VerifyOptions,
    now: DateTime<Utc>,
) -> Option<Rejection> {
    let now = now.timestamp() as f64;
    let leeway = options.leeway.num_seconds() as f64;

    match claims::numeric_date(payload, "exp") {
        NumericDate::Seconds(exp) if now >= exp + leeway => {
            return Some(Rejection::Expired { expired_at: exp });
        }
        NumericDate::NotANumber(_) => return Some(Rejection::InvalidTimeClaim { claim: "exp" }),
        _ => {}
    }

    match claims::numeric_date(payload, "nbf") {
        NumericDate::Seconds(nbf) if now < nbf - leeway => {
            return Some(Rejection::NotYetValid { not_before: nbf });
        }
        NumericDate::NotANumber(_) => return Some(Rejection::InvalidTimeClaim { claim: "nbf" }),
        _ => {}
    }

    if let (Some(expected), Some(aud)) = (&options.audience, payload.get("aud")) {
        if !claims::audience_contains(aud, expected) {
            return Some(Rejection::AudienceMismatch {
                expected: quoted(expected),
                actual: aud.to_string(),
            });
        }
    }

    if let (Some(expected), Some(iss)) = (&options.issuer, payload.get("iss")) {
        if iss.as_str() != Some(expected.as_str()) {
            return Some(Rejection::IssuerMismatch {
                expected: quoted(expected),
                actual: iss.to_string(),
            });
        }
    }

    None
}

fn quoted(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}
