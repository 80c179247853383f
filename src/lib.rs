//! jwt-forge: sign, decode, and verify JSON Web Tokens offline.
//!
//! The library side is a small token engine. The free functions below use
//! [`TokenEngine::default`], which signs with the RustCrypto backend and
//! draws randomness from the operating system.
//!
//! ```no_run
//! use jwt_forge::{Algorithm, VerifyOptions, jwt_header};
//! use serde_json::json;
//!
//! let token = jwt_forge::sign(
//!     &jwt_header(Algorithm::HS256, None),
//!     &json!({"sub": "alice"}),
//!     "shared-secret",
//! )?;
//! let outcome = jwt_forge::verify(&token, "shared-secret", &VerifyOptions::new())?;
//! assert!(outcome.is_valid());
//! # Ok::<(), jwt_forge::JwtForgeError>(())
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod error;

use serde::Serialize;
use serde_json::{Map, Value};

pub use crate::core::algorithm::{Algorithm, HeaderAlgorithm};
pub use crate::core::crypto::{CryptoProvider, OsRandom, RandomSource, RustCryptoProvider};
pub use crate::core::decoder::DecodedToken;
pub use crate::core::encoder::jwt_header;
pub use crate::core::engine::TokenEngine;
pub use crate::core::jwks::{Jwk, JwkSet};
pub use crate::core::keygen::{GeneratedKeyPair, KeySpec};
pub use crate::core::validator::{Rejection, ValidationOutcome, VerifyOptions};
pub use crate::error::{DecodeError, JwtForgeError};

/// Sign `payload` under `header` with the default engine.
///
/// # Errors
///
/// See [`TokenEngine::sign`].
pub fn sign<P: Serialize + ?Sized>(
    header: &Map<String, Value>,
    payload: &P,
    key: &str,
) -> Result<String, JwtForgeError> {
    TokenEngine::default().sign(header, payload, key)
}

/// Decode a token without verifying it.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first structural problem.
pub fn decode(token: &str) -> Result<DecodedToken, DecodeError> {
    TokenEngine::default().decode(token)
}

/// Verify a token with the default engine.
///
/// # Errors
///
/// See [`TokenEngine::verify`].
pub fn verify(
    token: &str,
    key: &str,
    options: &VerifyOptions,
) -> Result<ValidationOutcome, JwtForgeError> {
    TokenEngine::default().verify(token, key, options)
}

/// Generate a key pair with the default engine.
///
/// # Errors
///
/// See [`TokenEngine::generate_key_pair`].
pub fn generate_key_pair(spec: KeySpec) -> Result<GeneratedKeyPair, JwtForgeError> {
    TokenEngine::default().generate_key_pair(spec)
}
