//! Algorithm identifiers.
//!
//! Header `alg` values are attacker-controlled, so they are parsed into a
//! [`HeaderAlgorithm`] that keeps `none` and unknown names as explicit
//! variants instead of failing. Only [`Algorithm`] values can reach a
//! signer.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

/// Digest used by an algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

/// Signature scheme family, used to match keys to algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    /// Shared secret.
    Hmac,
    /// RSA key pair.
    Rsa,
    /// P-256 key pair.
    EcP256,
}

/// A supported JWS signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC using SHA-256.
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384.
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512.
    RS512,
    /// ECDSA using P-256 and SHA-256.
    ES256,
}

impl Algorithm {
    /// Every supported algorithm, in display order.
    pub const ALL: [Algorithm; 7] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
    ];

    /// The registered `alg` name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
        }
    }

    /// The key family this algorithm signs with.
    pub fn family(self) -> KeyFamily {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => KeyFamily::Hmac,
            Self::RS256 | Self::RS384 | Self::RS512 => KeyFamily::Rsa,
            Self::ES256 => KeyFamily::EcP256,
        }
    }

    /// The digest the algorithm hashes the signing input with.
    pub fn hash(self) -> HashAlg {
        match self {
            Self::HS256 | Self::RS256 | Self::ES256 => HashAlg::Sha256,
            Self::HS384 | Self::RS384 => HashAlg::Sha384,
            Self::HS512 | Self::RS512 => HashAlg::Sha512,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    /// Parses an exact, case-sensitive `alg` name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// The `alg` member of a token header, as found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAlgorithm {
    /// A supported algorithm.
    Supported(Algorithm),
    /// The unsecured `none` algorithm, in any letter case.
    None,
    /// Anything else, including a missing or non-string `alg`.
    Unrecognized(String),
}

impl HeaderAlgorithm {
    /// Classify the `alg` member of a header object.
    pub fn from_header(header: &Map<String, Value>) -> Self {
        match header.get("alg") {
            Some(Value::String(name)) => Self::from_name(name),
            Some(other) => Self::Unrecognized(other.to_string()),
            None => Self::Unrecognized("(missing)".to_string()),
        }
    }

    /// Classify an `alg` name.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("none") {
            return Self::None;
        }
        match name.parse() {
            Ok(alg) => Self::Supported(alg),
            Err(raw) => Self::Unrecognized(raw),
        }
    }
}

impl fmt::Display for HeaderAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supported(alg) => write!(f, "{alg}"),
            Self::None => f.write_str("none"),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}
