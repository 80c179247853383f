//! JWT decoding logic.
//!
//! Handles splitting a compact token into its three parts (header,
//! payload, signature), base64url-decoding the first two and parsing
//! them as JSON objects. Decoding never checks the signature.

use std::fmt;

use serde_json::{Map, Value};

use super::algorithm::HeaderAlgorithm;
use super::base64url;
use crate::error::DecodeError;

/// The decoded parts of a JWT.
///
/// Implements a custom `Debug` that redacts `payload` and `signature`
/// to prevent accidental leakage of sensitive claim data.
#[derive(Clone, PartialEq)]
pub struct DecodedToken {
    /// The parsed JWT header (typically contains `alg` and `typ`).
    pub header: Map<String, Value>,
    /// The parsed JWT payload (claims).
    pub payload: Map<String, Value>,
    /// The raw base64url-encoded signature segment.
    pub signature: String,
    raw_header: String,
    raw_payload: String,
}

/// Custom `Debug` that redacts payload and signature to prevent
/// accidental leakage through debug formatting or error chains.
impl fmt::Debug for DecodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedToken")
            .field("header", &self.header)
            .field("payload", &"[REDACTED]")
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

impl DecodedToken {
    /// The header's `alg`, classified.
    pub fn algorithm(&self) -> HeaderAlgorithm {
        HeaderAlgorithm::from_header(&self.header)
    }

    /// The header's `kid`, when it is a string.
    pub fn key_id(&self) -> Option<&str> {
        self.header.get("kid").and_then(Value::as_str)
    }

    /// The exact bytes the signature covers: the first two segments as
    /// they appeared in the token.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.raw_header, self.raw_payload)
    }

    /// The decoded signature bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Base64DecodeError`] if the signature segment
    /// is not valid base64url.
    pub fn signature_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        let segment = "signature";
        base64url::decode(&self.signature)
            .map_err(|_| DecodeError::Base64DecodeError { segment })
    }
}

/// Decode a compact JWT into its constituent parts.
///
/// Splits the token on `.` separators, base64url-decodes the header
/// and payload segments, and parses them as JSON objects. The signature
/// is kept as its raw base64url string.
///
/// # Errors
///
/// Returns an error if the token doesn't have exactly three parts,
/// if base64url decoding fails, or if either segment is not a JSON
/// object.
pub fn decode_token(token: &str) -> Result<DecodedToken, DecodeError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [raw_header, raw_payload, signature] = parts.as_slice() else {
        return Err(DecodeError::InvalidTokenFormat {
            segments: parts.len(),
        });
    };

    let header = decode_segment(raw_header, "header")?;
    let payload = decode_segment(raw_payload, "payload")?;

    Ok(DecodedToken {
        header,
        payload,
        signature: (*signature).to_string(),
        raw_header: (*raw_header).to_string(),
        raw_payload: (*raw_payload).to_string(),
    })
}

/// Base64url-decode a segment and parse it as a JSON object.
fn decode_segment(encoded: &str, segment: &'static str) -> Result<Map<String, Value>, DecodeError> {
    let bytes = base64url::decode(encoded)
        .map_err(|_| DecodeError::Base64DecodeError { segment })?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DecodeError::NotAnObject { segment }),
        Err(e) => Err(DecodeError::JsonParseError {
            segment,
            reason: e.to_string(),
        }),
    }
}
