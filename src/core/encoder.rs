//! JWS compact serialization.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::algorithm::{Algorithm, HeaderAlgorithm};
use super::base64url;
use super::crypto::CryptoProvider;
use super::signer::scheme_for;
use crate::error::JwtForgeError;

/// Build a standard header: `{"alg": ..., "typ": "JWT"}` plus `kid` when
/// given.
pub fn jwt_header(alg: Algorithm, kid: Option<&str>) -> Map<String, Value> {
    let mut header = Map::new();
    header.insert("alg".to_string(), Value::String(alg.as_str().to_string()));
    header.insert("typ".to_string(), Value::String("JWT".to_string()));
    if let Some(kid) = kid {
        header.insert("kid".to_string(), Value::String(kid.to_string()));
    }
    header
}

/// Sign `payload` under `header` and return the compact token.
///
/// The header's `alg` selects the algorithm; every other header member is
/// serialized as given. The payload must serialize to a JSON object.
///
/// # Errors
///
/// - [`JwtForgeError::UnsupportedAlgorithm`] if `alg` is missing, `none`,
///   or unknown.
/// - [`JwtForgeError::InvalidKeyMaterial`] if `key` does not fit the
///   algorithm.
/// - [`JwtForgeError::InvalidPayload`] if `payload` is not a JSON object.
pub fn encode_token<P: Serialize + ?Sized>(
    provider: &dyn CryptoProvider,
    header: &Map<String, Value>,
    payload: &P,
    key: &str,
) -> Result<String, JwtForgeError> {
    let alg = match HeaderAlgorithm::from_header(header) {
        HeaderAlgorithm::Supported(alg) => alg,
        other => {
            return Err(JwtForgeError::UnsupportedAlgorithm {
                algorithm: other.to_string(),
            });
        }
    };

    let claims = serde_json::to_value(payload).map_err(|e| JwtForgeError::InvalidPayload {
        reason: e.to_string(),
    })?;
    if !claims.is_object() {
        return Err(JwtForgeError::InvalidPayload {
            reason: "claims must serialize to a JSON object".to_string(),
        });
    }

    let scheme = scheme_for(alg);
    let key = scheme.signing_key(alg, key)?;

    let header_json = serde_json::to_vec(header).map_err(|e| JwtForgeError::InvalidPayload {
        reason: format!("header: {e}"),
    })?;
    let payload_json = serde_json::to_vec(&claims).map_err(|e| JwtForgeError::InvalidPayload {
        reason: e.to_string(),
    })?;

    let signing_input = format!(
        "{}.{}",
        base64url::encode(&header_json),
        base64url::encode(&payload_json)
    );
    let signature = scheme.sign(provider, alg, &key, signing_input.as_bytes())?;
    debug!(alg = %alg, signature_len = signature.len(), "token signed");

    Ok(format!("{signing_input}.{}", base64url::encode(&signature)))
}
