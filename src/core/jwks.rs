//! JWK and JWK Set handling.
//!
//! Serializes generated public keys as single-key sets and resolves a
//! verification key from a pasted JWK or JWK Set by the token's `kid`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::algorithm::{Algorithm, KeyFamily};
use super::base64url;
use super::crypto::PublicKeyParams;
use crate::error::JwtForgeError;

/// Maximum length, in bytes, of a `kid` echoed back in error messages.
const KID_DISPLAY_LIMIT: usize = 128;

/// A public JSON Web Key (RSA or EC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type, `"RSA"` or `"EC"`.
    pub kty: String,

    /// RSA modulus (base64url).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA public exponent (base64url).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    /// EC curve name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,

    /// EC x coordinate (base64url).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// EC y coordinate (base64url).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// Key ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Intended use, `"sig"` for signing keys.
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm the key is meant for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

impl Jwk {
    /// Build a signing JWK from public key parameters.
    pub fn from_params(params: &PublicKeyParams, kid: &str, alg: Algorithm) -> Self {
        let base = Jwk {
            kty: String::new(),
            n: None,
            e: None,
            crv: None,
            x: None,
            y: None,
            kid: Some(kid.to_string()),
            key_use: Some("sig".to_string()),
            alg: Some(alg.as_str().to_string()),
        };
        match params {
            PublicKeyParams::Rsa { n, e } => Jwk {
                kty: "RSA".to_string(),
                n: Some(base64url::encode(n)),
                e: Some(base64url::encode(e)),
                ..base
            },
            PublicKeyParams::EcP256 { x, y } => Jwk {
                kty: "EC".to_string(),
                crv: Some("P-256".to_string()),
                x: Some(base64url::encode(x)),
                y: Some(base64url::encode(y)),
                ..base
            },
        }
    }

    /// Extract public key parameters usable with `alg`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyMaterial` when the key type does not match the
    /// algorithm family, the curve is not P-256, or a member is missing or
    /// not base64url.
    pub fn params_for(&self, alg: Algorithm) -> Result<PublicKeyParams, JwtForgeError> {
        let member = |name: &str, value: &Option<String>| -> Result<Vec<u8>, JwtForgeError> {
            let encoded = value.as_deref().ok_or_else(|| {
                JwtForgeError::invalid_key(alg.as_str(), format!("JWK is missing '{name}'"))
            })?;
            base64url::decode(encoded).map_err(|_| {
                JwtForgeError::invalid_key(alg.as_str(), format!("JWK '{name}' is not base64url"))
            })
        };

        match (alg.family(), self.kty.as_str()) {
            (KeyFamily::Rsa, "RSA") => Ok(PublicKeyParams::Rsa {
                n: member("n", &self.n)?,
                e: member("e", &self.e)?,
            }),
            (KeyFamily::EcP256, "EC") => {
                let crv = self.crv.as_deref().unwrap_or("(missing)");
                if crv != "P-256" {
                    return Err(JwtForgeError::invalid_key(
                        alg.as_str(),
                        format!("JWK curve '{crv}' is not P-256"),
                    ));
                }
                Ok(PublicKeyParams::EcP256 {
                    x: member("x", &self.x)?,
                    y: member("y", &self.y)?,
                })
            }
            (_, kty) => Err(JwtForgeError::invalid_key(
                alg.as_str(),
                format!("JWK of type '{kty}' cannot verify {alg}"),
            )),
        }
    }
}

/// A JSON Web Key Set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// Member keys.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// A set holding exactly one key.
    pub fn single(jwk: Jwk) -> Self {
        Self { keys: vec![jwk] }
    }

    /// Look up a key by `kid`.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

/// Parse key text that is either a JWK Set or a single JWK.
///
/// # Errors
///
/// Returns `InvalidKeyMaterial` if the text is neither.
pub fn parse_key_document(text: &str, alg: Algorithm) -> Result<JwkSet, JwtForgeError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        JwtForgeError::invalid_key(alg.as_str(), format!("key is not valid JSON: {e}"))
    })?;

    if value.get("keys").is_some() {
        serde_json::from_value(value).map_err(|e| {
            JwtForgeError::invalid_key(alg.as_str(), format!("malformed JWK Set: {e}"))
        })
    } else {
        let jwk = serde_json::from_value(value).map_err(|e| {
            JwtForgeError::invalid_key(alg.as_str(), format!("malformed JWK: {e}"))
        })?;
        Ok(JwkSet::single(jwk))
    }
}

/// Find the matching key in a set for the token's `kid`.
///
/// With a `kid`, the key carrying that `kid` is returned. Without one, the
/// sole key is used when the set holds exactly one key.
///
/// # Errors
///
/// Returns `InvalidKeyMaterial` when the set is empty, no key matches, or
/// the token has no `kid` and the set holds several keys.
pub fn find_matching_key<'a>(
    jwks: &'a JwkSet,
    kid: Option<&str>,
    alg: Algorithm,
) -> Result<&'a Jwk, JwtForgeError> {
    match (kid, jwks.keys.as_slice()) {
        (_, []) => Err(JwtForgeError::invalid_key(
            alg.as_str(),
            "JWK Set contains no keys",
        )),
        (Some(kid), _) => jwks.find(kid).ok_or_else(|| {
            JwtForgeError::invalid_key(
                alg.as_str(),
                format!("no key in JWK Set matches kid '{}'", sanitize_kid(kid)),
            )
        }),
        (None, [only]) => Ok(only),
        (None, _) => Err(JwtForgeError::invalid_key(
            alg.as_str(),
            "token has no kid and the JWK Set holds several keys",
        )),
    }
}

/// Sanitize a `kid` value for safe inclusion in error messages.
///
/// Replaces control characters (including ANSI escape sequences) with the
/// Unicode replacement character, then truncates to 128 bytes on a char
/// boundary.
pub fn sanitize_kid(kid: &str) -> String {
    let clean: String = kid
        .chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect();
    if clean.len() > KID_DISPLAY_LIMIT {
        let end = clean.floor_char_boundary(KID_DISPLAY_LIMIT);
        format!("{}...(truncated)", &clean[..end])
    } else {
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ec_jwk(kid: &str) -> Jwk {
        let params = PublicKeyParams::EcP256 {
            x: vec![1; 32],
            y: vec![2; 32],
        };
        Jwk::from_params(&params, kid, Algorithm::ES256)
    }

    #[test]
    fn test_rsa_jwk_serialization_shape() {
        let params = PublicKeyParams::Rsa {
            n: vec![0xde, 0xad],
            e: vec![1, 0, 1],
        };
        let jwk = Jwk::from_params(&params, "k1", Algorithm::RS256);
        let expected = json!({
            "kty": "RSA",
            "n": "3q0",
            "e": "AQAB",
            "kid": "k1",
            "use": "sig",
            "alg": "RS256",
        });
        assert_eq!(serde_json::to_value(&jwk).unwrap(), expected);
    }

    #[test]
    fn test_ec_jwk_carries_curve() {
        let value = serde_json::to_value(ec_jwk("k2")).unwrap();
        assert_eq!(value["kty"], "EC");
        assert_eq!(value["crv"], "P-256");
        assert_eq!(value["use"], "sig");
        assert!(value.get("n").is_none());
    }

    #[test]
    fn test_params_round_trip_through_jwk() {
        let params = PublicKeyParams::EcP256 {
            x: vec![1; 32],
            y: vec![2; 32],
        };
        let jwk = Jwk::from_params(&params, "k", Algorithm::ES256);
        assert_eq!(jwk.params_for(Algorithm::ES256).unwrap(), params);
    }

    #[test]
    fn test_params_reject_family_mismatch() {
        let err = ec_jwk("k").params_for(Algorithm::RS256).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("type 'EC' cannot verify RS256"));
    }

    #[test]
    fn test_params_reject_other_curves() {
        let mut jwk = ec_jwk("k");
        jwk.crv = Some("P-384".to_string());
        let err = jwk.params_for(Algorithm::ES256).unwrap_err();
        assert!(err.to_string().contains("P-384"));
    }

    #[test]
    fn test_parse_key_document_accepts_set_and_single() {
        let single = serde_json::to_string(&ec_jwk("a")).unwrap();
        let set = serde_json::to_string(&JwkSet::single(ec_jwk("b"))).unwrap();

        let parsed_single = parse_key_document(&single, Algorithm::ES256).unwrap();
        let parsed_set = parse_key_document(&set, Algorithm::ES256).unwrap();
        assert_eq!(parsed_single.keys[0].kid.as_deref(), Some("a"));
        assert_eq!(parsed_set.keys[0].kid.as_deref(), Some("b"));
    }

    #[test]
    fn test_parse_key_document_rejects_garbage() {
        assert!(parse_key_document("{not json", Algorithm::ES256).is_err());
        let bad_set = r#"{"keys": 5}"#;
        assert!(parse_key_document(bad_set, Algorithm::ES256).is_err());
    }

    #[test]
    fn test_find_matching_key_by_kid() {
        let set = JwkSet {
            keys: vec![ec_jwk("a"), ec_jwk("b")],
        };
        let found = find_matching_key(&set, Some("b"), Algorithm::ES256);
        assert_eq!(found.unwrap().kid.as_deref(), Some("b"));
    }

    #[test]
    fn test_find_matching_key_no_match() {
        let set = JwkSet::single(ec_jwk("a"));
        let result = find_matching_key(&set, Some("zzz"), Algorithm::ES256);
        assert!(result.unwrap_err().to_string().contains("kid 'zzz'"));
    }

    #[test]
    fn test_find_matching_key_no_kid_single_key() {
        let set = JwkSet::single(ec_jwk("a"));
        assert!(find_matching_key(&set, None, Algorithm::ES256).is_ok());
    }

    #[test]
    fn test_find_matching_key_no_kid_multiple_keys() {
        let set = JwkSet {
            keys: vec![ec_jwk("a"), ec_jwk("b")],
        };
        let result = find_matching_key(&set, None, Algorithm::ES256);
        assert!(result.unwrap_err().to_string().contains("several keys"));
    }

    #[test]
    fn test_find_matching_key_empty_set() {
        let set = JwkSet { keys: vec![] };
        let result = find_matching_key(&set, Some("a"), Algorithm::ES256);
        assert!(result.unwrap_err().to_string().contains("no keys"));
    }

    #[test]
    fn test_sanitize_kid_short() {
        assert_eq!(sanitize_kid("key-1"), "key-1");
    }

    #[test]
    fn test_sanitize_kid_long() {
        let long = "k".repeat(300);
        let out = sanitize_kid(&long);
        assert!(out.starts_with(&"k".repeat(128)));
        assert!(out.ends_with("...(truncated)"));
    }

    #[test]
    fn test_sanitize_kid_multibyte_utf8() {
        // 127 ASCII bytes followed by a 3-byte char straddling the limit
        let kid = format!("{}€tail", "a".repeat(127));
        let out = sanitize_kid(&kid);
        assert!(out.starts_with(&"a".repeat(127)));
        assert!(!out.contains('€'));
    }

    #[test]
    fn test_sanitize_kid_replaces_ansi_escapes() {
        let out = sanitize_kid("evil\x1b[31mred");
        assert!(!out.contains('\x1b'));
        assert!(out.contains('\u{FFFD}'));
    }
}
