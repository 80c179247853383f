//! Resolution of user-supplied key text into key material.
//!
//! Keys arrive as plain strings: a shared secret for HMAC, a PEM block for
//! RSA/EC, or (for verification only) a JWK / JWK Set document.

use std::fmt;

use zeroize::Zeroizing;

use super::algorithm::Algorithm;
use super::crypto::CryptoProvider;
use super::jwks;
use super::pem::{self, PemLabel};
use crate::error::JwtForgeError;

/// Key material ready for a signature scheme.
pub enum KeyMaterial {
    /// Raw HMAC key bytes.
    Secret(Zeroizing<Vec<u8>>),
    /// PKCS#8 private key.
    PrivateDer(Zeroizing<Vec<u8>>),
    /// SubjectPublicKeyInfo public key.
    PublicDer(Vec<u8>),
}

impl KeyMaterial {
    /// Short description of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Secret(_) => "shared secret",
            Self::PrivateDer(_) => "private key",
            Self::PublicDer(_) => "public key",
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyMaterial").field(&self.kind()).finish()
    }
}

/// Interpret `key` as an HMAC secret.
///
/// The key's UTF-8 bytes are used verbatim. A PEM block is refused so a
/// published public key can never be used as a MAC secret.
pub fn hmac_secret(alg: Algorithm, key: &str) -> Result<KeyMaterial, JwtForgeError> {
    if pem::is_pem(key) {
        return Err(JwtForgeError::invalid_key(
            alg.as_str(),
            "a PEM key was supplied for an HMAC algorithm; HMAC takes a shared secret",
        ));
    }
    Ok(KeyMaterial::Secret(Zeroizing::new(key.as_bytes().to_vec())))
}

/// Interpret `key` as a PKCS#8 `PRIVATE KEY` PEM block.
pub fn private_key(alg: Algorithm, key: &str) -> Result<KeyMaterial, JwtForgeError> {
    pem::decode_expecting(key, PemLabel::PrivateKey)
        .map(KeyMaterial::PrivateDer)
        .map_err(|e| JwtForgeError::invalid_key(alg.as_str(), e.to_string()))
}

/// Interpret `key` as a public key: a `PUBLIC KEY` PEM block, a JWK, or a
/// JWK Set from which the entry matching `kid` is taken.
pub fn public_key(
    provider: &dyn CryptoProvider,
    alg: Algorithm,
    key: &str,
    kid: Option<&str>,
) -> Result<KeyMaterial, JwtForgeError> {
    if key.trim_start().starts_with('{') {
        let set = jwks::parse_key_document(key, alg)?;
        let jwk = jwks::find_matching_key(&set, kid, alg)?;
        let params = jwk.params_for(alg)?;
        let der = provider
            .public_key_from_params(&params)
            .map_err(|e| JwtForgeError::invalid_key(alg.as_str(), e.to_string()))?;
        return Ok(KeyMaterial::PublicDer(der));
    }

    pem::decode_expecting(key, PemLabel::PublicKey)
        .map(|der| KeyMaterial::PublicDer(der.to_vec()))
        .map_err(|e| JwtForgeError::invalid_key(alg.as_str(), e.to_string()))
}
