//! Signature schemes, one strategy per key family.
//!
//! A [`SignatureScheme`] knows how to interpret key text for its family
//! and how to sign or verify a signing input through a
//! [`CryptoProvider`]. [`scheme_for`] is the only dispatch point, so
//! supporting a new family means adding one implementation and one match
//! arm.

use subtle::ConstantTimeEq;
use tracing::debug;

use super::algorithm::{Algorithm, KeyFamily};
use super::crypto::{CryptoProvider, ProviderError};
use super::keys::{self, KeyMaterial};
use crate::error::JwtForgeError;

/// A signing/verification strategy for one key family.
pub trait SignatureScheme: Send + Sync {
    /// Parse key text for signing.
    fn signing_key(&self, alg: Algorithm, key: &str) -> Result<KeyMaterial, JwtForgeError>;

    /// Parse key text for verification. `kid` selects a key from a JWK Set.
    fn verification_key(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &str,
        kid: Option<&str>,
    ) -> Result<KeyMaterial, JwtForgeError>;

    /// Produce raw signature bytes over `input`.
    fn sign(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
    ) -> Result<Vec<u8>, JwtForgeError>;

    /// Check `signature` over `input`. `Ok(false)` is a mismatch.
    fn verify(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
        signature: &[u8],
    ) -> Result<bool, JwtForgeError>;
}

/// HMAC over a shared secret.
struct HmacScheme;

/// RSASSA-PKCS1-v1_5.
struct RsaPkcs1Scheme;

/// ECDSA on P-256.
struct EcdsaP256Scheme;

/// The strategy that handles `alg`.
pub fn scheme_for(alg: Algorithm) -> &'static dyn SignatureScheme {
    match alg.family() {
        KeyFamily::Hmac => &HmacScheme,
        KeyFamily::Rsa => &RsaPkcs1Scheme,
        KeyFamily::EcP256 => &EcdsaP256Scheme,
    }
}

fn provider_error(alg: Algorithm) -> impl Fn(ProviderError) -> JwtForgeError {
    move |e| JwtForgeError::invalid_key(alg.as_str(), e.0)
}

fn wrong_key(alg: Algorithm, key: &KeyMaterial, wanted: &str) -> JwtForgeError {
    JwtForgeError::invalid_key(
        alg.as_str(),
        format!("{} supplied where a {wanted} is required", key.kind()),
    )
}

impl SignatureScheme for HmacScheme {
    fn signing_key(&self, alg: Algorithm, key: &str) -> Result<KeyMaterial, JwtForgeError> {
        keys::hmac_secret(alg, key)
    }

    fn verification_key(
        &self,
        _provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &str,
        _kid: Option<&str>,
    ) -> Result<KeyMaterial, JwtForgeError> {
        keys::hmac_secret(alg, key)
    }

    fn sign(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
    ) -> Result<Vec<u8>, JwtForgeError> {
        let KeyMaterial::Secret(secret) = key else {
            return Err(wrong_key(alg, key, "shared secret"));
        };
        provider
            .hmac(alg.hash(), secret, input)
            .map_err(provider_error(alg))
    }

    fn verify(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
        signature: &[u8],
    ) -> Result<bool, JwtForgeError> {
        let expected = self.sign(provider, alg, key, input)?;
        Ok(expected.ct_eq(signature).into())
    }
}

impl SignatureScheme for RsaPkcs1Scheme {
    fn signing_key(&self, alg: Algorithm, key: &str) -> Result<KeyMaterial, JwtForgeError> {
        keys::private_key(alg, key)
    }

    fn verification_key(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &str,
        kid: Option<&str>,
    ) -> Result<KeyMaterial, JwtForgeError> {
        keys::public_key(provider, alg, key, kid)
    }

    fn sign(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
    ) -> Result<Vec<u8>, JwtForgeError> {
        let KeyMaterial::PrivateDer(der) = key else {
            return Err(wrong_key(alg, key, "private key"));
        };
        provider
            .rsa_sign(alg.hash(), der, input)
            .map_err(provider_error(alg))
    }

    fn verify(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
        signature: &[u8],
    ) -> Result<bool, JwtForgeError> {
        let KeyMaterial::PublicDer(der) = key else {
            return Err(wrong_key(alg, key, "public key"));
        };
        provider
            .rsa_verify(alg.hash(), der, input, signature)
            .map_err(provider_error(alg))
    }
}

impl SignatureScheme for EcdsaP256Scheme {
    fn signing_key(&self, alg: Algorithm, key: &str) -> Result<KeyMaterial, JwtForgeError> {
        keys::private_key(alg, key)
    }

    fn verification_key(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &str,
        kid: Option<&str>,
    ) -> Result<KeyMaterial, JwtForgeError> {
        keys::public_key(provider, alg, key, kid)
    }

    fn sign(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
    ) -> Result<Vec<u8>, JwtForgeError> {
        let KeyMaterial::PrivateDer(der) = key else {
            return Err(wrong_key(alg, key, "private key"));
        };
        provider
            .ecdsa_p256_sign(der, input)
            .map_err(provider_error(alg))
    }

    fn verify(
        &self,
        provider: &dyn CryptoProvider,
        alg: Algorithm,
        key: &KeyMaterial,
        input: &[u8],
        signature: &[u8],
    ) -> Result<bool, JwtForgeError> {
        let KeyMaterial::PublicDer(der) = key else {
            return Err(wrong_key(alg, key, "public key"));
        };
        debug!(alg = %alg, signature_len = signature.len(), "verifying ECDSA signature");
        provider
            .ecdsa_p256_verify(der, input, signature)
            .map_err(provider_error(alg))
    }
}
