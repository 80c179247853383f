//! Cryptographic capabilities consumed by the token engine.
//!
//! The engine never calls a primitive directly. It goes through a
//! [`CryptoProvider`] for HMAC, RSA, ECDSA and key generation, and a
//! [`RandomSource`] for entropy, so any standards-compliant backend can be
//! substituted. [`RustCryptoProvider`] and [`OsRandom`] are the defaults.
//!
//! Keys cross this boundary as DER: PKCS#8 for private keys and
//! SubjectPublicKeyInfo for public keys. PEM armor is handled by the
//! caller.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{
    DecodePrivateKey as _, DecodePublicKey as _, EncodePrivateKey as _, EncodePublicKey as _,
};
use rand::{CryptoRng, RngCore};
use rsa::pkcs1v15::{
    Signature as RsaSignature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey,
};
use rsa::signature::SignatureEncoding;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::algorithm::HashAlg;

/// Failure inside a provider primitive.
///
/// The engine attaches algorithm context when it turns this into a
/// [`crate::JwtForgeError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    fn new(context: &str, err: impl std::fmt::Display) -> Self {
        Self(format!("{context}: {err}"))
    }
}

/// Public key parameters as published in a JWK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyParams {
    /// RSA modulus and exponent, big-endian.
    Rsa {
        /// Modulus.
        n: Vec<u8>,
        /// Public exponent.
        e: Vec<u8>,
    },
    /// P-256 affine coordinates, 32 bytes each.
    EcP256 {
        /// X coordinate.
        x: Vec<u8>,
        /// Y coordinate.
        y: Vec<u8>,
    },
}

/// A freshly generated key pair in DER form.
pub struct KeyPairDer {
    /// PKCS#8 private key.
    pub private_der: Zeroizing<Vec<u8>>,
    /// SubjectPublicKeyInfo public key.
    pub public_der: Vec<u8>,
    /// Parameters for the public JWK.
    pub params: PublicKeyParams,
}

/// Source of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Operating-system entropy via `rand::rngs::OsRng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(dest);
    }
}

/// Platform cryptography required by the engine.
pub trait CryptoProvider: Send + Sync {
    /// Compute an HMAC tag.
    fn hmac(&self, hash: HashAlg, key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError>;

    /// RSASSA-PKCS1-v1_5 signature with a PKCS#8 private key.
    fn rsa_sign(
        &self,
        hash: HashAlg,
        private_der: &[u8],
        data: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;

    /// Verify an RSASSA-PKCS1-v1_5 signature with an SPKI public key.
    ///
    /// `Ok(false)` means the signature does not match; `Err` means the
    /// key itself is unusable.
    fn rsa_verify(
        &self,
        hash: HashAlg,
        public_der: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, ProviderError>;

    /// ECDSA P-256/SHA-256 signature in fixed `r || s` form.
    fn ecdsa_p256_sign(&self, private_der: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError>;

    /// Verify a fixed-size ECDSA P-256/SHA-256 signature.
    fn ecdsa_p256_verify(
        &self,
        public_der: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, ProviderError>;

    /// Generate an RSA key pair of `bits` modulus length.
    fn generate_rsa(
        &self,
        bits: usize,
        rng: &dyn RandomSource,
    ) -> Result<KeyPairDer, ProviderError>;

    /// Generate a P-256 key pair.
    fn generate_p256(&self, rng: &dyn RandomSource) -> Result<KeyPairDer, ProviderError>;

    /// Build an SPKI public key from JWK parameters.
    fn public_key_from_params(&self, params: &PublicKeyParams) -> Result<Vec<u8>, ProviderError>;
}

/// Adapts a [`RandomSource`] to the `rand_core` traits the RustCrypto
/// crates expect.
struct RngBridge<'a>(&'a dyn RandomSource);

impl RngCore for RngBridge<'_> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.0.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.0.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for RngBridge<'_> {}

/// Provider backed by the RustCrypto `hmac`, `rsa` and `p256` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

fn hmac_tag<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|e| ProviderError::new("invalid HMAC key", e))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn rsa_private(private_der: &[u8]) -> Result<RsaPrivateKey, ProviderError> {
    RsaPrivateKey::from_pkcs8_der(private_der)
        .map_err(|e| ProviderError::new("not an RSA PKCS#8 private key", e))
}

fn rsa_public(public_der: &[u8]) -> Result<RsaPublicKey, ProviderError> {
    RsaPublicKey::from_public_key_der(public_der)
        .map_err(|e| ProviderError::new("not an RSA public key", e))
}

impl CryptoProvider for RustCryptoProvider {
    fn hmac(&self, hash: HashAlg, key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        match hash {
            HashAlg::Sha256 => hmac_tag::<Hmac<Sha256>>(key, data),
            HashAlg::Sha384 => hmac_tag::<Hmac<Sha384>>(key, data),
            HashAlg::Sha512 => hmac_tag::<Hmac<Sha512>>(key, data),
        }
    }

    fn rsa_sign(
        &self,
        hash: HashAlg,
        private_der: &[u8],
        data: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        let key = rsa_private(private_der)?;
        let signature = match hash {
            HashAlg::Sha256 => RsaSigningKey::<Sha256>::new(key).try_sign(data),
            HashAlg::Sha384 => RsaSigningKey::<Sha384>::new(key).try_sign(data),
            HashAlg::Sha512 => RsaSigningKey::<Sha512>::new(key).try_sign(data),
        }
        .map_err(|e| ProviderError::new("RSA signing failed", e))?;
        Ok(signature.to_vec())
    }

    fn rsa_verify(
        &self,
        hash: HashAlg,
        public_der: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, ProviderError> {
        let key = rsa_public(public_der)?;
        let Ok(sig) = RsaSignature::try_from(signature) else {
            return Ok(false);
        };
        let verified = match hash {
            HashAlg::Sha256 => RsaVerifyingKey::<Sha256>::new(key).verify(data, &sig),
            HashAlg::Sha384 => RsaVerifyingKey::<Sha384>::new(key).verify(data, &sig),
            HashAlg::Sha512 => RsaVerifyingKey::<Sha512>::new(key).verify(data, &sig),
        };
        Ok(verified.is_ok())
    }

    fn ecdsa_p256_sign(&self, private_der: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let key = p256::ecdsa::SigningKey::from_pkcs8_der(private_der)
            .map_err(|e| ProviderError::new("not a P-256 PKCS#8 private key", e))?;
        let signature: p256::ecdsa::Signature = key
            .try_sign(data)
            .map_err(|e| ProviderError::new("ECDSA signing failed", e))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn ecdsa_p256_verify(
        &self,
        public_der: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, ProviderError> {
        let key = p256::ecdsa::VerifyingKey::from_public_key_der(public_der)
            .map_err(|e| ProviderError::new("not a P-256 public key", e))?;
        let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(key.verify(data, &signature).is_ok())
    }

    fn generate_rsa(
        &self,
        bits: usize,
        rng: &dyn RandomSource,
    ) -> Result<KeyPairDer, ProviderError> {
        let private_key = RsaPrivateKey::new(&mut RngBridge(rng), bits)
            .map_err(|e| ProviderError::new("RSA key generation failed", e))?;
        let public_key = private_key.to_public_key();

        let private_der = private_key
            .to_pkcs8_der()
            .map_err(|e| ProviderError::new("private key encoding failed", e))?;
        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| ProviderError::new("public key encoding failed", e))?;

        Ok(KeyPairDer {
            private_der: Zeroizing::new(private_der.as_bytes().to_vec()),
            public_der: public_der.as_bytes().to_vec(),
            params: PublicKeyParams::Rsa {
                n: public_key.n().to_bytes_be(),
                e: public_key.e().to_bytes_be(),
            },
        })
    }

    fn generate_p256(&self, rng: &dyn RandomSource) -> Result<KeyPairDer, ProviderError> {
        let secret_key = p256::SecretKey::random(&mut RngBridge(rng));
        let public_key = secret_key.public_key();

        let private_der = secret_key
            .to_pkcs8_der()
            .map_err(|e| ProviderError::new("private key encoding failed", e))?;
        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| ProviderError::new("public key encoding failed", e))?;

        let point = public_key.to_encoded_point(false);
        let (Some(x), Some(y)) = (point.x(), point.y()) else {
            return Err(ProviderError(
                "generated point has no affine coordinates".to_string(),
            ));
        };

        Ok(KeyPairDer {
            private_der: Zeroizing::new(private_der.as_bytes().to_vec()),
            public_der: public_der.as_bytes().to_vec(),
            params: PublicKeyParams::EcP256 {
                x: x.to_vec(),
                y: y.to_vec(),
            },
        })
    }

    fn public_key_from_params(&self, params: &PublicKeyParams) -> Result<Vec<u8>, ProviderError> {
        let document = match params {
            PublicKeyParams::Rsa { n, e } => {
                RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
                    .map_err(|err| ProviderError::new("invalid RSA parameters", err))?
                    .to_public_key_der()
            }
            PublicKeyParams::EcP256 { x, y } => {
                if x.len() != 32 || y.len() != 32 {
                    return Err(ProviderError(
                        "P-256 coordinates must be 32 bytes each".to_string(),
                    ));
                }
                let mut sec1 = Vec::with_capacity(65);
                sec1.push(0x04);
                sec1.extend_from_slice(x);
                sec1.extend_from_slice(y);
                p256::PublicKey::from_sec1_bytes(&sec1)
                    .map_err(|e| ProviderError::new("point is not on P-256", e))?
                    .to_public_key_der()
            }
        }
        .map_err(|e| ProviderError::new("public key encoding failed", e))?;
        Ok(document.as_bytes().to_vec())
    }
}
