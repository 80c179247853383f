//! Asymmetric key pair generation.
//!
//! A generated pair is returned three ways: PKCS#8 private PEM, SPKI public
//! PEM, and a one-entry JWK Set carrying a random hex key id.

use std::fmt;

use tracing::info;
use zeroize::Zeroizing;

use super::algorithm::Algorithm;
use super::crypto::{CryptoProvider, RandomSource};
use super::jwks::{Jwk, JwkSet};
use super::pem::{self, PemLabel};
use crate::error::JwtForgeError;

/// RSA modulus sizes accepted for generation.
pub const RSA_KEY_SIZES: [usize; 2] = [2048, 4096];

/// Random bytes in a generated key id.
const KEY_ID_BYTES: usize = 8;

/// What kind of key pair to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    /// RSA with the given modulus size, for RS256.
    Rsa {
        /// Modulus size in bits.
        bits: usize,
    },
    /// P-256, for ES256.
    Ec,
}

impl KeySpec {
    /// The algorithm advertised in the generated JWK.
    pub fn algorithm(self) -> Algorithm {
        match self {
            Self::Rsa { .. } => Algorithm::RS256,
            Self::Ec => Algorithm::ES256,
        }
    }
}

/// A freshly generated key pair.
pub struct GeneratedKeyPair {
    /// Random hex identifier, also the JWK's `kid`.
    pub key_id: String,
    /// Algorithm the pair is meant for.
    pub algorithm: Algorithm,
    /// `PUBLIC KEY` PEM.
    pub public_key: String,
    /// `PRIVATE KEY` PEM.
    pub private_key: Zeroizing<String>,
    /// JWK Set holding the public key.
    pub key_set: JwkSet,
}

impl fmt::Debug for GeneratedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKeyPair")
            .field("key_id", &self.key_id)
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a key pair for `spec`.
///
/// # Errors
///
/// Returns [`JwtForgeError::KeyGenerationFailed`] for an RSA size other
/// than 2048 or 4096, or when the provider fails.
pub fn generate_key_pair(
    provider: &dyn CryptoProvider,
    random: &dyn RandomSource,
    spec: KeySpec,
) -> Result<GeneratedKeyPair, JwtForgeError> {
    let der = match spec {
        KeySpec::Rsa { bits } if !RSA_KEY_SIZES.contains(&bits) => {
            return Err(JwtForgeError::key_generation(format!(
                "unsupported RSA key size {bits} (expected 2048 or 4096)"
            )));
        }
        KeySpec::Rsa { bits } => provider.generate_rsa(bits, random),
        KeySpec::Ec => provider.generate_p256(random),
    }
    .map_err(|e| JwtForgeError::key_generation(e.0))?;

    let algorithm = spec.algorithm();
    let key_id = generate_key_id(random);
    info!(kid = %key_id, alg = %algorithm, "generated key pair");

    Ok(GeneratedKeyPair {
        public_key: pem::encode(PemLabel::PublicKey, &der.public_der),
        private_key: Zeroizing::new(pem::encode(PemLabel::PrivateKey, &der.private_der)),
        key_set: JwkSet::single(Jwk::from_params(&der.params, &key_id, algorithm)),
        key_id,
        algorithm,
    })
}

fn generate_key_id(random: &dyn RandomSource) -> String {
    let mut bytes = [0u8; KEY_ID_BYTES];
    random.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
