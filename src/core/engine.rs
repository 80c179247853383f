//! The token engine: signing, decoding, verification and key generation
//! behind one value that owns its crypto backend and randomness.

use serde::Serialize;
use serde_json::{Map, Value};

use super::crypto::{CryptoProvider, OsRandom, RandomSource, RustCryptoProvider};
use super::decoder::{self, DecodedToken};
use super::encoder;
use super::keygen::{self, GeneratedKeyPair, KeySpec};
use super::validator::{self, ValidationOutcome, VerifyOptions};
use crate::error::{DecodeError, JwtForgeError};

/// Token operations over a pluggable [`CryptoProvider`] and
/// [`RandomSource`].
///
/// `TokenEngine::default()` uses the RustCrypto backend and the operating
/// system's CSPRNG. Tests inject deterministic sources through
/// [`TokenEngine::new`].
#[derive(Debug, Clone)]
pub struct TokenEngine<P = RustCryptoProvider, R = OsRandom> {
    provider: P,
    random: R,
}

impl Default for TokenEngine {
    fn default() -> Self {
        Self::new(RustCryptoProvider, OsRandom)
    }
}

impl<P: CryptoProvider, R: RandomSource> TokenEngine<P, R> {
    /// Build an engine over explicit backends.
    pub fn new(provider: P, random: R) -> Self {
        Self { provider, random }
    }

    /// The crypto backend in use.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sign `payload` and return a compact JWS.
    ///
    /// See [`encoder::encode_token`] for the error cases.
    pub fn sign<T: Serialize + ?Sized>(
        &self,
        header: &Map<String, Value>,
        payload: &T,
        key: &str,
    ) -> Result<String, JwtForgeError> {
        encoder::encode_token(&self.provider, header, payload, key)
    }

    /// Split and parse a token without checking its signature.
    pub fn decode(&self, token: &str) -> Result<DecodedToken, DecodeError> {
        decoder::decode_token(token)
    }

    /// Check signature and registered claims.
    ///
    /// See [`validator::verify_token`] for the error cases.
    pub fn verify(
        &self,
        token: &str,
        key: &str,
        options: &VerifyOptions,
    ) -> Result<ValidationOutcome, JwtForgeError> {
        validator::verify_token(&self.provider, token, key, options)
    }

    /// Generate an asymmetric key pair.
    pub fn generate_key_pair(&self, spec: KeySpec) -> Result<GeneratedKeyPair, JwtForgeError> {
        keygen::generate_key_pair(&self.provider, &self.random, spec)
    }
}
