//! Base64url codec shared by the token and key modules.
//!
//! Encoding always emits the unpadded URL-safe alphabet. Decoding accepts
//! input with or without `=` padding, since hand-built tokens frequently
//! carry it.

use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};

/// URL-safe engine that tolerates optional padding on decode.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url, with or without trailing padding.
///
/// Non-canonical trailing bits are rejected so that every distinct
/// string maps to distinct bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_LENIENT.decode(encoded)
}
