//! Domain error types for jwt-forge.
//!
//! All business-logic errors are defined here using `thiserror`.
//! Decoding failures get their own type because they are an expected,
//! frequent outcome for pasted tokens; everything else is a
//! [`JwtForgeError`] that is converted to a user-facing message at the
//! CLI boundary.

use thiserror::Error;

/// Reasons a compact token cannot be split and parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The token does not have exactly three dot-separated segments.
    #[error("invalid token format: expected header.payload.signature, found {segments} segment(s)")]
    InvalidTokenFormat {
        /// How many segments the input actually had.
        segments: usize,
    },

    /// A segment is not valid base64url.
    #[error("failed to decode {segment}: invalid base64url encoding")]
    Base64DecodeError {
        /// Which segment failed to decode ("header", "payload", "signature").
        segment: &'static str,
    },

    /// A segment decoded to bytes that are not JSON.
    #[error("failed to parse {segment} as JSON: {reason}")]
    JsonParseError {
        /// Which segment failed to parse.
        segment: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A segment is valid JSON but not a JSON object.
    #[error("{segment} must be a JSON object")]
    NotAnObject {
        /// Which segment held the wrong JSON type.
        segment: &'static str,
    },
}

/// Errors that can occur during token engine and CLI operations.
#[derive(Debug, Error)]
pub enum JwtForgeError {
    /// The token could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The algorithm is unknown or deliberately not accepted for signing.
    #[error("unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm {
        /// The algorithm that was encountered.
        algorithm: String,
    },

    /// The key does not fit the algorithm, or could not be parsed.
    #[error("invalid key material for {algorithm}: {reason}")]
    InvalidKeyMaterial {
        /// The algorithm the key was meant for.
        algorithm: String,
        /// Description of the problem.
        reason: String,
    },

    /// The claim set could not be serialized into a JSON object.
    #[error("invalid payload: {reason}")]
    InvalidPayload {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The crypto provider could not produce a key pair.
    #[error("key generation failed: {reason}")]
    KeyGenerationFailed {
        /// Description of the provider failure.
        reason: String,
    },

    /// Failed to read the provided key file.
    #[error("failed to read key file '{path}': {reason}")]
    KeyFileError {
        /// Path to the key file.
        path: String,
        /// Description of the read failure.
        reason: String,
    },

    /// A JSON argument on the command line did not parse.
    #[error("invalid JSON for {argument}: {reason}")]
    InvalidJsonArgument {
        /// The flag that carried the JSON.
        argument: String,
        /// Parser message.
        reason: String,
    },

    /// Failed to parse a time-travel expression.
    #[error("invalid time expression '{expression}': {reason}")]
    InvalidTimeExpression {
        /// The time expression that failed to parse.
        expression: String,
        /// Description of the parsing failure.
        reason: String,
    },

    /// No token was provided via any input method.
    #[error("no token provided: pass a token as an argument, via --token-env, or through stdin")]
    NoTokenProvided,

    /// No key or secret was provided for an operation that needs one.
    #[error("no key provided: pass --secret, --secret-env, or --key-file")]
    NoKeyProvided,

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// An environment variable name that can never be set.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },

    /// Writing generated output failed.
    #[error("failed to write '{path}': {reason}")]
    OutputError {
        /// Destination path.
        path: String,
        /// Description of the write failure.
        reason: String,
    },
}

impl JwtForgeError {
    /// Shorthand for an [`JwtForgeError::InvalidKeyMaterial`] error.
    pub fn invalid_key(algorithm: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKeyMaterial {
            algorithm: algorithm.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`JwtForgeError::KeyGenerationFailed`] error.
    pub fn key_generation(reason: impl Into<String>) -> Self {
        Self::KeyGenerationFailed {
            reason: reason.into(),
        }
    }
}
