//! Core business logic for JWT operations.
//!
//! This module contains the domain logic separated from CLI concerns.
//! All types and functions here are testable without the CLI layer.

pub mod algorithm;
pub mod base64url;
pub mod claims;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod engine;
pub mod jwks;
pub mod keygen;
pub mod keys;
pub mod pem;
pub mod signer;
pub mod time_travel;
pub mod validator;
