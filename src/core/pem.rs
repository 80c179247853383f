//! PEM armor for DER key material.
//!
//! Only the two labels the engine exchanges are recognized:
//! `PRIVATE KEY` (PKCS#8) and `PUBLIC KEY` (SubjectPublicKeyInfo).
//! Bodies are standard base64 wrapped at 64 columns.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

/// Body line width mandated by RFC 7468.
const LINE_WIDTH: usize = 64;

/// The label between `-----BEGIN ` and `-----`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemLabel {
    /// PKCS#8 private key.
    PrivateKey,
    /// SubjectPublicKeyInfo public key.
    PublicKey,
}

impl PemLabel {
    fn as_str(self) -> &'static str {
        match self {
            Self::PrivateKey => "PRIVATE KEY",
            Self::PublicKey => "PUBLIC KEY",
        }
    }
}

impl fmt::Display for PemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a PEM block could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PemError {
    /// No `-----BEGIN ...-----` line was found.
    MissingHeader,
    /// The block's label is not one the engine accepts.
    UnknownLabel(String),
    /// The block's label is valid but not the one required.
    WrongLabel {
        /// Label the caller required.
        expected: PemLabel,
        /// Label the block carries.
        found: PemLabel,
    },
    /// No matching `-----END ...-----` line.
    MissingFooter,
    /// The body is not valid base64.
    InvalidBody,
}

impl fmt::Display for PemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => f.write_str("no PEM '-----BEGIN' line found"),
            Self::UnknownLabel(label) => write!(
                f,
                "unsupported PEM label '{label}' (expected PRIVATE KEY or PUBLIC KEY)"
            ),
            Self::WrongLabel { expected, found } => {
                write!(f, "expected a {expected} block, found {found}")
            }
            Self::MissingFooter => f.write_str("PEM block is missing its '-----END' line"),
            Self::InvalidBody => f.write_str("PEM body is not valid base64"),
        }
    }
}

/// Returns `true` when `text` looks like PEM armor.
pub fn is_pem(text: &str) -> bool {
    text.trim_start().starts_with("-----BEGIN ")
}

/// Armor DER bytes.
pub fn encode(label: PemLabel, der: &[u8]) -> String {
    let body = STANDARD.encode(der);
    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 64);
    out.push_str(&format!("-----BEGIN {label}-----\n"));
    // base64 output is ASCII, so byte chunks are char boundaries
    for line in body.as_bytes().chunks(LINE_WIDTH) {
        out.push_str(std::str::from_utf8(line).unwrap_or_default());
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

/// Read the first PEM block in `text`, returning its label and DER body.
///
/// Leading text before the header and whitespace inside the body are
/// ignored.
pub fn decode(text: &str) -> Result<(PemLabel, Zeroizing<Vec<u8>>), PemError> {
    let mut lines = text.lines().map(str::trim);

    let label = lines
        .by_ref()
        .find_map(begin_label)
        .ok_or(PemError::MissingHeader)?;

    let parsed = match label {
        "PRIVATE KEY" => PemLabel::PrivateKey,
        "PUBLIC KEY" => PemLabel::PublicKey,
        other => return Err(PemError::UnknownLabel(other.to_string())),
    };

    let footer = format!("-----END {label}-----");
    let mut body = Zeroizing::new(String::new());
    let mut closed = false;
    for line in lines {
        if line == footer {
            closed = true;
            break;
        }
        body.extend(line.chars().filter(|c| !c.is_whitespace()));
    }
    if !closed {
        return Err(PemError::MissingFooter);
    }

    let der = STANDARD
        .decode(body.as_bytes())
        .map_err(|_| PemError::InvalidBody)?;
    Ok((parsed, Zeroizing::new(der)))
}

fn begin_label(line: &str) -> Option<&str> {
    line.strip_prefix("-----BEGIN ")?.strip_suffix("-----")
}

/// Read a PEM block and require a specific label.
pub fn decode_expecting(text: &str, expected: PemLabel) -> Result<Zeroizing<Vec<u8>>, PemError> {
    let (found, der) = decode(text)?;
    if found != expected {
        return Err(PemError::WrongLabel { expected, found });
    }
    Ok(der)
}
