//! Error handling.

use std::{error, fmt};

use crate::jwa::SignatureAlgorithm;

/// Errors that may occur while parsing a JWS message or a JWK document.
#[derive(Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Compact serialization does not consist of exactly three base64url
    /// segments separated by periods.
    MalformedCompact,
    /// JSON serialization cannot be decoded.
    MalformedJson(serde_json::Error),
    /// JSON serialization carries both a top-level `signature` member and a
    /// non-empty `signatures` array.
    MixedSerialization,
    /// A base64url segment contains padding or bytes outside the URL-safe
    /// alphabet.
    MalformedBase64(base64ct::Error),
    /// A decoded protected header is not a valid JOSE header object.
    MalformedHeader(serde_json::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedCompact => {
                formatter.write_str("invalid compact serialization structure")
            }
            Self::MalformedJson(e) => write!(formatter, "malformed JSON serialization: {e}"),
            Self::MixedSerialization => {
                formatter.write_str("mixed flattened / general JSON serialization")
            }
            Self::MalformedBase64(e) => write!(formatter, "base64url decoding error: {e}"),
            Self::MalformedHeader(e) => write!(formatter, "malformed protected header: {e}"),
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::MalformedJson(e) | Self::MalformedHeader(e) => Some(e),
            Self::MalformedBase64(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors produced when interpreting key material: the algorithm registry,
/// JWK parsing / materialization and key generation.
#[derive(Debug)]
#[non_exhaustive]
pub enum KeyError {
    /// Signature algorithm name is not registered.
    UnknownAlgorithm(String),
    /// Elliptic curve name is not registered.
    UnknownCurve(String),
    /// Key type (`kty`) is not registered.
    UnknownKeyType(String),
    /// Algorithm is registered but cannot be used in this position
    /// (e.g., `none` passed to a signer factory).
    UnsupportedAlgorithm(SignatureAlgorithm),
    /// Key material does not fit the requested algorithm or conversion.
    IncompatibleKey(&'static str),
    /// Operation requires the private part of the key, which is absent.
    MissingPrivateKey,
    /// Operation requires the public part of the key, which is absent.
    MissingPublicKey,
    /// Template merge attempted to overwrite a reserved JWK member.
    ReservedField(String),
    /// PEM block carries a label this crate does not recognize.
    UnrecognizedPem(String),
    /// Opaque error bubbled up from a cryptographic backend.
    Custom(anyhow::Error),
}

impl KeyError {
    /// Creates a `Custom` error variant.
    pub fn custom(err: impl Into<anyhow::Error>) -> Self {
        Self::Custom(err.into())
    }
}

impl fmt::Display for KeyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAlgorithm(name) => {
                write!(formatter, "unknown signature algorithm: {name}")
            }
            Self::UnknownCurve(name) => write!(formatter, "unknown elliptic curve: {name}"),
            Self::UnknownKeyType(name) => write!(formatter, "unknown key type: {name}"),
            Self::UnsupportedAlgorithm(alg) => {
                write!(formatter, "algorithm {alg} is not supported in this position")
            }
            Self::IncompatibleKey(what) => {
                write!(formatter, "incompatible key material: {what}")
            }
            Self::MissingPrivateKey => formatter.write_str("private key is required"),
            Self::MissingPublicKey => formatter.write_str("public key is required"),
            Self::ReservedField(field) => {
                write!(formatter, "cannot overwrite reserved JWK member `{field}`")
            }
            Self::UnrecognizedPem(label) => {
                write!(formatter, "unrecognized PEM label: {label}")
            }
            Self::Custom(e) => fmt::Display::fmt(e, formatter),
        }
    }
}

impl error::Error for KeyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Custom(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Errors that can occur while creating a signed message.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignError {
    /// No signers were supplied.
    NoSigners,
    /// Compact serialization admits exactly one signature.
    TooManySignatures(usize),
    /// Header cannot be serialized to JSON.
    Header(serde_json::Error),
    /// Protected and unprotected headers of one signature share a member.
    OverlappingHeader(String),
    /// Compact serialization has no place for an unprotected header.
    UnprotectedHeader,
    /// Key-related failure (e.g., an RSA blinding error).
    Key(KeyError),
}

impl fmt::Display for SignError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSigners => formatter.write_str("no signers provided"),
            Self::TooManySignatures(count) => write!(
                formatter,
                "compact serialization requires exactly one signature, got {count}"
            ),
            Self::Header(e) => write!(formatter, "cannot serialize header: {e}"),
            Self::OverlappingHeader(name) => write!(
                formatter,
                "member `{name}` present in both protected and unprotected headers"
            ),
            Self::UnprotectedHeader => formatter
                .write_str("compact serialization cannot carry an unprotected header"),
            Self::Key(e) => write!(formatter, "signing key failure: {e}"),
        }
    }
}

impl error::Error for SignError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Header(e) => Some(e),
            Self::Key(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KeyError> for SignError {
    fn from(error: KeyError) -> Self {
        Self::Key(error)
    }
}

/// Errors that can occur during message verification.
///
/// Failure messages intentionally carry nothing derived from the inputs
/// beyond sizes, so they cannot leak timing-sensitive internal state.
#[derive(Debug)]
#[non_exhaustive]
pub enum VerifyError {
    /// No signature in the message validates against the supplied key.
    InvalidSignature,
    /// An ECDSA signature does not have the fixed width mandated by its
    /// curve.
    InvalidSignatureSize {
        /// Required signature length in bytes.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// None of the keys in a JWK set verified the message.
    NoMatchingKey,
    /// Message could not be parsed in the first place.
    Parse(ParseError),
    /// Key material could not be interpreted.
    Key(KeyError),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature => formatter.write_str("signature has failed verification"),
            Self::InvalidSignatureSize { expected, actual } => write!(
                formatter,
                "invalid signature size: expected {expected} bytes, got {actual}"
            ),
            Self::NoMatchingKey => {
                formatter.write_str("could not verify with any of the keys in the set")
            }
            Self::Parse(e) => write!(formatter, "cannot parse message: {e}"),
            Self::Key(e) => write!(formatter, "cannot interpret key: {e}"),
        }
    }
}

impl error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Key(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for VerifyError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<KeyError> for VerifyError {
    fn from(error: KeyError) -> Self {
        Self::Key(error)
    }
}
