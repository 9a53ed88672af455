//! Strict base64url codec used for every header / payload / signature
//! transition in the crate.
//!
//! This is RFC 4648 §5 *without* padding. [`base64ct`] rejects `+`, `/`, `=`
//! and any other non-alphabet byte by construction, which is exactly the
//! strictness JWS requires; no other base64 variant is accepted anywhere.

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::error::ParseError;

/// Encodes `input` as unpadded base64url.
pub fn encode(input: impl AsRef<[u8]>) -> String {
    Base64UrlUnpadded::encode_string(input.as_ref())
}

/// Decodes unpadded base64url `input`.
///
/// # Errors
///
/// Returns [`ParseError::MalformedBase64`] if `input` contains padding or
/// any byte outside the URL-safe alphabet.
pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, ParseError> {
    let input = core::str::from_utf8(input.as_ref()).map_err(|_| {
        ParseError::MalformedBase64(base64ct::Error::InvalidEncoding)
    })?;
    Base64UrlUnpadded::decode_vec(input).map_err(ParseError::MalformedBase64)
}
