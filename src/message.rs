//! JWS message codec: headers, the in-memory [`Message`] form, and the
//! compact / JSON (general and flattened) serializations.
//!
//! The protected header of every signature keeps its original wire encoding
//! after parsing. JSON re-encoding is not canonical, so the signing input is
//! always reassembled from those wire bytes and never from a re-serialized
//! header.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use std::str;

use crate::{
    alg::Signer,
    base64url,
    error::{ParseError, SignError},
    jwa::SignatureAlgorithm,
    jwk::JsonWebKey,
};

/// Maximum "reasonable" signature size in bytes.
const SIGNATURE_SIZE: usize = 128;

/// JOSE header.
///
/// See [RFC 7515](https://tools.ietf.org/html/rfc7515#section-4.1) for the
/// registered members. Fields whose values identify the verification key
/// (`kid`, `jku`, `jwk`) are attacker-controlled on the verify path and need
/// out-of-band validation before use. Members not known to this crate are
/// preserved in [`Self::other_fields`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Header {
    /// Signature algorithm (`alg`). Filled automatically on the sign path;
    /// defaulted to `none` when absent from a parsed protected header.
    #[serde(rename = "alg", default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<SignatureAlgorithm>,

    /// Identifier of the signing key (`kid`).
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// URL of the JWK set containing the signing key (`jku`).
    #[serde(rename = "jku", default, skip_serializing_if = "Option::is_none")]
    pub key_set_url: Option<String>,

    /// Public JWK of the signing key, embedded in the header (`jwk`).
    #[serde(rename = "jwk", default, skip_serializing_if = "Option::is_none")]
    pub json_web_key: Option<JsonWebKey>,

    /// Media type of the complete JWS (`typ`).
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Media type of the payload (`cty`).
    #[serde(rename = "cty", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Critical extension members (`crit`).
    #[serde(rename = "crit", default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<Vec<String>>,

    /// Caller-defined members.
    #[serde(flatten)]
    pub other_fields: Map<String, Value>,
}

impl Header {
    /// Creates a header with no fields set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the `kid` member.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Sets the `typ` member.
    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Sets a caller-defined member.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.other_fields.insert(name.into(), value);
        self
    }

    fn is_empty(&self) -> bool {
        self.algorithm.is_none()
            && self.key_id.is_none()
            && self.key_set_url.is_none()
            && self.json_web_key.is_none()
            && self.token_type.is_none()
            && self.content_type.is_none()
            && self.critical.is_none()
            && self.other_fields.is_empty()
    }

    fn member_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if self.algorithm.is_some() {
            names.push("alg");
        }
        if self.key_id.is_some() {
            names.push("kid");
        }
        if self.key_set_url.is_some() {
            names.push("jku");
        }
        if self.json_web_key.is_some() {
            names.push("jwk");
        }
        if self.token_type.is_some() {
            names.push("typ");
        }
        if self.content_type.is_some() {
            names.push("cty");
        }
        if self.critical.is_some() {
            names.push("crit");
        }
        names.extend(self.other_fields.keys().map(String::as_str));
        names
    }
}

/// Protected header of one signature: the decoded view plus the exact wire
/// segment it was decoded from (or encoded to).
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectedHeader {
    encoded: String,
    header: Header,
}

impl ProtectedHeader {
    fn from_header(header: Header) -> Result<Self, SignError> {
        let json = serde_json::to_vec(&header).map_err(SignError::Header)?;
        Ok(Self {
            encoded: base64url::encode(json),
            header,
        })
    }

    fn from_encoded(encoded: String) -> Result<Self, ParseError> {
        let mut header = if encoded.is_empty() {
            Header::empty()
        } else {
            let json = base64url::decode(&encoded)?;
            serde_json::from_slice(&json).map_err(ParseError::MalformedHeader)?
        };
        // Downstream code sees a uniform shape; whether `none` is acceptable
        // is decided at verify time.
        header.algorithm.get_or_insert(SignatureAlgorithm::None);
        Ok(Self { encoded, header })
    }

    /// Returns the decoded header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the base64url wire segment this header travels as.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

/// One signature over the message payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureEntry {
    /// Authenticated header.
    pub protected: ProtectedHeader,
    /// Unprotected header, transported only in the JSON serialization.
    pub header: Header,
    signature: SmallVec<[u8; SIGNATURE_SIZE]>,
}

impl SignatureEntry {
    /// Raw signature bytes. These are **not** guaranteed to form a valid
    /// signature.
    pub fn signature_bytes(&self) -> &[u8] {
        &self.signature
    }
}

/// Serialization-agnostic JWS message: an opaque payload plus an ordered,
/// non-empty sequence of signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    payload: Vec<u8>,
    payload_b64: String,
    signatures: Vec<SignatureEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

/// Overlay accepting the general and flattened JSON shapes simultaneously;
/// which one was present is decided after decoding.
#[derive(Debug, Deserialize)]
struct WireMessage {
    payload: String,
    #[serde(default)]
    signatures: Vec<WireSignature>,
    #[serde(flatten)]
    flattened: WireSignature,
}

impl Message {
    /// Returns the decoded payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the signatures, in wire order.
    pub fn signatures(&self) -> &[SignatureEntry] {
        &self.signatures
    }

    /// The exact bytes a signature over this message is computed on:
    /// `encoded_protected_header || '.' || encoded_payload`.
    pub fn signing_input(&self, entry: &SignatureEntry) -> Vec<u8> {
        let mut input =
            Vec::with_capacity(entry.protected.encoded.len() + 1 + self.payload_b64.len());
        input.extend_from_slice(entry.protected.encoded.as_bytes());
        input.push(b'.');
        input.extend_from_slice(self.payload_b64.as_bytes());
        input
    }

    /// Signs `payload` with each signer in turn, producing one signature
    /// entry per signer with an auto-populated protected header.
    pub fn sign(payload: &[u8], signers: &[&Signer]) -> Result<Self, SignError> {
        let entries = signers.iter().map(|signer| SignEntry::new(signer));
        Self::sign_entries(payload, entries)
    }

    /// Signs `payload` with per-signer header templates. Each entry's
    /// protected header receives the signer's algorithm (and key id / public
    /// JWK when the signer carries them); protected and unprotected headers
    /// must not share members.
    pub fn sign_entries<'a>(
        payload: &[u8],
        entries: impl IntoIterator<Item = SignEntry<'a>>,
    ) -> Result<Self, SignError> {
        let payload_b64 = base64url::encode(payload);
        let mut signatures = Vec::new();

        for entry in entries {
            let SignEntry {
                signer,
                mut protected,
                unprotected,
            } = entry;
            protected.algorithm = Some(signer.algorithm());
            if protected.key_id.is_none() {
                protected.key_id = signer.key_id().map(str::to_owned);
            }
            if protected.json_web_key.is_none() {
                protected.json_web_key = signer.public_jwk().cloned();
            }
            if let Some(shared) = protected
                .member_names()
                .into_iter()
                .find(|name| unprotected.member_names().contains(name))
            {
                return Err(SignError::OverlappingHeader(shared.to_owned()));
            }

            let protected = ProtectedHeader::from_header(protected)?;
            let mut signing_input =
                Vec::with_capacity(protected.encoded.len() + 1 + payload_b64.len());
            signing_input.extend_from_slice(protected.encoded.as_bytes());
            signing_input.push(b'.');
            signing_input.extend_from_slice(payload_b64.as_bytes());

            let signature = signer.sign(&signing_input)?;
            signatures.push(SignatureEntry {
                protected,
                header: unprotected,
                signature: SmallVec::from_vec(signature),
            });
        }

        if signatures.is_empty() {
            return Err(SignError::NoSigners);
        }
        Ok(Self {
            payload: payload.to_vec(),
            payload_b64,
            signatures,
        })
    }

    /// Emits the compact serialization. The message must carry exactly one
    /// signature, and that signature must not have an unprotected header.
    pub fn to_compact(&self) -> Result<String, SignError> {
        let [entry] = self.signatures.as_slice() else {
            return Err(SignError::TooManySignatures(self.signatures.len()));
        };
        if !entry.header.is_empty() {
            return Err(SignError::UnprotectedHeader);
        }
        let mut out = String::with_capacity(
            entry.protected.encoded.len() + self.payload_b64.len() + entry.signature.len() * 2,
        );
        out.push_str(&entry.protected.encoded);
        out.push('.');
        out.push_str(&self.payload_b64);
        out.push('.');
        out.push_str(&base64url::encode(&entry.signature));
        Ok(out)
    }

    /// Emits the general JSON serialization.
    pub fn to_json(&self) -> Result<String, SignError> {
        let signatures = self
            .signatures
            .iter()
            .map(|entry| serde_json::to_value(self.wire_signature(entry)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SignError::Header)?;
        let mut object = Map::new();
        object.insert("payload".to_owned(), Value::String(self.payload_b64.clone()));
        object.insert("signatures".to_owned(), Value::Array(signatures));
        Ok(Value::Object(object).to_string())
    }

    /// Emits the flattened JSON serialization: the single signature's members
    /// are lifted to the top level and `signatures` is omitted.
    pub fn to_flattened_json(&self) -> Result<String, SignError> {
        let [entry] = self.signatures.as_slice() else {
            return Err(SignError::TooManySignatures(self.signatures.len()));
        };
        let mut object = Map::new();
        object.insert("payload".to_owned(), Value::String(self.payload_b64.clone()));
        let wire = serde_json::to_value(self.wire_signature(entry)).map_err(SignError::Header)?;
        let Value::Object(wire) = wire else {
            unreachable!("wire signature always serializes to an object");
        };
        object.extend(wire);
        Ok(Value::Object(object).to_string())
    }

    fn wire_signature(&self, entry: &SignatureEntry) -> WireSignature {
        WireSignature {
            protected: (!entry.protected.encoded.is_empty())
                .then(|| entry.protected.encoded.clone()),
            header: (!entry.header.is_empty()).then(|| entry.header.clone()),
            signature: Some(base64url::encode(&entry.signature)),
        }
    }

    /// Parses a serialized JWS, detecting the shape from the first
    /// non-whitespace byte: `{` selects the JSON serializations, anything
    /// else the compact one.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        let trimmed = trim_ascii(raw);
        if trimmed.first() == Some(&b'{') {
            tracing::trace!("parsing message in JSON mode");
            Self::parse_json(trimmed)
        } else {
            tracing::trace!("parsing message in compact mode");
            Self::parse_compact(trimmed)
        }
    }

    fn parse_compact(raw: &[u8]) -> Result<Self, ParseError> {
        let text = str::from_utf8(raw).map_err(|_| ParseError::MalformedCompact)?;
        let segments: Vec<_> = text.split('.').collect();
        let [protected, payload_b64, signature] = segments.as_slice() else {
            return Err(ParseError::MalformedCompact);
        };

        let protected = ProtectedHeader::from_encoded((*protected).to_owned())?;
        let payload = base64url::decode(payload_b64)?;
        let signature = base64url::decode(signature)?;

        Ok(Self {
            payload,
            payload_b64: (*payload_b64).to_owned(),
            signatures: vec![SignatureEntry {
                protected,
                header: Header::empty(),
                signature: SmallVec::from_vec(signature),
            }],
        })
    }

    fn parse_json(raw: &[u8]) -> Result<Self, ParseError> {
        let wire: WireMessage = serde_json::from_slice(raw).map_err(ParseError::MalformedJson)?;

        let is_flattened = wire.flattened.signature.is_some();
        if is_flattened && !wire.signatures.is_empty() {
            return Err(ParseError::MixedSerialization);
        }
        let wire_signatures = if is_flattened {
            vec![wire.flattened]
        } else {
            wire.signatures
        };
        if wire_signatures.is_empty() {
            return Err(ParseError::MalformedJson(serde::de::Error::custom(
                "message carries no signatures",
            )));
        }

        let mut signatures = Vec::with_capacity(wire_signatures.len());
        for wire_signature in wire_signatures {
            let protected =
                ProtectedHeader::from_encoded(wire_signature.protected.unwrap_or_default())?;
            let signature = base64url::decode(wire_signature.signature.unwrap_or_default())?;
            signatures.push(SignatureEntry {
                protected,
                header: wire_signature.header.unwrap_or_default(),
                signature: SmallVec::from_vec(signature),
            });
        }

        let payload = base64url::decode(&wire.payload)?;
        Ok(Self {
            payload,
            payload_b64: wire.payload,
            signatures,
        })
    }
}

/// One signer together with its per-signature header templates, for
/// [`Message::sign_entries()`].
#[derive(Debug)]
pub struct SignEntry<'a> {
    /// The signer producing this signature.
    pub signer: &'a Signer,
    /// Protected header template; `alg` is overwritten from the signer.
    pub protected: Header,
    /// Unprotected header, emitted only in the JSON serializations.
    pub unprotected: Header,
}

impl<'a> SignEntry<'a> {
    /// Wraps a signer with empty header templates.
    pub fn new(signer: &'a Signer) -> Self {
        Self {
            signer,
            protected: Header::empty(),
            unprotected: Header::empty(),
        }
    }
}

fn trim_ascii(mut raw: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = raw {
        if first.is_ascii_whitespace() {
            raw = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = raw {
        if last.is_ascii_whitespace() {
            raw = rest;
        } else {
            break;
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const HS256_TOKEN: &str = "eyJ0eXAiOiJKV1QiLA0KICJhbGciOiJIUzI1NiJ9.\
                               eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFt\
                               cGxlLmNvbS9pc19yb290Ijp0cnVlfQ.\
                               dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";

    #[test]
    fn compact_segment_counts() {
        // 0, 1 and 3+ periods must all be rejected.
        let no_dots = HS256_TOKEN.replace('.', "");
        assert_matches!(
            Message::parse(no_dots.as_bytes()),
            Err(ParseError::MalformedCompact)
        );

        let one_dot = &HS256_TOKEN[..HS256_TOKEN.rfind('.').unwrap()];
        assert_matches!(
            Message::parse(one_dot.as_bytes()),
            Err(ParseError::MalformedCompact)
        );

        let mut three_dots = HS256_TOKEN.to_owned();
        three_dots.push('.');
        assert_matches!(
            Message::parse(three_dots.as_bytes()),
            Err(ParseError::MalformedCompact)
        );
    }

    #[test]
    fn compact_parse_retains_wire_bytes() {
        let message = Message::parse(HS256_TOKEN.as_bytes()).unwrap();
        assert_eq!(message.signatures().len(), 1);
        let entry = &message.signatures()[0];
        assert_eq!(
            entry.protected.header().algorithm,
            Some(SignatureAlgorithm::HS256)
        );

        let signing_input = message.signing_input(entry);
        let dot = HS256_TOKEN.rfind('.').unwrap();
        assert_eq!(signing_input, HS256_TOKEN[..dot].as_bytes());
    }

    #[test]
    fn leading_whitespace_does_not_confuse_dispatch() {
        let spaced = format!("  \n\t{HS256_TOKEN} \n");
        let message = Message::parse(spaced.as_bytes()).unwrap();
        assert_eq!(message.signatures().len(), 1);

        assert_matches!(
            Message::parse(b"   \n\t "),
            Err(ParseError::MalformedCompact)
        );
    }

    #[test]
    fn foreign_base64_variants_are_rejected() {
        let mangled = HS256_TOKEN.replace('0', "+");
        assert_matches!(
            Message::parse(mangled.as_bytes()),
            Err(ParseError::MalformedBase64(_))
        );

        let padded = format!("{HS256_TOKEN}==");
        assert_matches!(
            Message::parse(padded.as_bytes()),
            Err(ParseError::MalformedBase64(_))
        );
    }

    #[test]
    fn mixed_serialization_is_rejected() {
        let raw = serde_json::json!({
            "payload": "dGVzdA",
            "signature": "AAAA",
            "signatures": [{ "protected": "e30", "signature": "AAAA" }],
        })
        .to_string();
        assert_matches!(
            Message::parse(raw.as_bytes()),
            Err(ParseError::MixedSerialization)
        );
    }

    #[test]
    fn flattened_message_normalizes_to_one_entry() {
        let raw = serde_json::json!({
            "payload": "dGVzdA",
            "protected": "eyJhbGciOiJIUzI1NiJ9",
            "signature": "AAAA",
        })
        .to_string();
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert_eq!(message.signatures().len(), 1);
        assert_eq!(message.payload(), b"test");
    }

    #[test]
    fn missing_alg_defaults_to_none() {
        let raw = serde_json::json!({
            "payload": "dGVzdA",
            "protected": base64url::encode(b"{}"),
            "signature": "",
        })
        .to_string();
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert_eq!(
            message.signatures()[0].protected.header().algorithm,
            Some(SignatureAlgorithm::None)
        );
    }

    #[test]
    fn json_message_without_signatures_is_rejected() {
        let raw = serde_json::json!({ "payload": "dGVzdA" }).to_string();
        assert_matches!(
            Message::parse(raw.as_bytes()),
            Err(ParseError::MalformedJson(_))
        );
    }

    #[test]
    fn unknown_header_members_are_preserved() {
        let header_json = br#"{"alg":"HS256","x-request":"abc"}"#;
        let raw = serde_json::json!({
            "payload": "dGVzdA",
            "protected": base64url::encode(header_json),
            "signature": "AAAA",
        })
        .to_string();
        let message = Message::parse(raw.as_bytes()).unwrap();
        let header = message.signatures()[0].protected.header();
        assert_eq!(header.other_fields["x-request"], "abc");
    }
}
