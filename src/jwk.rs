//! JSON Web Key (JWK) support: the typed key model, RFC 7517 JSON encoding,
//! PEM bridging, key generation and materialization into the concrete key
//! objects consumed by the signing primitives.
//!
//! Keys are modeled as a tagged sum over the four registered key types, which
//! makes the shape invariants (which numeric members a `kty` admits) checkable
//! at construction rather than at use:
//!
//! ```
//! use jws_kit::jwk::{JsonWebKey, JwkSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = r#"{ "kty": "oct", "k": "dGVzdA", "kid": "my-unique-key" }"#;
//! let set = JwkSet::parse(json.as_bytes())?;
//! let key: &JsonWebKey = &set.keys[0];
//! assert_eq!(key.key_id.as_deref(), Some("my-unique-key"));
//! # Ok(())
//! # }
//! ```

pub use self::{convert::KeyMaterial, generate::GenerateOptions};

mod convert;
mod generate;
mod pem;

use serde::{
    de::{Error as DeError, Unexpected},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};
use sha2::digest::{Digest, Output};
use zeroize::Zeroizing;

use std::fmt;

use crate::{
    base64url,
    error::{KeyError, ParseError},
    jwa::{EllipticCurve, KeyType, SignatureAlgorithm},
};

/// JWK members that hold key material or structure and therefore must never
/// be overwritten by a template merge.
const RESERVED_MEMBERS: &[&str] = &[
    "kty", "crv", "n", "e", "d", "p", "q", "dp", "dq", "qi", "x", "y", "k",
];

/// Byte-valued JWK member carrying public data. Base64url-encoded on the
/// wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    /// Wraps raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Wraps `bytes` left-padded with zeros to `width`. This is how
    /// fixed-width fields (curve coordinates and scalars) are emitted.
    pub(crate) fn fixed_width(bytes: &[u8], width: usize) -> Self {
        let mut out = vec![0_u8; width];
        let offset = width.saturating_sub(bytes.len());
        out[offset..].copy_from_slice(&bytes[bytes.len().saturating_sub(width)..]);
        Self(out)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&base64url::encode(&self.0))
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64url::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64url::decode(&encoded).map(Self).map_err(|_| {
            D::Error::invalid_value(Unexpected::Str(&encoded), &"base64url-encoded data")
        })
    }
}

/// Byte-valued JWK member carrying secret data (private scalars, primes,
/// symmetric keys). Zeroed on release; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBytes(Zeroizing<Vec<u8>>);

impl SecretBytes {
    /// Wraps raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    pub(crate) fn fixed_width(bytes: &[u8], width: usize) -> Self {
        let mut out = Zeroizing::new(vec![0_u8; width]);
        let offset = width.saturating_sub(bytes.len());
        out[offset..].copy_from_slice(&bytes[bytes.len().saturating_sub(width)..]);
        Self(out)
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("SecretBytes").field(&"_").finish()
    }
}

impl Serialize for SecretBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64url::encode(&*self.0))
    }
}

impl<'de> Deserialize<'de> for SecretBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64url::decode(&encoded).map(Self::new).map_err(|_| {
            D::Error::invalid_value(Unexpected::Str(&encoded), &"base64url-encoded data")
        })
    }
}

/// Intended use of the key (`use` member).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KeyUse {
    /// Digital signatures (`sig`).
    Signature,
    /// Encryption (`enc`).
    Encryption,
    /// Any other value, preserved verbatim.
    Other(String),
}

impl KeyUse {
    fn as_str(&self) -> &str {
        match self {
            Self::Signature => "sig",
            Self::Encryption => "enc",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for KeyUse {
    fn from(s: &str) -> Self {
        match s {
            "sig" => Self::Signature,
            "enc" => Self::Encryption,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Serialize for KeyUse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KeyUse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| KeyUse::from(s.as_str()))
    }
}

/// Key-material members of a JWK, tagged by `kty`.
///
/// Secret members are optional: a public key simply leaves them out. The CRT
/// members of an RSA private key (`dp`, `dq`, `qi`) are optional even for
/// private keys and are recomputed on materialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kty")]
pub enum KeyParams {
    /// RSA key pair.
    #[serde(rename = "RSA")]
    Rsa {
        /// Modulus.
        n: Bytes,
        /// Public exponent.
        e: Bytes,
        /// Private exponent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        d: Option<SecretBytes>,
        /// First prime factor.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        p: Option<SecretBytes>,
        /// Second prime factor.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        q: Option<SecretBytes>,
        /// `d mod (p - 1)`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dp: Option<SecretBytes>,
        /// `d mod (q - 1)`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dq: Option<SecretBytes>,
        /// CRT coefficient `q^-1 mod p`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        qi: Option<SecretBytes>,
    },
    /// Elliptic-curve key pair over a NIST curve.
    #[serde(rename = "EC")]
    Ec {
        /// Curve name.
        crv: EllipticCurve,
        /// Affine x coordinate.
        x: Bytes,
        /// Affine y coordinate.
        y: Bytes,
        /// Private scalar.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        d: Option<SecretBytes>,
    },
    /// Octet key pair (Ed25519 / X25519).
    #[serde(rename = "OKP")]
    Okp {
        /// Curve name.
        crv: EllipticCurve,
        /// Public key bytes.
        x: Bytes,
        /// Private key bytes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        d: Option<SecretBytes>,
    },
    /// Symmetric octet sequence.
    #[serde(rename = "oct")]
    Oct {
        /// Raw key octets.
        k: SecretBytes,
    },
}

impl KeyParams {
    /// Member names (including `kty`) owned by this variant on the wire.
    fn member_names(&self) -> &'static [&'static str] {
        match self {
            Self::Rsa { .. } => &["kty", "n", "e", "d", "p", "q", "dp", "dq", "qi"],
            Self::Ec { .. } => &["kty", "crv", "x", "y", "d"],
            Self::Okp { .. } => &["kty", "crv", "x", "d"],
            Self::Oct { .. } => &["kty", "k"],
        }
    }
}

/// A JSON Web Key: typed key material plus common attributes.
///
/// Keys are immutable after construction except through the explicit
/// `set_*` / [`Self::merge_template()`] operations.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonWebKey {
    /// Key material, tagged by `kty`.
    pub params: KeyParams,
    /// Key identifier (`kid`).
    pub key_id: Option<String>,
    /// Intended key use (`use`).
    pub key_use: Option<KeyUse>,
    /// Algorithm hint (`alg`).
    pub algorithm: Option<SignatureAlgorithm>,
    /// Permitted operations (`key_ops`).
    pub key_ops: Option<Vec<String>>,
    /// Caller-defined members not interpreted by this crate.
    pub extra: Map<String, Value>,
}

impl JsonWebKey {
    /// Creates a key from its material with no common attributes set.
    pub fn new(params: KeyParams) -> Self {
        Self {
            params,
            key_id: None,
            key_use: None,
            algorithm: None,
            key_ops: None,
            extra: Map::new(),
        }
    }

    /// Returns the key type of this key.
    pub fn key_type(&self) -> KeyType {
        match &self.params {
            KeyParams::Rsa { .. } => KeyType::Rsa,
            KeyParams::Ec { .. } => KeyType::Ec,
            KeyParams::Okp { .. } => KeyType::Okp,
            KeyParams::Oct { .. } => KeyType::Oct,
        }
    }

    /// Returns the curve for EC / OKP keys.
    pub fn curve(&self) -> Option<EllipticCurve> {
        match &self.params {
            KeyParams::Ec { crv, .. } | KeyParams::Okp { crv, .. } => Some(*crv),
            _ => None,
        }
    }

    /// Checks whether the key carries private material. Symmetric keys count
    /// as private.
    pub fn is_private(&self) -> bool {
        match &self.params {
            KeyParams::Rsa { d, .. } => d.is_some(),
            KeyParams::Ec { d, .. } | KeyParams::Okp { d, .. } => d.is_some(),
            KeyParams::Oct { .. } => true,
        }
    }

    /// Returns a copy of the key with all private members stripped, suitable
    /// for publication (e.g., embedding into a JWS header).
    ///
    /// # Errors
    ///
    /// Fails with [`KeyError::MissingPublicKey`] for symmetric keys, which
    /// have no public part.
    pub fn to_public(&self) -> Result<Self, KeyError> {
        let params = match &self.params {
            KeyParams::Rsa { n, e, .. } => KeyParams::Rsa {
                n: n.clone(),
                e: e.clone(),
                d: None,
                p: None,
                q: None,
                dp: None,
                dq: None,
                qi: None,
            },
            KeyParams::Ec { crv, x, y, .. } => KeyParams::Ec {
                crv: *crv,
                x: x.clone(),
                y: y.clone(),
                d: None,
            },
            KeyParams::Okp { crv, x, .. } => KeyParams::Okp {
                crv: *crv,
                x: x.clone(),
                d: None,
            },
            KeyParams::Oct { .. } => return Err(KeyError::MissingPublicKey),
        };
        Ok(Self {
            params,
            key_id: self.key_id.clone(),
            key_use: self.key_use.clone(),
            algorithm: self.algorithm,
            key_ops: self.key_ops.clone(),
            extra: self.extra.clone(),
        })
    }

    /// Sets the key identifier.
    pub fn set_key_id(&mut self, key_id: impl Into<String>) {
        self.key_id = Some(key_id.into());
    }

    /// Sets the intended key use.
    pub fn set_key_use(&mut self, key_use: KeyUse) {
        self.key_use = Some(key_use);
    }

    /// Sets the algorithm hint.
    pub fn set_algorithm(&mut self, algorithm: SignatureAlgorithm) {
        self.algorithm = Some(algorithm);
    }

    /// Merges a JSON object of extra attributes into the key, last-writer
    /// wins for the common attributes.
    ///
    /// # Errors
    ///
    /// Fails with [`KeyError::ReservedField`] if the template names a member
    /// holding key material (`n`, `d`, `crv`, ...); those can never be
    /// overwritten.
    pub fn merge_template(&mut self, template: Map<String, Value>) -> Result<(), KeyError> {
        for (name, value) in template {
            if RESERVED_MEMBERS.contains(&name.as_str()) {
                return Err(KeyError::ReservedField(name));
            }
            match (name.as_str(), &value) {
                ("kid", Value::String(s)) => self.key_id = Some(s.clone()),
                ("use", Value::String(s)) => self.key_use = Some(KeyUse::from(s.as_str())),
                ("alg", Value::String(s)) => {
                    self.algorithm = Some(s.parse()?);
                }
                ("key_ops", Value::Array(ops)) => {
                    let ops = ops
                        .iter()
                        .map(|op| {
                            op.as_str().map(str::to_owned).ok_or_else(|| {
                                KeyError::custom(anyhow::anyhow!("key_ops entries must be strings"))
                            })
                        })
                        .collect::<Result<_, _>>()?;
                    self.key_ops = Some(ops);
                }
                _ => {
                    self.extra.insert(name, value);
                }
            }
        }
        Ok(())
    }

    /// Computes the RFC 7638 thumbprint of the key: the digest of the
    /// canonical JSON containing only the required members of its key type,
    /// in lexicographic order.
    pub fn thumbprint<D: Digest>(&self) -> Output<D> {
        let canonical = match &self.params {
            KeyParams::Rsa { n, e, .. } => format!(
                r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#,
                base64url::encode(e),
                base64url::encode(n),
            ),
            KeyParams::Ec { crv, x, y, .. } => format!(
                r#"{{"crv":"{crv}","kty":"EC","x":"{}","y":"{}"}}"#,
                base64url::encode(x),
                base64url::encode(y),
            ),
            KeyParams::Okp { crv, x, .. } => format!(
                r#"{{"crv":"{crv}","kty":"OKP","x":"{}"}}"#,
                base64url::encode(x),
            ),
            KeyParams::Oct { k } => {
                format!(r#"{{"k":"{}","kty":"oct"}}"#, base64url::encode(k))
            }
        };
        D::digest(canonical.as_bytes())
    }

    fn to_value_map(&self) -> Map<String, Value> {
        let params = serde_json::to_value(&self.params)
            .expect("key params serialization is infallible");
        let Value::Object(mut map) = params else {
            unreachable!("key params always serialize to an object");
        };
        if let Some(kid) = &self.key_id {
            map.insert("kid".to_owned(), Value::String(kid.clone()));
        }
        if let Some(key_use) = &self.key_use {
            map.insert("use".to_owned(), Value::String(key_use.as_str().to_owned()));
        }
        if let Some(alg) = self.algorithm {
            map.insert("alg".to_owned(), Value::String(alg.as_str().to_owned()));
        }
        if let Some(ops) = &self.key_ops {
            let ops = ops.iter().cloned().map(Value::String).collect();
            map.insert("key_ops".to_owned(), Value::Array(ops));
        }
        for (name, value) in &self.extra {
            map.insert(name.clone(), value.clone());
        }
        map
    }
}

impl Serialize for JsonWebKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonWebKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;

        let key_id = match map.remove("kid") {
            Some(Value::String(s)) => Some(s),
            Some(_) => return Err(D::Error::custom("`kid` must be a string")),
            None => None,
        };
        let key_use = match map.remove("use") {
            Some(Value::String(s)) => Some(KeyUse::from(s.as_str())),
            Some(_) => return Err(D::Error::custom("`use` must be a string")),
            None => None,
        };
        let algorithm = match map.remove("alg") {
            Some(Value::String(s)) => {
                Some(s.parse::<SignatureAlgorithm>().map_err(D::Error::custom)?)
            }
            Some(_) => return Err(D::Error::custom("`alg` must be a string")),
            None => None,
        };
        let key_ops = match map.remove("key_ops") {
            Some(value) => {
                Some(Vec::<String>::deserialize(value).map_err(D::Error::custom)?)
            }
            None => None,
        };

        let params: KeyParams =
            serde_json::from_value(Value::Object(map.clone())).map_err(D::Error::custom)?;
        let consumed = params.member_names();
        let extra: Map<String, Value> = map
            .into_iter()
            .filter(|(name, _)| !consumed.contains(&name.as_str()))
            .collect();

        Ok(Self {
            params,
            key_id,
            key_use,
            algorithm,
            key_ops,
            extra,
        })
    }
}

/// An ordered set of JSON Web Keys (`{"keys": [...]}`).
///
/// Uniqueness of `(kid, kty, crv)` triples is recommended by RFC 7517 but not
/// enforced here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JwkSet {
    /// The keys, in declared order.
    pub keys: Vec<JsonWebKey>,
}

impl JwkSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document holding either a JWK set or a single bare JWK;
    /// a single key is wrapped into a one-element set.
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_slice(input).map_err(ParseError::MalformedJson)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, ParseError> {
        let is_set = value
            .as_object()
            .map_or(false, |object| object.contains_key("keys"));
        if is_set {
            serde_json::from_value(value).map_err(ParseError::MalformedJson)
        } else {
            let key: JsonWebKey =
                serde_json::from_value(value).map_err(ParseError::MalformedJson)?;
            Ok(Self { keys: vec![key] })
        }
    }

    /// Parses one or more PEM blocks into a key set, preserving block order.
    /// See [`module docs`](self) for the recognized labels.
    pub fn parse_pem(input: &[u8]) -> Result<Self, KeyError> {
        pem::parse(input)
    }

    /// Renders the set as a JSON value. A single-key set is emitted as a bare
    /// JWK object unless `preserve_set` is requested.
    pub fn to_json_value(&self, preserve_set: bool) -> Value {
        if self.keys.len() == 1 && !preserve_set {
            Value::Object(self.keys[0].to_value_map())
        } else {
            serde_json::to_value(self).expect("JWK set serialization is infallible")
        }
    }

    /// Renders every key in the set as concatenated PEM blocks.
    ///
    /// # Errors
    ///
    /// Fails with [`KeyError::IncompatibleKey`] if the set contains a
    /// symmetric key; `oct` key material has no PEM representation.
    pub fn to_pem(&self) -> Result<String, KeyError> {
        pem::emit(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ed25519_jwk() -> JsonWebKey {
        JsonWebKey::new(KeyParams::Okp {
            crv: EllipticCurve::Ed25519,
            x: Bytes::new(*b"test"),
            d: None,
        })
    }

    #[test]
    fn serializing_jwk() {
        let jwk = ed25519_jwk();
        let json = serde_json::to_value(&jwk).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kty": "OKP", "crv": "Ed25519", "x": "dGVzdA" })
        );

        let restored: JsonWebKey = serde_json::from_value(json).unwrap();
        assert_eq!(restored, jwk);
    }

    #[test]
    fn extra_members_survive_round_trip() {
        let json_str = r#"
            { "kty": "oct", "k": "dGVzdA", "kid": "my-unique-key", "https://example.com/level": 3 }
        "#;
        let jwk: JsonWebKey = serde_json::from_str(json_str).unwrap();
        assert_eq!(jwk.key_id.as_deref(), Some("my-unique-key"));
        assert_eq!(jwk.extra["https://example.com/level"], 3);

        let value = serde_json::to_value(&jwk).unwrap();
        assert_eq!(value["kid"], "my-unique-key");
        assert_eq!(value["https://example.com/level"], 3);
        // Key material must not leak into `extra`.
        assert!(jwk.extra.get("k").is_none());
    }

    #[test]
    fn jwk_with_malformed_base64_is_rejected() {
        let json_str = r#"{ "kty": "oct", "k": "dGVzdA==" }"#;
        let err = serde_json::from_str::<JsonWebKey>(json_str)
            .unwrap_err()
            .to_string();
        assert!(err.contains("base64url"), "{err}");
    }

    #[test]
    fn single_key_is_wrapped_into_set() {
        let set = JwkSet::parse(br#"{ "kty": "oct", "k": "dGVzdA" }"#).unwrap();
        assert_eq!(set.keys.len(), 1);

        let set = JwkSet::parse(br#"{ "keys": [{ "kty": "oct", "k": "dGVzdA" }] }"#).unwrap();
        assert_eq!(set.keys.len(), 1);
    }

    #[test]
    fn single_key_set_emits_bare_key() {
        let set = JwkSet::parse(br#"{ "kty": "oct", "k": "dGVzdA" }"#).unwrap();
        let bare = set.to_json_value(false);
        assert!(bare.get("keys").is_none());
        let preserved = set.to_json_value(true);
        assert_eq!(preserved["keys"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn template_merge_rejects_reserved_members() {
        let mut jwk = ed25519_jwk();
        let template = serde_json::json!({ "kid": "key-1", "use": "sig" });
        let Value::Object(template) = template else { unreachable!() };
        jwk.merge_template(template).unwrap();
        assert_eq!(jwk.key_id.as_deref(), Some("key-1"));
        assert_eq!(jwk.key_use, Some(KeyUse::Signature));

        let template = serde_json::json!({ "x": "AAAA" });
        let Value::Object(template) = template else { unreachable!() };
        assert_matches!(
            jwk.merge_template(template),
            Err(KeyError::ReservedField(field)) if field == "x"
        );
    }

    #[test]
    fn fixed_width_padding() {
        let padded = Bytes::fixed_width(&[1, 2], 4);
        assert_eq!(padded.as_ref(), &[0, 0, 1, 2]);
        let exact = Bytes::fixed_width(&[1, 2, 3, 4], 4);
        assert_eq!(exact.as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn secret_bytes_debug_is_redacted() {
        let secret = SecretBytes::new(vec![1, 2, 3]);
        assert_eq!(format!("{secret:?}"), "SecretBytes(\"_\")");
    }

    #[test]
    fn rfc7638_thumbprint_reference() {
        // Reference value from RFC 7638 §3.1.
        let jwk: JsonWebKey = serde_json::from_value(serde_json::json!({
            "kty": "RSA",
            "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAt\
                  VT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn6\
                  4tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FD\
                  W2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n9\
                  1CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINH\
                  aQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
            "e": "AQAB",
            "alg": "RS256",
            "kid": "2011-04-29"
        }))
        .unwrap();

        let thumbprint = base64url::encode(jwk.thumbprint::<sha2::Sha256>());
        assert_eq!(thumbprint, "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs");
    }
}
