//! Creation and verification of [JSON Web Signatures (JWS)][JWS] with typed
//! [JSON Web Key (JWK)][JWK] handling.
//!
//! # Design choices
//!
//! - Signing and verification are dispatched through the [`Signer`] /
//!   [`Verifier`] capabilities, whose constructors validate the
//!   `(algorithm, key)` pair up front. The algorithm set is closed, so the
//!   dispatch is an enum, not a trait object.
//! - Keys are a tagged sum over the four registered key types ([`jwk`]),
//!   which makes the shape invariants of RFC 7517 checkable at construction.
//!   Private EC / OKP keys verify their declared public part against the one
//!   derived from the secret scalar when materialized.
//! - Parsed protected headers keep their original wire encoding; the signing
//!   input is always reassembled from those bytes, never from a re-encoded
//!   header, since JSON serialization is not canonical.
//! - The unsecured `none` algorithm never verifies positively unless the
//!   caller explicitly constructs [`Verifier::unsecured()`].
//!
//! ## Supported algorithms
//!
//! | Algorithm(s) | Backend |
//! |--------------|---------|
//! | `HS256`, `HS384`, `HS512` | [`hmac`] + [`sha2`] |
//! | `RS*`, `PS*` (RSA) | [`rsa`] with blinding |
//! | `ES256`, `ES384`, `ES512` | [`p256`] / [`p384`] / [`p521`] |
//! | `EdDSA` (Ed25519) | [`ed25519-dalek`] |
//!
//! X25519 key material is supported for JWK / PEM handling, although no JWS
//! algorithm admits it.
//!
//! [JWS]: https://tools.ietf.org/html/rfc7515
//! [JWK]: https://tools.ietf.org/html/rfc7517
//! [`hmac`]: https://docs.rs/hmac/
//! [`sha2`]: https://docs.rs/sha2/
//! [`rsa`]: https://docs.rs/rsa/
//! [`p256`]: https://docs.rs/p256/
//! [`p384`]: https://docs.rs/p384/
//! [`p521`]: https://docs.rs/p521/
//! [`ed25519-dalek`]: https://docs.rs/ed25519-dalek/
//!
//! # Examples
//!
//! Signing and verifying a payload in the compact serialization:
//!
//! ```
//! use jws_kit::{
//!     jwa::{KeyType, SignatureAlgorithm},
//!     jwk::{GenerateOptions, JsonWebKey},
//!     verify, Message, Signer, Verifier,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let jwk = JsonWebKey::generate(KeyType::Oct, GenerateOptions::default())?;
//! let signer = Signer::from_jwk(SignatureAlgorithm::HS256, &jwk)?;
//!
//! let message = Message::sign(b"hello", &[&signer])?;
//! let compact = message.to_compact()?;
//!
//! let verifier = Verifier::from_jwk(SignatureAlgorithm::HS256, &jwk)?;
//! let payload = verify(compact.as_bytes(), &verifier)?;
//! assert_eq!(payload, b"hello");
//! # Ok(())
//! # }
//! ```
//!
//! Multi-signature messages use the JSON serialization and can be checked
//! against a key set:
//!
//! ```
//! use jws_kit::{
//!     jwa::{EllipticCurve, KeyType, SignatureAlgorithm},
//!     jwk::{GenerateOptions, JsonWebKey, JwkSet},
//!     verify_with_jwk_set, Message, Signer,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = GenerateOptions {
//!     curve: Some(EllipticCurve::P256),
//!     ..GenerateOptions::default()
//! };
//! let jwk = JsonWebKey::generate(KeyType::Ec, options)?;
//! let signer = Signer::from_jwk(SignatureAlgorithm::ES256, &jwk)?;
//!
//! let message = Message::sign(b"hello", &[&signer])?;
//! let json = message.to_json()?;
//!
//! let set = JwkSet { keys: vec![jwk.to_public()?] };
//! let payload = verify_with_jwk_set(json.as_bytes(), &set, None)?;
//! assert_eq!(payload, b"hello");
//! # Ok(())
//! # }
//! ```

// Documentation settings.
#![cfg_attr(docsrs, feature(doc_cfg))]
// Linter settings.
#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod alg;
mod base64url;
mod error;
pub mod jwa;
pub mod jwk;
mod message;
mod verify;

/// Prelude to neatly import the commonly used items.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        jwa::SignatureAlgorithm, jwk::JsonWebKey, verify::verify, Header, Message, Signer,
        Verifier,
    };
}

pub use crate::{
    alg::{Signer, Verifier},
    base64url::{decode as base64url_decode, encode as base64url_encode},
    error::{KeyError, ParseError, SignError, VerifyError},
    message::{Header, Message, ProtectedHeader, SignEntry, SignatureEntry},
    verify::{default_acceptor, verify, verify_message, verify_with_jwk, verify_with_jwk_set, JwkAcceptor},
};
