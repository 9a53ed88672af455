//! Implementations of JWS signing / verification algorithms and the
//! [`Signer`] / [`Verifier`] dispatch over them.
//!
//! The set of algorithms is closed, so dispatch is an enum rather than a
//! trait object; the factory constructors validate the `(algorithm, key)`
//! pair so that an instance, once built, cannot fail for compatibility
//! reasons.

mod ecdsa;
mod eddsa;
mod hmacs;
mod rsa;

pub use self::{
    ecdsa::{EcdsaSigningKey, EcdsaVerifyingKey},
    hmacs::HmacKey,
    rsa::{RsaSigningKey, RsaVerifyingKey},
};

use crate::{
    error::{KeyError, VerifyError},
    jwa::SignatureAlgorithm,
    jwk::{JsonWebKey, KeyMaterial},
};

#[derive(Clone)]
enum SignerKind {
    Hmac(HmacKey),
    Rsa(RsaSigningKey),
    Ecdsa(EcdsaSigningKey),
    EdDsa(Box<ed25519_dalek::SigningKey>),
}

/// Signing capability for a single `(algorithm, key)` pair.
///
/// A signer can optionally carry a key identifier and a public JWK; both are
/// copied into the protected header of every signature it produces.
#[derive(Clone)]
pub struct Signer {
    kind: SignerKind,
    key_id: Option<String>,
    public_jwk: Option<JsonWebKey>,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Signer")
            .field("algorithm", &self.algorithm().as_str())
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Creates a signer from materialized key material.
    ///
    /// # Errors
    ///
    /// - [`KeyError::UnsupportedAlgorithm`] for `none` (unsecured messages
    ///   cannot be created through a signer).
    /// - [`KeyError::IncompatibleKey`] / [`KeyError::MissingPrivateKey`] when
    ///   the material does not fit the algorithm.
    pub fn new(algorithm: SignatureAlgorithm, key: KeyMaterial) -> Result<Self, KeyError> {
        use SignatureAlgorithm as Alg;

        let kind = match (algorithm, key) {
            (Alg::HS256 | Alg::HS384 | Alg::HS512, KeyMaterial::Oct(k)) => {
                SignerKind::Hmac(HmacKey::new(algorithm, k.as_ref().to_vec())?)
            }
            (
                Alg::RS256 | Alg::RS384 | Alg::RS512 | Alg::PS256 | Alg::PS384 | Alg::PS512,
                KeyMaterial::RsaPrivate(key),
            ) => SignerKind::Rsa(RsaSigningKey::new(algorithm, *key)?),
            (
                Alg::RS256 | Alg::RS384 | Alg::RS512 | Alg::PS256 | Alg::PS384 | Alg::PS512,
                KeyMaterial::RsaPublic(_),
            ) => return Err(KeyError::MissingPrivateKey),
            (Alg::ES256 | Alg::ES384 | Alg::ES512, KeyMaterial::EcPrivate(key)) => {
                if algorithm.curve() != Some(key.curve()) {
                    return Err(KeyError::IncompatibleKey(
                        "ECDSA key curve does not match the algorithm",
                    ));
                }
                SignerKind::Ecdsa(key)
            }
            (Alg::ES256 | Alg::ES384 | Alg::ES512, KeyMaterial::EcPublic(_)) => {
                return Err(KeyError::MissingPrivateKey)
            }
            (Alg::EdDSA, KeyMaterial::Ed25519Private(key)) => SignerKind::EdDsa(key),
            (Alg::EdDSA, KeyMaterial::Ed25519Public(_)) => {
                return Err(KeyError::MissingPrivateKey)
            }
            (Alg::None, _) => return Err(KeyError::UnsupportedAlgorithm(Alg::None)),
            _ => {
                return Err(KeyError::IncompatibleKey(
                    "key material does not fit the requested algorithm",
                ))
            }
        };
        Ok(Self {
            kind,
            key_id: None,
            public_jwk: None,
        })
    }

    /// Creates a signer from a JWK, materializing its private part.
    /// The JWK's `kid` is carried over into produced signatures.
    pub fn from_jwk(algorithm: SignatureAlgorithm, jwk: &JsonWebKey) -> Result<Self, KeyError> {
        let mut signer = Self::new(algorithm, jwk.materialize()?)?;
        signer.key_id = jwk.key_id.clone();
        Ok(signer)
    }

    /// Attaches a key identifier recorded in the protected header of every
    /// produced signature.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Attaches a public JWK embedded (as the `jwk` member) into the
    /// protected header of every produced signature.
    #[must_use]
    pub fn with_public_jwk(mut self, jwk: JsonWebKey) -> Self {
        self.public_jwk = Some(jwk);
        self
    }

    /// Returns the algorithm this signer produces.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        match &self.kind {
            SignerKind::Hmac(key) => key.algorithm(),
            SignerKind::Rsa(key) => key.algorithm(),
            SignerKind::Ecdsa(key) => key.algorithm(),
            SignerKind::EdDsa(_) => SignatureAlgorithm::EdDSA,
        }
    }

    pub(crate) fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    pub(crate) fn public_jwk(&self) -> Option<&JsonWebKey> {
        self.public_jwk.as_ref()
    }

    /// Signs `message`, returning the raw signature bytes in their JWS wire
    /// form (fixed-width `R || S` for ECDSA, 64 bytes for Ed25519).
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        Ok(match &self.kind {
            SignerKind::Hmac(key) => key.sign(message),
            SignerKind::Rsa(key) => key.sign(message)?,
            SignerKind::Ecdsa(key) => key.sign(message),
            SignerKind::EdDsa(key) => eddsa::sign(key, message),
        })
    }

    /// Derives the verifier matching this signer.
    pub fn to_verifier(&self) -> Verifier {
        match &self.kind {
            SignerKind::Hmac(key) => Verifier {
                kind: VerifierKind::Hmac(key.clone()),
            },
            SignerKind::Rsa(key) => Verifier {
                kind: VerifierKind::Rsa(key.to_verifying_key()),
            },
            SignerKind::Ecdsa(key) => Verifier {
                kind: VerifierKind::Ecdsa(key.to_verifying_key()),
            },
            SignerKind::EdDsa(key) => Verifier {
                kind: VerifierKind::EdDsa(key.verifying_key()),
            },
        }
    }
}

#[derive(Debug, Clone)]
enum VerifierKind {
    Hmac(HmacKey),
    Rsa(RsaVerifyingKey),
    Ecdsa(EcdsaVerifyingKey),
    EdDsa(ed25519_dalek::VerifyingKey),
    Unsecured,
}

/// Verifying capability for a single `(algorithm, key)` pair.
#[derive(Debug, Clone)]
pub struct Verifier {
    kind: VerifierKind,
}

impl Verifier {
    /// Creates a verifier from materialized key material. Private material is
    /// accepted and reduced to its public part.
    ///
    /// # Errors
    ///
    /// [`KeyError::UnsupportedAlgorithm`] for `none`; use
    /// [`Self::unsecured()`] to opt into unsecured messages explicitly.
    pub fn new(algorithm: SignatureAlgorithm, key: KeyMaterial) -> Result<Self, KeyError> {
        use SignatureAlgorithm as Alg;

        let kind = match (algorithm, key) {
            (Alg::HS256 | Alg::HS384 | Alg::HS512, KeyMaterial::Oct(k)) => {
                VerifierKind::Hmac(HmacKey::new(algorithm, k.as_ref().to_vec())?)
            }
            (
                Alg::RS256 | Alg::RS384 | Alg::RS512 | Alg::PS256 | Alg::PS384 | Alg::PS512,
                KeyMaterial::RsaPublic(key),
            ) => VerifierKind::Rsa(RsaVerifyingKey::new(algorithm, key)?),
            (
                Alg::RS256 | Alg::RS384 | Alg::RS512 | Alg::PS256 | Alg::PS384 | Alg::PS512,
                KeyMaterial::RsaPrivate(key),
            ) => VerifierKind::Rsa(RsaVerifyingKey::new(algorithm, key.to_public_key())?),
            (Alg::ES256 | Alg::ES384 | Alg::ES512, KeyMaterial::EcPublic(key)) => {
                if algorithm.curve() != Some(key.curve()) {
                    return Err(KeyError::IncompatibleKey(
                        "ECDSA key curve does not match the algorithm",
                    ));
                }
                VerifierKind::Ecdsa(key)
            }
            (Alg::ES256 | Alg::ES384 | Alg::ES512, KeyMaterial::EcPrivate(key)) => {
                if algorithm.curve() != Some(key.curve()) {
                    return Err(KeyError::IncompatibleKey(
                        "ECDSA key curve does not match the algorithm",
                    ));
                }
                VerifierKind::Ecdsa(key.to_verifying_key())
            }
            (Alg::EdDSA, KeyMaterial::Ed25519Public(key)) => VerifierKind::EdDsa(key),
            (Alg::EdDSA, KeyMaterial::Ed25519Private(key)) => {
                VerifierKind::EdDsa(key.verifying_key())
            }
            (Alg::None, _) => return Err(KeyError::UnsupportedAlgorithm(Alg::None)),
            _ => {
                return Err(KeyError::IncompatibleKey(
                    "key material does not fit the requested algorithm",
                ))
            }
        };
        Ok(Self { kind })
    }

    /// Creates a verifier from a JWK.
    pub fn from_jwk(algorithm: SignatureAlgorithm, jwk: &JsonWebKey) -> Result<Self, KeyError> {
        Self::new(algorithm, jwk.materialize()?)
    }

    /// Explicit opt-in for unsecured (`alg: none`) messages: accepts exactly
    /// the empty signature and nothing else. There is no other way to make
    /// `none` verify positively.
    pub fn unsecured() -> Self {
        Self {
            kind: VerifierKind::Unsecured,
        }
    }

    /// Returns the algorithm this verifier accepts.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        match &self.kind {
            VerifierKind::Hmac(key) => key.algorithm(),
            VerifierKind::Rsa(key) => key.algorithm(),
            VerifierKind::Ecdsa(key) => key.algorithm(),
            VerifierKind::EdDsa(_) => SignatureAlgorithm::EdDSA,
            VerifierKind::Unsecured => SignatureAlgorithm::None,
        }
    }

    /// Verifies `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
        match &self.kind {
            VerifierKind::Hmac(key) => key.verify(message, signature),
            VerifierKind::Rsa(key) => key.verify(message, signature),
            VerifierKind::Ecdsa(key) => key.verify(message, signature),
            VerifierKind::EdDsa(key) => eddsa::verify(key, message, signature),
            VerifierKind::Unsecured => {
                if signature.is_empty() {
                    Ok(())
                } else {
                    Err(VerifyError::InvalidSignature)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand_core::OsRng;

    use crate::jwk::SecretBytes;

    #[test]
    fn es256_on_wrong_curve_is_rejected_at_construction() {
        let key = p384::ecdsa::SigningKey::random(&mut OsRng);
        let material = KeyMaterial::EcPrivate(EcdsaSigningKey::from(key));
        assert_matches!(
            Signer::new(SignatureAlgorithm::ES256, material),
            Err(KeyError::IncompatibleKey(_))
        );
    }

    #[test]
    fn none_cannot_be_constructed_without_opt_in() {
        let material = KeyMaterial::Oct(SecretBytes::new(b"key".to_vec()));
        assert_matches!(
            Signer::new(SignatureAlgorithm::None, material.clone()),
            Err(KeyError::UnsupportedAlgorithm(SignatureAlgorithm::None))
        );
        assert_matches!(
            Verifier::new(SignatureAlgorithm::None, material),
            Err(KeyError::UnsupportedAlgorithm(SignatureAlgorithm::None))
        );
    }

    #[test]
    fn unsecured_verifier_accepts_only_empty_signatures() {
        let verifier = Verifier::unsecured();
        verifier.verify(b"message", b"").unwrap();
        assert_matches!(
            verifier.verify(b"message", b"sig"),
            Err(VerifyError::InvalidSignature)
        );
    }

    #[test]
    fn hmac_signer_produces_matching_verifier() {
        let material = KeyMaterial::Oct(SecretBytes::new(b"super_secret_key_32_bytes_long!!".to_vec()));
        let signer = Signer::new(SignatureAlgorithm::HS256, material).unwrap();
        let signature = signer.sign(b"message").unwrap();
        signer.to_verifier().verify(b"message", &signature).unwrap();
    }
}
