//! ECDSA JWS schemes (`ES256`, `ES384`, `ES512`) over the NIST curves.
//!
//! The JWS wire form of an ECDSA signature is the fixed-width big-endian
//! concatenation `R || S`, each component left-padded to the curve width.
//! `Signature::to_bytes` of the RustCrypto `ecdsa` stack produces exactly
//! this encoding; anything of a different length is rejected before the
//! curve arithmetic ever sees it.

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::{
    error::VerifyError,
    jwa::{EllipticCurve, SignatureAlgorithm},
};

/// ECDSA signing key over one of the supported curves.
///
/// The curve pins the JWS algorithm: P-256 signs `ES256`, P-384 signs
/// `ES384`, and P-521 signs `ES512` (with SHA-512).
#[derive(Clone)]
#[non_exhaustive]
pub enum EcdsaSigningKey {
    /// Key over P-256.
    P256(p256::ecdsa::SigningKey),
    /// Key over P-384.
    P384(p384::ecdsa::SigningKey),
    /// Key over P-521.
    P521(p521::ecdsa::SigningKey),
}

impl std::fmt::Debug for EcdsaSigningKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_tuple("EcdsaSigningKey")
            .field(&self.curve().as_str())
            .finish()
    }
}

impl EcdsaSigningKey {
    /// Returns the curve of this key.
    pub fn curve(&self) -> EllipticCurve {
        match self {
            Self::P256(_) => EllipticCurve::P256,
            Self::P384(_) => EllipticCurve::P384,
            Self::P521(_) => EllipticCurve::P521,
        }
    }

    /// The JWS algorithm this key signs.
    pub(crate) fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            Self::P256(_) => SignatureAlgorithm::ES256,
            Self::P384(_) => SignatureAlgorithm::ES384,
            Self::P521(_) => SignatureAlgorithm::ES512,
        }
    }

    /// Returns the verifying half of this key.
    pub fn to_verifying_key(&self) -> EcdsaVerifyingKey {
        match self {
            Self::P256(key) => EcdsaVerifyingKey::P256(*key.verifying_key()),
            Self::P384(key) => EcdsaVerifyingKey::P384(*key.verifying_key()),
            Self::P521(key) => EcdsaVerifyingKey::P521(*key.verifying_key()),
        }
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Vec<u8> {
        use p256::ecdsa::signature::DigestSigner;

        match self {
            Self::P256(key) => {
                let signature: p256::ecdsa::Signature =
                    key.sign_digest(Sha256::new_with_prefix(message));
                signature.to_bytes().to_vec()
            }
            Self::P384(key) => {
                let signature: p384::ecdsa::Signature =
                    key.sign_digest(Sha384::new_with_prefix(message));
                signature.to_bytes().to_vec()
            }
            Self::P521(key) => {
                let signature: p521::ecdsa::Signature =
                    key.sign_digest(Sha512::new_with_prefix(message));
                signature.to_bytes().to_vec()
            }
        }
    }
}

impl From<p256::ecdsa::SigningKey> for EcdsaSigningKey {
    fn from(key: p256::ecdsa::SigningKey) -> Self {
        Self::P256(key)
    }
}

impl From<p384::ecdsa::SigningKey> for EcdsaSigningKey {
    fn from(key: p384::ecdsa::SigningKey) -> Self {
        Self::P384(key)
    }
}

impl From<p521::ecdsa::SigningKey> for EcdsaSigningKey {
    fn from(key: p521::ecdsa::SigningKey) -> Self {
        Self::P521(key)
    }
}

/// ECDSA verifying key over one of the supported curves.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum EcdsaVerifyingKey {
    /// Key over P-256.
    P256(p256::ecdsa::VerifyingKey),
    /// Key over P-384.
    P384(p384::ecdsa::VerifyingKey),
    /// Key over P-521.
    P521(p521::ecdsa::VerifyingKey),
}

impl EcdsaVerifyingKey {
    /// Returns the curve of this key.
    pub fn curve(&self) -> EllipticCurve {
        match self {
            Self::P256(_) => EllipticCurve::P256,
            Self::P384(_) => EllipticCurve::P384,
            Self::P521(_) => EllipticCurve::P521,
        }
    }

    pub(crate) fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            Self::P256(_) => SignatureAlgorithm::ES256,
            Self::P384(_) => SignatureAlgorithm::ES384,
            Self::P521(_) => SignatureAlgorithm::ES512,
        }
    }

    pub(crate) fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
        use p256::ecdsa::signature::DigestVerifier;

        let expected = 2 * self.curve().field_size();
        if signature.len() != expected {
            return Err(VerifyError::InvalidSignatureSize {
                expected,
                actual: signature.len(),
            });
        }

        let ok = match self {
            Self::P256(key) => p256::ecdsa::Signature::from_slice(signature)
                .map(|sig| {
                    key.verify_digest(Sha256::new_with_prefix(message), &sig)
                        .is_ok()
                })
                .unwrap_or(false),
            Self::P384(key) => p384::ecdsa::Signature::from_slice(signature)
                .map(|sig| {
                    key.verify_digest(Sha384::new_with_prefix(message), &sig)
                        .is_ok()
                })
                .unwrap_or(false),
            Self::P521(key) => p521::ecdsa::Signature::from_slice(signature)
                .map(|sig| {
                    key.verify_digest(Sha512::new_with_prefix(message), &sig)
                        .is_ok()
                })
                .unwrap_or(false),
        };
        if ok {
            Ok(())
        } else {
            Err(VerifyError::InvalidSignature)
        }
    }
}

impl From<p256::ecdsa::VerifyingKey> for EcdsaVerifyingKey {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        Self::P256(key)
    }
}

impl From<p384::ecdsa::VerifyingKey> for EcdsaVerifyingKey {
    fn from(key: p384::ecdsa::VerifyingKey) -> Self {
        Self::P384(key)
    }
}

impl From<p521::ecdsa::VerifyingKey> for EcdsaVerifyingKey {
    fn from(key: p521::ecdsa::VerifyingKey) -> Self {
        Self::P521(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand_core::OsRng;

    #[test]
    fn signature_widths_are_fixed_per_curve() {
        let key = EcdsaSigningKey::from(p256::ecdsa::SigningKey::random(&mut OsRng));
        assert_eq!(key.sign(b"message").len(), 64);

        let key = EcdsaSigningKey::from(p384::ecdsa::SigningKey::random(&mut OsRng));
        assert_eq!(key.sign(b"message").len(), 96);

        let key = EcdsaSigningKey::from(p521::ecdsa::SigningKey::random(&mut OsRng));
        assert_eq!(key.sign(b"message").len(), 132);
    }

    #[test]
    fn undersized_signature_is_rejected_before_arithmetic() {
        let key = p256::ecdsa::SigningKey::random(&mut OsRng);
        let verifying = EcdsaSigningKey::from(key.clone()).to_verifying_key();
        let signature = EcdsaSigningKey::from(key).sign(b"message");

        verifying.verify(b"message", &signature).unwrap();
        assert_matches!(
            verifying.verify(b"message", &signature[..63]),
            Err(VerifyError::InvalidSignatureSize {
                expected: 64,
                actual: 63,
            })
        );
        // Odd-length garbage gets the same treatment.
        assert_matches!(
            verifying.verify(b"message", &[0; 65]),
            Err(VerifyError::InvalidSignatureSize { .. })
        );
    }

    #[test]
    fn round_trip_per_curve() {
        let keys = [
            EcdsaSigningKey::from(p256::ecdsa::SigningKey::random(&mut OsRng)),
            EcdsaSigningKey::from(p384::ecdsa::SigningKey::random(&mut OsRng)),
            EcdsaSigningKey::from(p521::ecdsa::SigningKey::random(&mut OsRng)),
        ];
        for key in keys {
            let signature = key.sign(b"message");
            let verifying = key.to_verifying_key();
            verifying.verify(b"message", &signature).unwrap();
            assert_matches!(
                verifying.verify(b"other message", &signature),
                Err(VerifyError::InvalidSignature)
            );
        }
    }
}
