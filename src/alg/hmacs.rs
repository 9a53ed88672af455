//! HMAC-SHA2 signing (`HS256`, `HS384`, `HS512`).

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use crate::{
    error::{KeyError, VerifyError},
    jwa::SignatureAlgorithm,
    jwk::SecretBytes,
};

macro_rules! compute_mac {
    ($digest:ty, $key:expr, $message:expr) => {{
        let mut mac = Hmac::<$digest>::new_from_slice($key)
            .expect("HMAC accepts keys of any length");
        mac.update($message);
        mac
    }};
}

/// MAC signer / verifier over a symmetric key.
///
/// The same value serves both roles; verification recomputes the MAC and
/// compares in constant time.
#[derive(Clone)]
pub struct HmacKey {
    algorithm: SignatureAlgorithm,
    key: SecretBytes,
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HmacKey")
            .field("algorithm", &self.algorithm)
            .field("key", &"_")
            .finish()
    }
}

impl HmacKey {
    /// Wraps a symmetric key for the given `HS*` algorithm.
    ///
    /// Any key length is accepted, but RFC 7518 recommends keys at least as
    /// long as the digest output; shorter keys are reported at `warn` level.
    pub fn new(algorithm: SignatureAlgorithm, key: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let digest_size = match algorithm {
            SignatureAlgorithm::HS256 => 32,
            SignatureAlgorithm::HS384 => 48,
            SignatureAlgorithm::HS512 => 64,
            other => return Err(KeyError::UnsupportedAlgorithm(other)),
        };
        let key = key.into();
        if key.len() < digest_size {
            tracing::warn!(
                alg = %algorithm,
                key_len = key.len(),
                digest_size,
                "HMAC key is shorter than the digest output"
            );
        }
        Ok(Self {
            algorithm,
            key: SecretBytes::new(key),
        })
    }

    pub(crate) fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self.algorithm {
            SignatureAlgorithm::HS256 => {
                compute_mac!(Sha256, self.key.as_ref(), message)
                    .finalize()
                    .into_bytes()
                    .to_vec()
            }
            SignatureAlgorithm::HS384 => {
                compute_mac!(Sha384, self.key.as_ref(), message)
                    .finalize()
                    .into_bytes()
                    .to_vec()
            }
            SignatureAlgorithm::HS512 => {
                compute_mac!(Sha512, self.key.as_ref(), message)
                    .finalize()
                    .into_bytes()
                    .to_vec()
            }
            _ => unreachable!("checked in constructor"),
        }
    }

    pub(crate) fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
        // Comparison is constant-time through the `Mac` interface.
        let ok = match self.algorithm {
            SignatureAlgorithm::HS256 => compute_mac!(Sha256, self.key.as_ref(), message)
                .verify_slice(signature)
                .is_ok(),
            SignatureAlgorithm::HS384 => compute_mac!(Sha384, self.key.as_ref(), message)
                .verify_slice(signature)
                .is_ok(),
            SignatureAlgorithm::HS512 => compute_mac!(Sha512, self.key.as_ref(), message)
                .verify_slice(signature)
                .is_ok(),
            _ => unreachable!("checked in constructor"),
        };
        if ok {
            Ok(())
        } else {
            Err(VerifyError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn hmac_rejects_non_hs_algorithms() {
        assert_matches!(
            HmacKey::new(SignatureAlgorithm::RS256, b"key".to_vec()),
            Err(KeyError::UnsupportedAlgorithm(SignatureAlgorithm::RS256))
        );
    }

    #[test]
    fn mac_sizes_follow_digest() {
        let key = b"0123456789abcdef0123456789abcdef".to_vec();
        let hs256 = HmacKey::new(SignatureAlgorithm::HS256, key.clone()).unwrap();
        assert_eq!(hs256.sign(b"payload").len(), 32);
        let hs512 = HmacKey::new(SignatureAlgorithm::HS512, key).unwrap();
        assert_eq!(hs512.sign(b"payload").len(), 64);
    }

    #[test]
    fn verification_round_trip() {
        let key = HmacKey::new(SignatureAlgorithm::HS256, b"super_secret_key".to_vec()).unwrap();
        let signature = key.sign(b"payload");
        key.verify(b"payload", &signature).unwrap();
        assert_matches!(
            key.verify(b"other payload", &signature),
            Err(VerifyError::InvalidSignature)
        );
        assert_matches!(
            key.verify(b"payload", &signature[..31]),
            Err(VerifyError::InvalidSignature)
        );
    }
}
