//! RSA-based JWS schemes: `RS*` (PKCS#1 v1.5) and `PS*` (PSS).

use rand_core::OsRng;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::{
    error::{KeyError, VerifyError},
    jwa::SignatureAlgorithm,
};

/// RSA hash selection shared between the two padding families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashAlg {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlg {
    fn digest(self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(message).to_vec(),
            Self::Sha384 => Sha384::digest(message).to_vec(),
            Self::Sha512 => Sha512::digest(message).to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Padding {
    Pkcs1v15,
    Pss,
}

fn scheme(algorithm: SignatureAlgorithm) -> Result<(HashAlg, Padding), KeyError> {
    Ok(match algorithm {
        SignatureAlgorithm::RS256 => (HashAlg::Sha256, Padding::Pkcs1v15),
        SignatureAlgorithm::RS384 => (HashAlg::Sha384, Padding::Pkcs1v15),
        SignatureAlgorithm::RS512 => (HashAlg::Sha512, Padding::Pkcs1v15),
        SignatureAlgorithm::PS256 => (HashAlg::Sha256, Padding::Pss),
        SignatureAlgorithm::PS384 => (HashAlg::Sha384, Padding::Pss),
        SignatureAlgorithm::PS512 => (HashAlg::Sha512, Padding::Pss),
        other => return Err(KeyError::UnsupportedAlgorithm(other)),
    })
}

fn pkcs1v15(hash: HashAlg) -> Pkcs1v15Sign {
    match hash {
        HashAlg::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlg::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlg::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

fn pss(hash: HashAlg) -> Pss {
    // The salt length is pinned to the hash output size as required by
    // RFC 7518 §3.5.
    match hash {
        HashAlg::Sha256 => Pss::new_with_salt::<Sha256>(Sha256::output_size()),
        HashAlg::Sha384 => Pss::new_with_salt::<Sha384>(Sha384::output_size()),
        HashAlg::Sha512 => Pss::new_with_salt::<Sha512>(Sha512::output_size()),
    }
}

/// RSA signing key bound to one of the six RSA-based JWS algorithms.
#[derive(Debug, Clone)]
pub struct RsaSigningKey {
    algorithm: SignatureAlgorithm,
    hash: HashAlg,
    padding: Padding,
    key: RsaPrivateKey,
}

impl RsaSigningKey {
    /// Binds an RSA private key to `algorithm`.
    pub fn new(algorithm: SignatureAlgorithm, key: RsaPrivateKey) -> Result<Self, KeyError> {
        let (hash, padding) = scheme(algorithm)?;
        Ok(Self {
            algorithm,
            hash,
            padding,
            key,
        })
    }

    pub(crate) fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Returns the verifying half of this key, bound to the same algorithm.
    pub fn to_verifying_key(&self) -> RsaVerifyingKey {
        RsaVerifyingKey {
            algorithm: self.algorithm,
            hash: self.hash,
            padding: self.padding,
            key: self.key.to_public_key(),
        }
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        let digest = self.hash.digest(message);
        let signature = match self.padding {
            Padding::Pkcs1v15 => {
                self.key
                    .sign_with_rng(&mut OsRng, pkcs1v15(self.hash), &digest)
            }
            Padding::Pss => self.key.sign_with_rng(&mut OsRng, pss(self.hash), &digest),
        };
        signature.map_err(KeyError::custom)
    }
}

/// RSA verifying key bound to one of the six RSA-based JWS algorithms.
#[derive(Debug, Clone)]
pub struct RsaVerifyingKey {
    algorithm: SignatureAlgorithm,
    hash: HashAlg,
    padding: Padding,
    key: RsaPublicKey,
}

impl RsaVerifyingKey {
    /// Binds an RSA public key to `algorithm`.
    pub fn new(algorithm: SignatureAlgorithm, key: RsaPublicKey) -> Result<Self, KeyError> {
        let (hash, padding) = scheme(algorithm)?;
        Ok(Self {
            algorithm,
            hash,
            padding,
            key,
        })
    }

    pub(crate) fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub(crate) fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
        let digest = self.hash.digest(message);
        let outcome = match self.padding {
            Padding::Pkcs1v15 => self.key.verify(pkcs1v15(self.hash), &digest, signature),
            Padding::Pss => self.key.verify(pss(self.hash), &digest, signature),
        };
        outcome.map_err(|_| VerifyError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn rsa_keys_reject_foreign_algorithms() {
        let key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        assert_matches!(
            RsaSigningKey::new(SignatureAlgorithm::ES256, key),
            Err(KeyError::UnsupportedAlgorithm(SignatureAlgorithm::ES256))
        );
    }
}
