//! `EdDSA` JWS scheme over Ed25519, using the `ed25519-dalek` backend.

use ed25519_dalek::{Signer as _, Verifier as _};

use crate::error::VerifyError;

pub(crate) const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

pub(crate) fn sign(key: &ed25519_dalek::SigningKey, message: &[u8]) -> Vec<u8> {
    key.sign(message).to_bytes().to_vec()
}

pub(crate) fn verify(
    key: &ed25519_dalek::VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), VerifyError> {
    let signature = ed25519_dalek::Signature::from_slice(signature)
        .map_err(|_| VerifyError::InvalidSignature)?;
    key.verify(message, &signature)
        .map_err(|_| VerifyError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand_core::OsRng;

    #[test]
    fn ed25519_signatures_are_64_bytes() {
        let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let signature = sign(&key, b"message");
        assert_eq!(signature.len(), SIGNATURE_LENGTH);
        verify(&key.verifying_key(), b"message", &signature).unwrap();
        assert_matches!(
            verify(&key.verifying_key(), b"mangled", &signature),
            Err(VerifyError::InvalidSignature)
        );
    }
}
