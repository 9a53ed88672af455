//! Verify orchestration: verification against a prepared [`Verifier`], a
//! single JWK, or an ordered JWK set with an acceptance filter.

use crate::{
    alg::Verifier,
    error::VerifyError,
    jwa::SignatureAlgorithm,
    jwk::{JsonWebKey, JwkSet, KeyUse},
    message::Message,
};

/// Acceptance filter for [`verify_with_jwk_set()`].
pub type JwkAcceptor = dyn Fn(&JsonWebKey) -> bool;

/// Default key acceptance: keys whose `use` is unset, `sig` or `enc`.
pub fn default_acceptor(jwk: &JsonWebKey) -> bool {
    matches!(
        jwk.key_use,
        None | Some(KeyUse::Signature) | Some(KeyUse::Encryption)
    )
}

/// Parses `raw` (compact or JSON serialization) and attempts to verify each
/// of its signatures with `verifier`; the decoded payload is returned as soon
/// as any signature checks out.
///
/// For a single-signature message the specific failure (e.g.
/// [`VerifyError::InvalidSignatureSize`]) is surfaced; when several
/// signatures all fail, the uniform [`VerifyError::InvalidSignature`] is
/// returned instead.
pub fn verify(raw: &[u8], verifier: &Verifier) -> Result<Vec<u8>, VerifyError> {
    let message = Message::parse(raw)?;
    verify_message(&message, verifier)
}

/// [`verify()`] over an already-parsed message.
pub fn verify_message(message: &Message, verifier: &Verifier) -> Result<Vec<u8>, VerifyError> {
    let mut first_error = None;
    for (index, entry) in message.signatures().iter().enumerate() {
        let signing_input = message.signing_input(entry);
        match verifier.verify(&signing_input, entry.signature_bytes()) {
            Ok(()) => {
                tracing::debug!(index, alg = %verifier.algorithm(), "signature verified");
                return Ok(message.payload().to_vec());
            }
            Err(err) => {
                tracing::debug!(index, "signature rejected");
                first_error.get_or_insert(err);
            }
        }
    }
    if message.signatures().len() == 1 {
        Err(first_error.unwrap_or(VerifyError::InvalidSignature))
    } else {
        Err(VerifyError::InvalidSignature)
    }
}

/// Verifies `raw` with a JWK. The algorithm is taken from the JWK's `alg`
/// attribute when present, otherwise from each signature's protected header.
pub fn verify_with_jwk(raw: &[u8], jwk: &JsonWebKey) -> Result<Vec<u8>, VerifyError> {
    let message = Message::parse(raw)?;
    verify_message_with_jwk(&message, jwk)
}

fn verify_message_with_jwk(
    message: &Message,
    jwk: &JsonWebKey,
) -> Result<Vec<u8>, VerifyError> {
    let mut first_error = None;
    for (index, entry) in message.signatures().iter().enumerate() {
        let algorithm = jwk
            .algorithm
            .or(entry.protected.header().algorithm)
            .unwrap_or(SignatureAlgorithm::None);
        let verifier = match Verifier::from_jwk(algorithm, jwk) {
            Ok(verifier) => verifier,
            Err(err) => {
                tracing::debug!(index, alg = %algorithm, "key does not fit signature entry");
                first_error.get_or_insert(VerifyError::Key(err));
                continue;
            }
        };
        let signing_input = message.signing_input(entry);
        match verifier.verify(&signing_input, entry.signature_bytes()) {
            Ok(()) => return Ok(message.payload().to_vec()),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    if message.signatures().len() == 1 {
        Err(first_error.unwrap_or(VerifyError::InvalidSignature))
    } else {
        Err(VerifyError::InvalidSignature)
    }
}

/// Verifies `raw` against a JWK set: keys passing `acceptor` (the
/// [`default_acceptor`] when `None`) are tried in declared order, per-key
/// failures are swallowed, and the first success wins.
pub fn verify_with_jwk_set(
    raw: &[u8],
    set: &JwkSet,
    acceptor: Option<&JwkAcceptor>,
) -> Result<Vec<u8>, VerifyError> {
    let message = Message::parse(raw)?;
    let acceptor = acceptor.unwrap_or(&default_acceptor);

    for (index, key) in set.keys.iter().enumerate() {
        if !acceptor(key) {
            tracing::debug!(index, kid = key.key_id.as_deref(), "key skipped by acceptor");
            continue;
        }
        match verify_message_with_jwk(&message, key) {
            Ok(payload) => {
                tracing::debug!(index, kid = key.key_id.as_deref(), "verified with set key");
                return Ok(payload);
            }
            Err(_) => {
                // Per-key failures are deliberately swallowed; only the
                // exhausted-set condition surfaces.
                tracing::debug!(index, kid = key.key_id.as_deref(), "key failed to verify");
            }
        }
    }
    Err(VerifyError::NoMatchingKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::jwk::{JsonWebKey, KeyParams, SecretBytes};

    fn oct_jwk(key_use: Option<KeyUse>) -> JsonWebKey {
        let mut jwk = JsonWebKey::new(KeyParams::Oct {
            k: SecretBytes::new(b"secret".to_vec()),
        });
        jwk.key_use = key_use;
        jwk
    }

    #[test]
    fn default_acceptor_admits_sig_enc_and_unset() {
        assert!(default_acceptor(&oct_jwk(None)));
        assert!(default_acceptor(&oct_jwk(Some(KeyUse::Signature))));
        assert!(default_acceptor(&oct_jwk(Some(KeyUse::Encryption))));
        assert!(!default_acceptor(&oct_jwk(Some(KeyUse::Other(
            "wrap".to_owned()
        )))));
    }
}
