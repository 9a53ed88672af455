//! Key generation.

use rand_core::{OsRng, RngCore};
use rsa::RsaPrivateKey;
use serde_json::{Map, Value};

use crate::{
    error::KeyError,
    jwa::{EllipticCurve, KeyType},
    jwk::JsonWebKey,
};

/// Default modulus size for RSA and default length for `oct` keys. The
/// `oct` value is deliberately the same number interpreted as *bits*
/// (256 bytes), matching the long-standing behavior of the tool surface.
const DEFAULT_BITS: usize = 2048;

/// Options for [`JsonWebKey::generate()`].
///
/// All sizes are expressed in bits; there is no byte-denominated size
/// parameter anywhere in this API.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Curve for EC / OKP keys. Required for those key types, rejected
    /// implicitly (by being ignored) for others.
    pub curve: Option<EllipticCurve>,
    /// Key size in bits: the modulus size for RSA, the number of random bits
    /// for `oct` (must be a multiple of 8). Defaults to 2048 for both.
    pub bits: Option<usize>,
    /// Extra members merged into the generated JWK, last. Reserved members
    /// holding key material cannot be overwritten.
    pub template: Option<Map<String, Value>>,
}

impl JsonWebKey {
    /// Generates a fresh private key of the given type using the platform
    /// CSPRNG.
    pub fn generate(key_type: KeyType, options: GenerateOptions) -> Result<Self, KeyError> {
        let mut jwk = match key_type {
            KeyType::Rsa => {
                let bits = options.bits.unwrap_or(DEFAULT_BITS);
                let key = RsaPrivateKey::new(&mut OsRng, bits).map_err(KeyError::custom)?;
                Self::from_rsa_private_key(&key)?
            }
            KeyType::Ec => match options.curve {
                Some(EllipticCurve::P256) => Self::from_ecdsa_signing_key(
                    &p256::ecdsa::SigningKey::random(&mut OsRng).into(),
                ),
                Some(EllipticCurve::P384) => Self::from_ecdsa_signing_key(
                    &p384::ecdsa::SigningKey::random(&mut OsRng).into(),
                ),
                Some(EllipticCurve::P521) => Self::from_ecdsa_signing_key(
                    &p521::ecdsa::SigningKey::random(&mut OsRng).into(),
                ),
                _ => {
                    return Err(KeyError::IncompatibleKey(
                        "EC generation requires one of the P-256 / P-384 / P-521 curves",
                    ))
                }
            },
            KeyType::Okp => match options.curve {
                Some(EllipticCurve::Ed25519) => Self::from_ed25519_signing_key(
                    &ed25519_dalek::SigningKey::generate(&mut OsRng),
                ),
                Some(EllipticCurve::X25519) => Self::from_x25519_secret(
                    &x25519_dalek::StaticSecret::random_from_rng(OsRng),
                ),
                _ => {
                    return Err(KeyError::IncompatibleKey(
                        "OKP generation requires the Ed25519 or X25519 curve",
                    ))
                }
            },
            KeyType::Oct => {
                let bits = options.bits.unwrap_or(DEFAULT_BITS);
                if bits == 0 || bits % 8 != 0 {
                    return Err(KeyError::custom(anyhow::anyhow!(
                        "oct key size must be a positive multiple of 8 bits, got {bits}"
                    )));
                }
                let mut octets = vec![0_u8; bits / 8];
                OsRng.fill_bytes(&mut octets);
                Self::from_oct(octets)
            }
        };

        if let Some(template) = options.template {
            jwk.merge_template(template)?;
        }
        tracing::debug!(kty = %key_type, "generated JWK");
        Ok(jwk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::jwk::KeyParams;

    #[test]
    fn oct_default_is_256_bytes() {
        let jwk = JsonWebKey::generate(KeyType::Oct, GenerateOptions::default()).unwrap();
        let KeyParams::Oct { k } = &jwk.params else {
            panic!("unexpected params");
        };
        assert_eq!(k.as_ref().len(), 256);
    }

    #[test]
    fn oct_bit_count_must_be_byte_aligned() {
        let options = GenerateOptions {
            bits: Some(127),
            ..GenerateOptions::default()
        };
        assert_matches!(
            JsonWebKey::generate(KeyType::Oct, options),
            Err(KeyError::Custom(_))
        );
    }

    #[test]
    fn ec_generation_requires_nist_curve() {
        let options = GenerateOptions {
            curve: Some(EllipticCurve::Ed25519),
            ..GenerateOptions::default()
        };
        assert_matches!(
            JsonWebKey::generate(KeyType::Ec, options),
            Err(KeyError::IncompatibleKey(_))
        );
        assert_matches!(
            JsonWebKey::generate(KeyType::Ec, GenerateOptions::default()),
            Err(KeyError::IncompatibleKey(_))
        );
    }

    #[test]
    fn generated_ec_key_has_fixed_width_coordinates() {
        let options = GenerateOptions {
            curve: Some(EllipticCurve::P521),
            ..GenerateOptions::default()
        };
        let jwk = JsonWebKey::generate(KeyType::Ec, options).unwrap();
        let KeyParams::Ec { x, y, d, .. } = &jwk.params else {
            panic!("unexpected params");
        };
        assert_eq!(x.as_ref().len(), 66);
        assert_eq!(y.as_ref().len(), 66);
        assert_eq!(d.as_ref().unwrap().as_ref().len(), 66);
    }

    #[test]
    fn template_attributes_are_merged_last() {
        let template = serde_json::json!({ "kid": "fresh", "use": "sig" });
        let Value::Object(template) = template else { unreachable!() };
        let options = GenerateOptions {
            curve: Some(EllipticCurve::Ed25519),
            template: Some(template),
            ..GenerateOptions::default()
        };
        let jwk = JsonWebKey::generate(KeyType::Okp, options).unwrap();
        assert_eq!(jwk.key_id.as_deref(), Some("fresh"));
    }
}
