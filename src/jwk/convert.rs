//! Materialization of JWKs into the concrete key objects consumed by the
//! signing primitives, and construction of JWKs from such objects.

use num_bigint_dig::ModInverse;
use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint, RsaPrivateKey, RsaPublicKey,
};
use zeroize::Zeroizing;

use std::fmt;

use crate::{
    alg::{EcdsaSigningKey, EcdsaVerifyingKey},
    error::KeyError,
    jwa::EllipticCurve,
    jwk::{Bytes, JsonWebKey, KeyParams, SecretBytes},
};

/// Concrete key object backing a JWK, ready for consumption by a signing or
/// verification primitive.
#[derive(Clone)]
#[non_exhaustive]
pub enum KeyMaterial {
    /// RSA private key (with public part derivable).
    RsaPrivate(Box<RsaPrivateKey>),
    /// RSA public key.
    RsaPublic(RsaPublicKey),
    /// ECDSA private key over a NIST curve.
    EcPrivate(EcdsaSigningKey),
    /// ECDSA public key over a NIST curve.
    EcPublic(EcdsaVerifyingKey),
    /// Ed25519 private key.
    Ed25519Private(Box<ed25519_dalek::SigningKey>),
    /// Ed25519 public key.
    Ed25519Public(ed25519_dalek::VerifyingKey),
    /// X25519 static secret.
    X25519Private(Box<x25519_dalek::StaticSecret>),
    /// X25519 public key.
    X25519Public(x25519_dalek::PublicKey),
    /// Raw symmetric key octets.
    Oct(SecretBytes),
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RsaPrivate(_) => "RsaPrivate",
            Self::RsaPublic(_) => "RsaPublic",
            Self::EcPrivate(_) => "EcPrivate",
            Self::EcPublic(_) => "EcPublic",
            Self::Ed25519Private(_) => "Ed25519Private",
            Self::Ed25519Public(_) => "Ed25519Public",
            Self::X25519Private(_) => "X25519Private",
            Self::X25519Public(_) => "X25519Public",
            Self::Oct(_) => "Oct",
        };
        formatter.debug_tuple(label).field(&"_").finish()
    }
}

/// Copies `src` into `dst` right-aligned, tolerating shorter-than-width
/// big-endian representations on input.
fn copy_left_padded(dst: &mut [u8], src: &[u8]) -> Result<(), KeyError> {
    let start = src.iter().position(|&byte| byte != 0).unwrap_or(src.len());
    let src = &src[start..];
    if src.len() > dst.len() {
        return Err(KeyError::IncompatibleKey(
            "field element wider than the curve admits",
        ));
    }
    let offset = dst.len() - src.len();
    dst[..offset].fill(0);
    dst[offset..].copy_from_slice(src);
    Ok(())
}

/// Assembles an uncompressed SEC1 point from affine coordinates.
fn sec1_point(x: &[u8], y: &[u8], field_size: usize) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    let mut point = Zeroizing::new(vec![0_u8; 1 + 2 * field_size]);
    point[0] = 4;
    copy_left_padded(&mut point[1..=field_size], x)?;
    copy_left_padded(&mut point[1 + field_size..], y)?;
    Ok(point)
}

macro_rules! materialize_ec {
    ($curve:ident, $variant:ident, $x:expr, $y:expr, $d:expr) => {{
        let field_size = EllipticCurve::$variant.field_size();
        let point = sec1_point($x, $y, field_size)?;
        let verifying = $curve::ecdsa::VerifyingKey::from_sec1_bytes(&point)
            .map_err(KeyError::custom)?;
        if let Some(d) = $d {
            let mut scalar = Zeroizing::new(vec![0_u8; field_size]);
            copy_left_padded(&mut scalar, d.as_ref())?;
            let signing =
                $curve::ecdsa::SigningKey::from_slice(&scalar).map_err(KeyError::custom)?;
            if signing.verifying_key() != &verifying {
                return Err(KeyError::IncompatibleKey(
                    "declared public key does not match the private scalar",
                ));
            }
            KeyMaterial::EcPrivate(signing.into())
        } else {
            KeyMaterial::EcPublic(verifying.into())
        }
    }};
}

impl JsonWebKey {
    /// Converts the key into the native key object required by the
    /// cryptographic primitives.
    ///
    /// For private EC / OKP keys the declared public part is checked against
    /// the one derived from the secret scalar; RSA CRT members, if present on
    /// the wire, are ignored and recomputed.
    pub fn materialize(&self) -> Result<KeyMaterial, KeyError> {
        match &self.params {
            KeyParams::Rsa { n, e, d, p, q, .. } => {
                let n = BigUint::from_bytes_be(n.as_ref());
                let e = BigUint::from_bytes_be(e.as_ref());
                match d {
                    None => {
                        let key = RsaPublicKey::new(n, e).map_err(KeyError::custom)?;
                        Ok(KeyMaterial::RsaPublic(key))
                    }
                    Some(d) => {
                        let (Some(p), Some(q)) = (p, q) else {
                            return Err(KeyError::IncompatibleKey(
                                "RSA private key requires both prime factors",
                            ));
                        };
                        let d = BigUint::from_bytes_be(d.as_ref());
                        let primes = vec![
                            BigUint::from_bytes_be(p.as_ref()),
                            BigUint::from_bytes_be(q.as_ref()),
                        ];
                        let key = RsaPrivateKey::from_components(n, e, d, primes)
                            .map_err(KeyError::custom)?;
                        key.validate().map_err(KeyError::custom)?;
                        Ok(KeyMaterial::RsaPrivate(Box::new(key)))
                    }
                }
            }

            KeyParams::Ec { crv, x, y, d } => Ok(match crv {
                EllipticCurve::P256 => {
                    materialize_ec!(p256, P256, x.as_ref(), y.as_ref(), d.as_ref())
                }
                EllipticCurve::P384 => {
                    materialize_ec!(p384, P384, x.as_ref(), y.as_ref(), d.as_ref())
                }
                EllipticCurve::P521 => {
                    materialize_ec!(p521, P521, x.as_ref(), y.as_ref(), d.as_ref())
                }
                _ => {
                    return Err(KeyError::IncompatibleKey(
                        "EC keys admit only the NIST curves",
                    ))
                }
            }),

            KeyParams::Okp { crv, x, d } => match crv {
                EllipticCurve::Ed25519 => {
                    let x: [u8; 32] = x.as_ref().try_into().map_err(|_| {
                        KeyError::IncompatibleKey("Ed25519 public key must be 32 bytes")
                    })?;
                    let verifying = ed25519_dalek::VerifyingKey::from_bytes(&x)
                        .map_err(KeyError::custom)?;
                    match d {
                        None => Ok(KeyMaterial::Ed25519Public(verifying)),
                        Some(d) => {
                            let seed: [u8; 32] = d.as_ref().try_into().map_err(|_| {
                                KeyError::IncompatibleKey("Ed25519 secret key must be 32 bytes")
                            })?;
                            let signing = ed25519_dalek::SigningKey::from_bytes(&seed);
                            if signing.verifying_key() != verifying {
                                return Err(KeyError::IncompatibleKey(
                                    "declared public key does not match the private scalar",
                                ));
                            }
                            Ok(KeyMaterial::Ed25519Private(Box::new(signing)))
                        }
                    }
                }
                EllipticCurve::X25519 => {
                    let x: [u8; 32] = x.as_ref().try_into().map_err(|_| {
                        KeyError::IncompatibleKey("X25519 public key must be 32 bytes")
                    })?;
                    let public = x25519_dalek::PublicKey::from(x);
                    match d {
                        None => Ok(KeyMaterial::X25519Public(public)),
                        Some(d) => {
                            let scalar: [u8; 32] = d.as_ref().try_into().map_err(|_| {
                                KeyError::IncompatibleKey("X25519 secret key must be 32 bytes")
                            })?;
                            let secret = x25519_dalek::StaticSecret::from(scalar);
                            if x25519_dalek::PublicKey::from(&secret) != public {
                                return Err(KeyError::IncompatibleKey(
                                    "declared public key does not match the private scalar",
                                ));
                            }
                            Ok(KeyMaterial::X25519Private(Box::new(secret)))
                        }
                    }
                }
                _ => Err(KeyError::IncompatibleKey(
                    "OKP keys admit only Ed25519 and X25519",
                )),
            },

            KeyParams::Oct { k } => Ok(KeyMaterial::Oct(k.clone())),
        }
    }

    /// Builds a JWK from any materialized key.
    pub fn from_key_material(material: &KeyMaterial) -> Result<Self, KeyError> {
        Ok(match material {
            KeyMaterial::RsaPrivate(key) => Self::from_rsa_private_key(key)?,
            KeyMaterial::RsaPublic(key) => Self::from_rsa_public_key(key),
            KeyMaterial::EcPrivate(key) => Self::from_ecdsa_signing_key(key),
            KeyMaterial::EcPublic(key) => Self::from_ecdsa_verifying_key(key),
            KeyMaterial::Ed25519Private(key) => Self::from_ed25519_signing_key(key),
            KeyMaterial::Ed25519Public(key) => Self::from_ed25519_verifying_key(key),
            KeyMaterial::X25519Private(key) => Self::from_x25519_secret(key),
            KeyMaterial::X25519Public(key) => Self::from_x25519_public(key),
            KeyMaterial::Oct(k) => Self::from_oct(k.as_ref().to_vec()),
        })
    }

    /// Builds a private RSA JWK, recomputing the CRT members.
    pub fn from_rsa_private_key(key: &RsaPrivateKey) -> Result<Self, KeyError> {
        let primes = key.primes();
        if primes.len() != 2 {
            return Err(KeyError::IncompatibleKey(
                "multi-prime RSA keys are not representable as JWKs",
            ));
        }
        let (p, q) = (&primes[0], &primes[1]);
        let one = BigUint::from(1_u8);
        let dp = key.d() % (p - &one);
        let dq = key.d() % (q - &one);
        let qi = q
            .clone()
            .mod_inverse(p)
            .and_then(|qi| qi.to_biguint())
            .ok_or(KeyError::IncompatibleKey(
                "prime factors admit no CRT coefficient",
            ))?;

        Ok(Self::new(KeyParams::Rsa {
            n: Bytes::new(key.n().to_bytes_be()),
            e: Bytes::new(key.e().to_bytes_be()),
            d: Some(SecretBytes::new(key.d().to_bytes_be())),
            p: Some(SecretBytes::new(p.to_bytes_be())),
            q: Some(SecretBytes::new(q.to_bytes_be())),
            dp: Some(SecretBytes::new(dp.to_bytes_be())),
            dq: Some(SecretBytes::new(dq.to_bytes_be())),
            qi: Some(SecretBytes::new(qi.to_bytes_be())),
        }))
    }

    /// Builds a public RSA JWK.
    pub fn from_rsa_public_key(key: &RsaPublicKey) -> Self {
        Self::new(KeyParams::Rsa {
            n: Bytes::new(key.n().to_bytes_be()),
            e: Bytes::new(key.e().to_bytes_be()),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        })
    }

    /// Builds a private EC JWK with fixed-width coordinates.
    pub fn from_ecdsa_signing_key(key: &EcdsaSigningKey) -> Self {
        let mut jwk = Self::from_ecdsa_verifying_key(&key.to_verifying_key());
        let d = match key {
            EcdsaSigningKey::P256(key) => SecretBytes::new(key.to_bytes().to_vec()),
            EcdsaSigningKey::P384(key) => SecretBytes::new(key.to_bytes().to_vec()),
            EcdsaSigningKey::P521(key) => SecretBytes::new(key.to_bytes().to_vec()),
        };
        let KeyParams::Ec { d: slot, .. } = &mut jwk.params else {
            unreachable!("EC verifying key always produces EC params");
        };
        *slot = Some(d);
        jwk
    }

    /// Builds a public EC JWK with fixed-width coordinates.
    pub fn from_ecdsa_verifying_key(key: &EcdsaVerifyingKey) -> Self {
        let (crv, x, y) = match key {
            EcdsaVerifyingKey::P256(key) => {
                let point = key.to_encoded_point(false);
                (
                    EllipticCurve::P256,
                    point.x().expect("uncompressed point").to_vec(),
                    point.y().expect("uncompressed point").to_vec(),
                )
            }
            EcdsaVerifyingKey::P384(key) => {
                let point = key.to_encoded_point(false);
                (
                    EllipticCurve::P384,
                    point.x().expect("uncompressed point").to_vec(),
                    point.y().expect("uncompressed point").to_vec(),
                )
            }
            EcdsaVerifyingKey::P521(key) => {
                let point = key.to_encoded_point(false);
                (
                    EllipticCurve::P521,
                    point.x().expect("uncompressed point").to_vec(),
                    point.y().expect("uncompressed point").to_vec(),
                )
            }
        };
        let width = crv.field_size();
        Self::new(KeyParams::Ec {
            crv,
            x: Bytes::fixed_width(&x, width),
            y: Bytes::fixed_width(&y, width),
            d: None,
        })
    }

    /// Builds a private Ed25519 JWK.
    pub fn from_ed25519_signing_key(key: &ed25519_dalek::SigningKey) -> Self {
        Self::new(KeyParams::Okp {
            crv: EllipticCurve::Ed25519,
            x: Bytes::new(key.verifying_key().to_bytes().to_vec()),
            d: Some(SecretBytes::new(key.to_bytes().to_vec())),
        })
    }

    /// Builds a public Ed25519 JWK.
    pub fn from_ed25519_verifying_key(key: &ed25519_dalek::VerifyingKey) -> Self {
        Self::new(KeyParams::Okp {
            crv: EllipticCurve::Ed25519,
            x: Bytes::new(key.to_bytes().to_vec()),
            d: None,
        })
    }

    /// Builds a private X25519 JWK.
    pub fn from_x25519_secret(key: &x25519_dalek::StaticSecret) -> Self {
        Self::new(KeyParams::Okp {
            crv: EllipticCurve::X25519,
            x: Bytes::new(x25519_dalek::PublicKey::from(key).to_bytes().to_vec()),
            d: Some(SecretBytes::new(key.to_bytes().to_vec())),
        })
    }

    /// Builds a public X25519 JWK.
    pub fn from_x25519_public(key: &x25519_dalek::PublicKey) -> Self {
        Self::new(KeyParams::Okp {
            crv: EllipticCurve::X25519,
            x: Bytes::new(key.to_bytes().to_vec()),
            d: None,
        })
    }

    /// Builds a symmetric JWK from raw octets.
    pub fn from_oct(key: impl Into<Vec<u8>>) -> Self {
        Self::new(KeyParams::Oct {
            k: SecretBytes::new(key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand_core::OsRng;

    #[test]
    fn ec_jwk_round_trips_through_materialization() {
        let key = p256::ecdsa::SigningKey::random(&mut OsRng);
        let jwk = JsonWebKey::from_ecdsa_signing_key(&EcdsaSigningKey::from(key.clone()));
        let material = jwk.materialize().unwrap();
        let KeyMaterial::EcPrivate(EcdsaSigningKey::P256(restored)) = material else {
            panic!("unexpected key material: {material:?}");
        };
        assert_eq!(restored.to_bytes(), key.to_bytes());
    }

    #[test]
    fn mismatched_public_part_is_rejected() {
        let key = p256::ecdsa::SigningKey::random(&mut OsRng);
        let other = p256::ecdsa::SigningKey::random(&mut OsRng);
        let mut jwk = JsonWebKey::from_ecdsa_signing_key(&EcdsaSigningKey::from(key));
        let honest = JsonWebKey::from_ecdsa_signing_key(&EcdsaSigningKey::from(other));
        let (KeyParams::Ec { x, y, .. }, KeyParams::Ec { x: fake_x, y: fake_y, .. }) =
            (&mut jwk.params, &honest.params)
        else {
            unreachable!();
        };
        *x = fake_x.clone();
        *y = fake_y.clone();
        assert_matches!(jwk.materialize(), Err(KeyError::IncompatibleKey(_)));
    }

    #[test]
    fn short_coordinates_are_left_padded() {
        let mut dst = [0xff_u8; 4];
        copy_left_padded(&mut dst, &[0, 0, 7]).unwrap();
        assert_eq!(dst, [0, 0, 0, 7]);
        assert_matches!(
            copy_left_padded(&mut dst[..2], &[1, 2, 3]),
            Err(KeyError::IncompatibleKey(_))
        );
    }

    #[test]
    fn x25519_round_trip() {
        let secret = x25519_dalek::StaticSecret::random_from_rng(OsRng);
        let jwk = JsonWebKey::from_x25519_secret(&secret);
        let material = jwk.materialize().unwrap();
        let KeyMaterial::X25519Private(restored) = material else {
            panic!("unexpected key material: {material:?}");
        };
        assert_eq!(restored.to_bytes(), secret.to_bytes());
    }
}
