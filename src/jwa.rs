//! Registry of JSON Web Algorithm names: signature algorithms, key types and
//! elliptic curves, with conversions between wire names and typed variants.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// JWS signature algorithm, as carried in the `alg` header member.
///
/// Each algorithm pins a digest and a key-type compatibility; see
/// [`Self::key_type()`] and [`Self::curve()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SignatureAlgorithm {
    /// HMAC using SHA-256.
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384.
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512.
    RS512,
    /// RSASSA-PSS using SHA-256, MGF1 with SHA-256.
    PS256,
    /// RSASSA-PSS using SHA-384, MGF1 with SHA-384.
    PS384,
    /// RSASSA-PSS using SHA-512, MGF1 with SHA-512.
    PS512,
    /// ECDSA using P-256 and SHA-256.
    ES256,
    /// ECDSA using P-384 and SHA-384.
    ES384,
    /// ECDSA using P-521 and SHA-512.
    ES512,
    /// Edwards-curve signatures (Ed25519).
    EdDSA,
    /// Unsecured JWS. Never verifies positively unless the caller explicitly
    /// opts in via [`Verifier::unsecured()`](crate::alg::Verifier::unsecured).
    #[serde(rename = "none")]
    None,
}

impl SignatureAlgorithm {
    /// All algorithms this crate can sign and verify with (excluding `none`).
    pub const SUPPORTED: [Self; 13] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
        Self::EdDSA,
    ];

    /// Returns the wire name of the algorithm.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::EdDSA => "EdDSA",
            Self::None => "none",
        }
    }

    /// Returns the key type the algorithm operates on, or `None` for the
    /// unsecured algorithm.
    pub fn key_type(self) -> Option<KeyType> {
        Some(match self {
            Self::HS256 | Self::HS384 | Self::HS512 => KeyType::Oct,
            Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512 => {
                KeyType::Rsa
            }
            Self::ES256 | Self::ES384 | Self::ES512 => KeyType::Ec,
            Self::EdDSA => KeyType::Okp,
            Self::None => return None,
        })
    }

    /// Returns the curve pinned by an `ES*` / `EdDSA` algorithm.
    ///
    /// Note that `ES512` pairs P-521 (not P-512, which does not exist) with
    /// SHA-512.
    pub fn curve(self) -> Option<EllipticCurve> {
        Some(match self {
            Self::ES256 => EllipticCurve::P256,
            Self::ES384 => EllipticCurve::P384,
            Self::ES512 => EllipticCurve::P521,
            Self::EdDSA => EllipticCurve::Ed25519,
            _ => return None,
        })
    }

    /// Returns `true` for the unsecured `none` algorithm.
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "HS256" => Self::HS256,
            "HS384" => Self::HS384,
            "HS512" => Self::HS512,
            "RS256" => Self::RS256,
            "RS384" => Self::RS384,
            "RS512" => Self::RS512,
            "PS256" => Self::PS256,
            "PS384" => Self::PS384,
            "PS512" => Self::PS512,
            "ES256" => Self::ES256,
            "ES384" => Self::ES384,
            "ES512" => Self::ES512,
            "EdDSA" => Self::EdDSA,
            "none" => Self::None,
            _ => return Err(KeyError::UnknownAlgorithm(s.to_owned())),
        })
    }
}

/// JWK key type (`kty`), determining the shape of the raw key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// RSA key pair.
    #[serde(rename = "RSA")]
    Rsa,
    /// Elliptic-curve key pair over a NIST curve.
    #[serde(rename = "EC")]
    Ec,
    /// Octet key pair (Ed25519 / X25519).
    #[serde(rename = "OKP")]
    Okp,
    /// Symmetric octet sequence.
    #[serde(rename = "oct")]
    Oct,
}

impl KeyType {
    /// Returns the wire name of the key type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Ec => "EC",
            Self::Okp => "OKP",
            Self::Oct => "oct",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "RSA" => Self::Rsa,
            "EC" => Self::Ec,
            "OKP" => Self::Okp,
            "oct" => Self::Oct,
            _ => return Err(KeyError::UnknownKeyType(s.to_owned())),
        })
    }
}

/// Elliptic curve identifier (`crv`).
///
/// X25519 is key-material-only: no signature algorithm admits it, but it can
/// be generated, parsed and materialized like any other OKP key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EllipticCurve {
    /// NIST P-256 (secp256r1).
    #[serde(rename = "P-256")]
    P256,
    /// NIST P-384 (secp384r1).
    #[serde(rename = "P-384")]
    P384,
    /// NIST P-521 (secp521r1).
    #[serde(rename = "P-521")]
    P521,
    /// Edwards curve 25519 for signing.
    Ed25519,
    /// Montgomery curve 25519 for key agreement.
    X25519,
}

impl EllipticCurve {
    /// Returns the wire name of the curve.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
            Self::Ed25519 => "Ed25519",
            Self::X25519 => "X25519",
        }
    }

    /// Width in bytes of a coordinate / scalar on this curve.
    pub fn field_size(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
            Self::Ed25519 | Self::X25519 => 32,
        }
    }
}

impl fmt::Display for EllipticCurve {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EllipticCurve {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "P-256" => Self::P256,
            "P-384" => Self::P384,
            "P-521" => Self::P521,
            "Ed25519" => Self::Ed25519,
            "X25519" => Self::X25519,
            _ => return Err(KeyError::UnknownCurve(s.to_owned())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn algorithm_names_round_trip() {
        for alg in SignatureAlgorithm::SUPPORTED {
            assert_eq!(alg.as_str().parse::<SignatureAlgorithm>().unwrap(), alg);
        }
        assert_eq!(
            "none".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::None
        );
        assert_matches!(
            "HS1024".parse::<SignatureAlgorithm>(),
            Err(KeyError::UnknownAlgorithm(name)) if name == "HS1024"
        );
    }

    #[test]
    fn algorithm_serde_uses_wire_names() {
        let json = serde_json::to_string(&SignatureAlgorithm::None).unwrap();
        assert_eq!(json, "\"none\"");
        let json = serde_json::to_string(&SignatureAlgorithm::EdDSA).unwrap();
        assert_eq!(json, "\"EdDSA\"");
    }

    #[test]
    fn es_algorithms_pin_curves() {
        assert_eq!(
            SignatureAlgorithm::ES256.curve(),
            Some(EllipticCurve::P256)
        );
        assert_eq!(
            SignatureAlgorithm::ES512.curve(),
            Some(EllipticCurve::P521)
        );
        assert_eq!(SignatureAlgorithm::HS256.curve(), None);
    }

    #[test]
    fn curve_names() {
        assert_eq!(
            "P-521".parse::<EllipticCurve>().unwrap(),
            EllipticCurve::P521
        );
        assert_matches!(
            "P-512".parse::<EllipticCurve>(),
            Err(KeyError::UnknownCurve(_))
        );
        assert_eq!(EllipticCurve::P521.field_size(), 66);
    }
}
