//! Key derivation and key pair generation.
//!
//! A private key is the 32-byte big-endian scalar `d`; its public key is the
//! compressed form of `d * G`. Scalars outside `[1, n)` are rejected with
//! [`KeyError::InvalidPrivateKey`] rather than reduced modulo `n`.

use elliptic_curve::{
    ff::{Field, PrimeField},
    group::{Curve as _, Group as _},
    NonZeroScalar,
};
use keytoken_config::{FIELD_SIZE, PRIVATE_KEY_SIZE};
use rand::rngs::OsRng;
use tracing::debug;
use zeroize::Zeroizing;

use crate::codec::{self, Prefix};
use crate::curve::{field_bytes, to_array, CurveType, RegisteredCurve};
use crate::point::CompressedPoint;

/// Errors raised while handling private keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("private key is zero or not below the group order")]
    InvalidPrivateKey,
    #[error("expected a {expected} token, got {found}")]
    WrongPrefix { expected: Prefix, found: Prefix },
}

/// A freshly generated `(PVT, PUB)` token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"***")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.private_key);
    }
}

/// Computes the compressed public point `d * G` on `curve`.
pub fn derive_public(
    private_key: &[u8; PRIVATE_KEY_SIZE],
    curve: CurveType,
) -> Result<CompressedPoint, KeyError> {
    curve.group().derive_public(private_key)
}

/// Generates a random key pair on `curve` and encodes both halves.
pub fn new_key_pair(curve: CurveType) -> KeyPair {
    let (secret, point) = curve.group().generate_key_pair();
    debug!(curve = %curve, "generated key pair");

    KeyPair {
        private_key: codec::encode(Prefix::Private, curve, &secret[..]),
        public_key: codec::encode(Prefix::Public, curve, &point.to_bytes()),
    }
}

/// Returns the `PUB` token matching a `PVT` token.
pub fn private_to_public(private_token: &str) -> crate::Result<String> {
    let token = codec::decode(private_token)?;
    let secret = private_scalar_bytes(&token)?;
    let point = derive_public(&secret, token.curve_type())?;
    Ok(codec::encode(Prefix::Public, token.curve_type(), &point.to_bytes()))
}

/// Extracts the scalar bytes of a decoded `PVT` token.
pub(crate) fn private_scalar_bytes(
    token: &codec::KeyToken,
) -> Result<Zeroizing<[u8; PRIVATE_KEY_SIZE]>, KeyError> {
    if token.prefix() != Prefix::Private {
        return Err(KeyError::WrongPrefix {
            expected: Prefix::Private,
            found: token.prefix(),
        });
    }
    let mut secret = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
    secret.copy_from_slice(token.payload());
    Ok(secret)
}

/// Parses a scalar in `[1, n)`.
pub(crate) fn parse_private_scalar<C: RegisteredCurve>(
    private_key: &[u8; FIELD_SIZE],
) -> Result<C::Scalar, KeyError> {
    let scalar = Option::<C::Scalar>::from(C::Scalar::from_repr(field_bytes::<C>(private_key)))
        .ok_or(KeyError::InvalidPrivateKey)?;
    if bool::from(scalar.is_zero()) {
        return Err(KeyError::InvalidPrivateKey);
    }
    Ok(scalar)
}

pub(crate) fn derive_point<C: RegisteredCurve>(
    private_key: &[u8; FIELD_SIZE],
) -> Result<CompressedPoint, KeyError> {
    let d = parse_private_scalar::<C>(private_key)?;
    let public = (C::ProjectivePoint::generator() * d).to_affine();
    Ok(CompressedPoint::from_affine::<C>(&public))
}

pub(crate) fn generate_pair<C: RegisteredCurve>() -> (Zeroizing<[u8; FIELD_SIZE]>, CompressedPoint)
{
    let d: C::Scalar = *NonZeroScalar::<C>::random(&mut OsRng);
    let public = (C::ProjectivePoint::generator() * d).to_affine();
    (
        Zeroizing::new(to_array::<C>(&d.to_repr())),
        CompressedPoint::from_affine::<C>(&public),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_known_secp256k1_public_key() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let point = derive_public(&one, CurveType::K1).unwrap();
        assert_eq!(
            point.to_bytes(),
            hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
        );
    }

    #[test]
    fn test_known_secp256r1_public_key() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let point = derive_public(&one, CurveType::R1).unwrap();
        assert_eq!(
            point.to_bytes(),
            hex!("036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296")
        );
    }

    #[test]
    fn test_out_of_range_scalars_rejected() {
        for curve in CurveType::ALL {
            assert_eq!(
                derive_public(&[0u8; 32], curve),
                Err(KeyError::InvalidPrivateKey)
            );
            assert_eq!(
                derive_public(&curve.group().order(), curve),
                Err(KeyError::InvalidPrivateKey)
            );
            assert_eq!(
                derive_public(&[0xff; 32], curve),
                Err(KeyError::InvalidPrivateKey)
            );
        }
    }

    #[test]
    fn test_key_pair_consistency() {
        for curve in CurveType::ALL {
            let pair = new_key_pair(curve);
            let private = codec::decode(&pair.private_key).unwrap();
            let public = codec::decode(&pair.public_key).unwrap();
            assert_eq!(private.prefix(), Prefix::Private);
            assert_eq!(public.prefix(), Prefix::Public);
            assert_eq!(private.curve_type(), curve);
            assert_eq!(public.curve_type(), curve);

            let secret = private_scalar_bytes(&private).unwrap();
            let derived = derive_public(&secret, curve).unwrap();
            assert_eq!(&derived.to_bytes()[..], public.payload());
        }
    }

    #[test]
    fn test_private_to_public() {
        let pair = new_key_pair(CurveType::SM2);
        assert_eq!(private_to_public(&pair.private_key).unwrap(), pair.public_key);
    }

    #[test]
    fn test_private_to_public_wrong_prefix() {
        let pair = new_key_pair(CurveType::K1);
        let err = private_to_public(&pair.public_key).unwrap_err();
        assert_eq!(
            err,
            crate::Error::Key(KeyError::WrongPrefix {
                expected: Prefix::Private,
                found: Prefix::Public,
            })
        );
    }

    #[test]
    fn test_key_pair_debug_redacted() {
        let pair = new_key_pair(CurveType::R1);
        let debug = format!("{:?}", pair);
        assert!(!debug.contains(&pair.private_key));
        assert!(debug.contains(&pair.public_key));
    }
}
