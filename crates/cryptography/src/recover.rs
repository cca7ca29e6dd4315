//! Public key recovery.
//!
//! Given `z = SHA256(message)` and a signature `(parity, x, s)`:
//!
//! ```text
//! R   = point_from_x(x, parity)
//! P1  = (z / s) * G
//! P1' = point_from_x(P1.x, !P1.y_is_odd)      // P1 reflected across the X axis
//! K   = (s / x) * (R + P1')
//! ```
//!
//! which is `Q = r⁻¹ (s·R − z·G)` from the ECDSA equation with `r` read back
//! as the nonce point's X coordinate. The reflection is built with
//! `point_from_x` rather than group negation; both rely on the same canonical
//! field encoding to decide parity, so they agree for every registered curve.

use elliptic_curve::{
    ff::{Field, PrimeField},
    group::{Curve as _, Group as _},
    ops::Reduce,
    point::AffineCoordinates,
};
use keytoken_config::FIELD_SIZE;
use tracing::trace;

use crate::codec::{self, Prefix};
use crate::curve::{field_bytes, RegisteredCurve};
use crate::hash;
use crate::point::CompressedPoint;
use crate::signature::RawSignature;

/// Errors raised while reconstructing a public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecoveryError {
    #[error("signature x coordinate is not on the curve or not below the group order")]
    InvalidX,
    #[error("signature s is zero or not below the group order")]
    InvalidS,
    #[error("recovery reached the point at infinity")]
    DegeneratePoint,
}

/// Recovers the `PUB` token that produced `signature_token` over
/// `SHA256(message)`.
///
/// Returns `Ok(None)` when the token is well formed but is not a `SIG` token.
pub fn recover(message: &[u8], signature_token: &str) -> crate::Result<Option<String>> {
    recover_hash(&hash::sha256(message), signature_token)
}

/// Same as [`recover`] for an already-computed SHA-256 digest.
pub fn recover_hash(
    hash: &[u8; FIELD_SIZE],
    signature_token: &str,
) -> crate::Result<Option<String>> {
    let token = codec::decode(signature_token)?;
    if token.prefix() != Prefix::Signature {
        return Ok(None);
    }

    // Length was checked by the codec
    let signature = RawSignature::from_payload(token.payload()).ok_or(RecoveryError::InvalidX)?;
    let curve = token.curve_type();
    let point = curve.group().recover(hash, &signature)?;
    trace!(curve = %curve, "recovered public key");

    Ok(Some(codec::encode(Prefix::Public, curve, &point.to_bytes())))
}

/// Checks that `signature_token` over `SHA256(message)` recovers to
/// `public_token`.
///
/// Returns `Ok(false)` for a mismatch, including a curve mismatch or a
/// non-signature token; malformed tokens and invalid signatures are errors.
pub fn verify(message: &[u8], signature_token: &str, public_token: &str) -> crate::Result<bool> {
    let public = codec::decode(public_token)?;
    if public.prefix() != Prefix::Public {
        return Ok(false);
    }
    Ok(match recover(message, signature_token)? {
        Some(recovered) => recovered == public.encode(),
        None => false,
    })
}

pub(crate) fn recover_point<C: RegisteredCurve>(
    hash: &[u8; FIELD_SIZE],
    signature: &RawSignature,
) -> Result<CompressedPoint, RecoveryError> {
    let z = <C::Scalar as Reduce<C::Uint>>::reduce_bytes(&field_bytes::<C>(hash));

    let x_bytes = field_bytes::<C>(signature.r());
    let x = Option::<C::Scalar>::from(C::Scalar::from_repr(x_bytes.clone()))
        .filter(|x| !bool::from(x.is_zero()))
        .ok_or(RecoveryError::InvalidX)?;
    let s = Option::<C::Scalar>::from(C::Scalar::from_repr(field_bytes::<C>(signature.s())))
        .filter(|s| !bool::from(s.is_zero()))
        .ok_or(RecoveryError::InvalidS)?;

    let nonce_point = C::point_from_x(&x_bytes, signature.parity_bit() == 1)
        .ok_or(RecoveryError::InvalidX)?;

    // u1 = z / s
    let s_inv = Option::<C::Scalar>::from(s.invert()).ok_or(RecoveryError::InvalidS)?;
    let u1 = z * s_inv;
    let p1 = C::ProjectivePoint::generator() * u1;
    if bool::from(p1.is_identity()) {
        return Err(RecoveryError::DegeneratePoint);
    }
    let p1 = p1.to_affine();
    let reflected = C::point_from_x(&p1.x(), !bool::from(p1.y_is_odd()))
        .ok_or(RecoveryError::DegeneratePoint)?;

    let u2 = C::ProjectivePoint::from(nonce_point) + C::ProjectivePoint::from(reflected);

    let x_inv = Option::<C::Scalar>::from(x.invert()).ok_or(RecoveryError::InvalidX)?;
    let recovered = u2 * (s * x_inv);
    if bool::from(recovered.is_identity()) {
        return Err(RecoveryError::DegeneratePoint);
    }

    Ok(CompressedPoint::from_affine::<C>(&recovered.to_affine()))
}
