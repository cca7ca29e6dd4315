//! Canonical signer.
//!
//! Signs `SHA256(message)` with plain ECDSA and retries with a fresh
//! deterministic nonce until both `r` and `s` pass [`is_canonical`]. The
//! nonce for attempt `i` is the RFC 6979 HMAC-DRBG output for
//! `(d, z)` with the big-endian counter `i` as additional data, so a retry
//! never depends on external entropy.

use elliptic_curve::{
    ff::{Field, PrimeField},
    group::{Curve as _, Group as _},
    ops::Reduce,
    point::AffineCoordinates,
    scalar::IsHigh,
    FieldBytesEncoding,
};
use keytoken_config::{SignerConfig, DEFAULT_MAX_SIGN_ATTEMPTS, FIELD_SIZE};
use sha2::Sha256;
use tracing::{debug, trace, warn};

use crate::codec::{self, Prefix};
use crate::curve::{field_bytes, to_array, RegisteredCurve};
use crate::hash;
use crate::keys::{self, KeyError};
use crate::signature::RawSignature;

/// Errors raised by the signing loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("no canonical signature found after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
}

/// Returns true when `v` lies in `[0x0080..00, 0x7fff..ff]`: the top bit is
/// clear and the value does not start with a redundant zero byte.
pub fn is_canonical(v: &[u8; FIELD_SIZE]) -> bool {
    (v[0] & 0x80) == 0 && !(v[0] == 0 && (v[1] & 0x80) == 0)
}

/// Canonical-signature generator with a bounded retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signer {
    max_attempts: u32,
}

impl Default for Signer {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_SIGN_ATTEMPTS,
        }
    }
}

impl From<&SignerConfig> for Signer {
    fn from(config: &SignerConfig) -> Self {
        Self::new(config.max_attempts)
    }
}

impl Signer {
    /// A cap of zero is raised to one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Signs `SHA256(message)`. Callers pass the raw message, not a digest.
    pub fn sign(&self, message: &[u8], private_token: &str) -> crate::Result<String> {
        self.sign_hash(&hash::sha256(message), private_token)
    }

    /// Signs an already-computed SHA-256 digest.
    pub fn sign_hash(&self, hash: &[u8; FIELD_SIZE], private_token: &str) -> crate::Result<String> {
        let token = codec::decode(private_token)?;
        let secret = keys::private_scalar_bytes(&token)?;
        let curve = token.curve_type();
        let group = curve.group();

        for attempt in 1..=self.max_attempts {
            match group.sign_attempt(&secret, hash, attempt)? {
                Some(signature) if is_canonical(signature.r()) && is_canonical(signature.s()) => {
                    trace!(curve = %curve, attempt, "canonical signature found");
                    return Ok(codec::encode(
                        Prefix::Signature,
                        curve,
                        &signature.to_bytes(),
                    ));
                }
                _ => debug!(curve = %curve, attempt, "rejected non-canonical signature"),
            }
        }

        warn!(
            curve = %curve,
            attempts = self.max_attempts,
            "canonical signature retries exhausted"
        );
        Err(SignatureError::ExhaustedRetries {
            attempts: self.max_attempts,
        }
        .into())
    }
}

/// Signs `SHA256(message)` with a `PVT` token using the default retry cap.
pub fn sign(message: &[u8], private_token: &str) -> crate::Result<String> {
    Signer::default().sign(message, private_token)
}

/// One raw ECDSA attempt over `hash`.
///
/// Returns `Ok(None)` when the candidate is unusable: `r` or `s` is zero, or
/// the nonce point's X coordinate is not below `n` (recovery reads `r` back as
/// that X coordinate). `s` is normalised to the lower half of the group and
/// the parity flipped with it.
pub(crate) fn sign_prehashed<C: RegisteredCurve>(
    private_key: &[u8; FIELD_SIZE],
    hash: &[u8; FIELD_SIZE],
    attempt: u32,
) -> Result<Option<RawSignature>, KeyError> {
    let d = keys::parse_private_scalar::<C>(private_key)?;
    let z = <C::Scalar as Reduce<C::Uint>>::reduce_bytes(&field_bytes::<C>(hash));

    let k_bytes = rfc6979::generate_k::<Sha256, C::FieldBytesSize>(
        &d.to_repr(),
        &C::ORDER.encode_field_bytes(),
        &z.to_repr(),
        &attempt.to_be_bytes(),
    );
    let k = match Option::<C::Scalar>::from(C::Scalar::from_repr(k_bytes)) {
        Some(k) if !bool::from(k.is_zero()) => k,
        _ => return Ok(None),
    };
    let k_inv = match Option::<C::Scalar>::from(k.invert()) {
        Some(k_inv) => k_inv,
        None => return Ok(None),
    };

    let nonce_point = (C::ProjectivePoint::generator() * k).to_affine();
    let nonce_x = nonce_point.x();
    let r = <C::Scalar as Reduce<C::Uint>>::reduce_bytes(&nonce_x);
    if bool::from(r.is_zero()) || r.to_repr() != nonce_x {
        return Ok(None);
    }

    let mut s = k_inv * (z + r * d);
    if bool::from(s.is_zero()) {
        return Ok(None);
    }

    let mut parity = u8::from(bool::from(nonce_point.y_is_odd()));
    if bool::from(s.is_high()) {
        s = -s;
        parity ^= 1;
    }

    Ok(Some(RawSignature::new(
        parity,
        to_array::<C>(&r.to_repr()),
        to_array::<C>(&s.to_repr()),
    )))
}
