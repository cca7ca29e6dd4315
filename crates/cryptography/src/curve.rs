//! Curve registry.
//!
//! The three supported curve groups are stateless `static` handles selected by
//! [`CurveType::group`]. Every component receives a `&dyn CurveGroup` instead
//! of branching on the curve tag itself.
//!
//! Generic algorithm code is written once against [`RegisteredCurve`], which
//! adds point-from-X reconstruction to the RustCrypto `CurveArithmetic`
//! capability set (base-point multiplication, point addition, scalar
//! inversion, group order).

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use elliptic_curve::{
    consts::U32, point::DecompressPoint, subtle::Choice, AffinePoint, Curve, CurveArithmetic,
    FieldBytes, FieldBytesEncoding,
};
use keytoken_config::FIELD_SIZE;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use crate::codec::FormatError;
use crate::keys::{self, KeyError};
use crate::point::CompressedPoint;
use crate::recover::{self, RecoveryError};
use crate::signature::RawSignature;
use crate::signer;

/// Curve family carried by every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CurveType {
    /// secp256k1 (Koblitz)
    K1,
    /// secp256r1 / NIST P-256
    R1,
    /// SM2 recommended curve (GB/T 32918)
    SM2,
}

impl CurveType {
    pub const ALL: [CurveType; 3] = [CurveType::K1, CurveType::R1, CurveType::SM2];

    /// Token tag, also the checksum salt.
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveType::K1 => "K1",
            CurveType::R1 => "R1",
            CurveType::SM2 => "SM2",
        }
    }

    /// Returns the process-wide group handle for this curve.
    pub fn group(self) -> &'static dyn CurveGroup {
        match self {
            CurveType::K1 => &SECP256K1,
            CurveType::R1 => &SECP256R1,
            CurveType::SM2 => &SM2P256,
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "K1" => Ok(CurveType::K1),
            "R1" => Ok(CurveType::R1),
            "SM2" => Ok(CurveType::SM2),
            _ => Err(FormatError::UnknownCurve(s.to_string())),
        }
    }
}

impl Serialize for CurveType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurveType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// A 256-bit RustCrypto curve usable by the generic key, signing and recovery
/// code. The field size matches the SHA-256 output used for RFC 6979 nonces.
pub trait RegisteredCurve: CurveArithmetic + Curve<FieldBytesSize = U32> {
    const CURVE_TYPE: CurveType;

    /// Reconstructs the point with X coordinate `x` whose Y has the requested
    /// parity. Returns `None` when `x` is not the X coordinate of any point.
    fn point_from_x(x: &FieldBytes<Self>, y_is_odd: bool) -> Option<AffinePoint<Self>>;
}

macro_rules! register_curve {
    ($curve:ty, $tag:ident) => {
        impl RegisteredCurve for $curve {
            const CURVE_TYPE: CurveType = CurveType::$tag;

            fn point_from_x(x: &FieldBytes<Self>, y_is_odd: bool) -> Option<AffinePoint<Self>> {
                Option::from(<AffinePoint<Self> as DecompressPoint<Self>>::decompress(
                    x,
                    Choice::from(y_is_odd as u8),
                ))
            }
        }
    };
}

register_curve!(k256::Secp256k1, K1);
register_curve!(p256::NistP256, R1);
register_curve!(sm2::Sm2, SM2);

/// Byte-level capability set shared by all registered curves.
pub trait CurveGroup: Send + Sync + fmt::Debug {
    fn curve_type(&self) -> CurveType;

    /// Group order `n`, big-endian.
    fn order(&self) -> [u8; FIELD_SIZE];

    /// Draws a uniformly random scalar `d` in `[1, n)` from the OS RNG and
    /// returns it with `d * G`.
    fn generate_key_pair(&self) -> (Zeroizing<[u8; FIELD_SIZE]>, CompressedPoint);

    /// Computes `d * G` in compressed form.
    fn derive_public(&self, private_key: &[u8; FIELD_SIZE]) -> Result<CompressedPoint, KeyError>;

    /// Runs one signing attempt over a pre-hashed message. `Ok(None)` means the
    /// candidate was rejected and the caller should retry with the next counter.
    fn sign_attempt(
        &self,
        private_key: &[u8; FIELD_SIZE],
        hash: &[u8; FIELD_SIZE],
        attempt: u32,
    ) -> Result<Option<RawSignature>, KeyError>;

    /// Reconstructs the signer's public key from a pre-hashed message.
    fn recover(
        &self,
        hash: &[u8; FIELD_SIZE],
        signature: &RawSignature,
    ) -> Result<CompressedPoint, RecoveryError>;
}

struct Registered<C>(PhantomData<C>);

impl<C: RegisteredCurve> fmt::Debug for Registered<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CurveGroup").field(&C::CURVE_TYPE).finish()
    }
}

impl<C: RegisteredCurve> CurveGroup for Registered<C> {
    fn curve_type(&self) -> CurveType {
        C::CURVE_TYPE
    }

    fn order(&self) -> [u8; FIELD_SIZE] {
        to_array::<C>(&C::ORDER.encode_field_bytes())
    }

    fn generate_key_pair(&self) -> (Zeroizing<[u8; FIELD_SIZE]>, CompressedPoint) {
        keys::generate_pair::<C>()
    }

    fn derive_public(&self, private_key: &[u8; FIELD_SIZE]) -> Result<CompressedPoint, KeyError> {
        keys::derive_point::<C>(private_key)
    }

    fn sign_attempt(
        &self,
        private_key: &[u8; FIELD_SIZE],
        hash: &[u8; FIELD_SIZE],
        attempt: u32,
    ) -> Result<Option<RawSignature>, KeyError> {
        signer::sign_prehashed::<C>(private_key, hash, attempt)
    }

    fn recover(
        &self,
        hash: &[u8; FIELD_SIZE],
        signature: &RawSignature,
    ) -> Result<CompressedPoint, RecoveryError> {
        recover::recover_point::<C>(hash, signature)
    }
}

static SECP256K1: Registered<k256::Secp256k1> = Registered(PhantomData);
static SECP256R1: Registered<p256::NistP256> = Registered(PhantomData);
static SM2P256: Registered<sm2::Sm2> = Registered(PhantomData);

/// Widens 32 big-endian bytes into the curve's field representation. All
/// registered curves are 256-bit.
pub(crate) fn field_bytes<C: CurveArithmetic>(bytes: &[u8; FIELD_SIZE]) -> FieldBytes<C> {
    FieldBytes::<C>::from_slice(bytes).clone()
}

pub(crate) fn to_array<C: CurveArithmetic>(bytes: &FieldBytes<C>) -> [u8; FIELD_SIZE] {
    let mut out = [0u8; FIELD_SIZE];
    out.copy_from_slice(bytes);
    out
}
