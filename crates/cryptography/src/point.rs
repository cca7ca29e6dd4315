use elliptic_curve::{point::AffineCoordinates, AffinePoint, CurveArithmetic};
use keytoken_config::{FIELD_SIZE, PUBLIC_KEY_SIZE};

const EVEN_Y: u8 = 0x02;
const ODD_Y: u8 = 0x03;

/// A curve point identified by its X coordinate and the parity of its Y
/// coordinate. Serialises as the 33-byte SEC1 compressed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPoint {
    parity: u8,
    x: [u8; FIELD_SIZE],
}

impl CompressedPoint {
    pub fn new(y_is_odd: bool, x: [u8; FIELD_SIZE]) -> Self {
        Self {
            parity: if y_is_odd { ODD_Y } else { EVEN_Y },
            x,
        }
    }

    /// Compresses an affine point. The caller must rule out the identity,
    /// whose coordinates are not defined.
    pub(crate) fn from_affine<C: CurveArithmetic>(point: &AffinePoint<C>) -> Self {
        let mut x = [0u8; FIELD_SIZE];
        x.copy_from_slice(&point.x());
        Self::new(point.y_is_odd().into(), x)
    }

    /// Parses a compressed point. Returns `None` unless the slice is 33 bytes
    /// long and starts with `0x02` or `0x03`. The X coordinate is not checked
    /// against any curve.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return None;
        }
        let parity = bytes[0];
        if parity != EVEN_Y && parity != ODD_Y {
            return None;
        }
        let mut x = [0u8; FIELD_SIZE];
        x.copy_from_slice(&bytes[1..]);
        Some(Self { parity, x })
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let mut out = [0u8; PUBLIC_KEY_SIZE];
        out[0] = self.parity;
        out[1..].copy_from_slice(&self.x);
        out
    }

    #[inline]
    pub fn parity(&self) -> u8 {
        self.parity
    }

    #[inline]
    pub fn is_odd(&self) -> bool {
        self.parity == ODD_Y
    }

    #[inline]
    pub fn x(&self) -> &[u8; FIELD_SIZE] {
        &self.x
    }
}
