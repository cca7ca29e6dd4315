use keytoken_config::{FIELD_SIZE, RECOVERY_BYTE_OFFSET, SIGNATURE_SIZE};

/// Signature payload layout: `[27 + parity] || r || s`, with `r` and `s` as
/// 32-byte big-endian integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawSignature {
    recovery_byte: u8,
    r: [u8; FIELD_SIZE],
    s: [u8; FIELD_SIZE],
}

impl RawSignature {
    pub fn new(parity_bit: u8, r: [u8; FIELD_SIZE], s: [u8; FIELD_SIZE]) -> Self {
        Self {
            recovery_byte: RECOVERY_BYTE_OFFSET + (parity_bit & 1),
            r,
            s,
        }
    }

    /// Splits a 65-byte payload. The recovery byte is taken as-is.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() != SIGNATURE_SIZE {
            return None;
        }
        let mut r = [0u8; FIELD_SIZE];
        let mut s = [0u8; FIELD_SIZE];
        r.copy_from_slice(&payload[1..1 + FIELD_SIZE]);
        s.copy_from_slice(&payload[1 + FIELD_SIZE..]);
        Some(Self {
            recovery_byte: payload[0],
            r,
            s,
        })
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[0] = self.recovery_byte;
        out[1..1 + FIELD_SIZE].copy_from_slice(&self.r);
        out[1 + FIELD_SIZE..].copy_from_slice(&self.s);
        out
    }

    #[inline]
    pub fn recovery_byte(&self) -> u8 {
        self.recovery_byte
    }

    /// Y parity of the nonce point, `(recovery_byte - 27) & 1`.
    #[inline]
    pub fn parity_bit(&self) -> u8 {
        self.recovery_byte.wrapping_sub(RECOVERY_BYTE_OFFSET) & 1
    }

    #[inline]
    pub fn r(&self) -> &[u8; FIELD_SIZE] {
        &self.r
    }

    #[inline]
    pub fn s(&self) -> &[u8; FIELD_SIZE] {
        &self.s
    }
}
