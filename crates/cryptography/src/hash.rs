//! Hash functions for keytoken.
//!
//! SHA-256 is the message pre-hash used by signing and recovery; RIPEMD-160
//! produces the four-byte token checksum.

use keytoken_config::CHECKSUM_SIZE;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the token checksum: the first four bytes of
/// `RIPEMD160(payload || curve_tag)`.
pub fn checksum(payload: &[u8], curve_tag: &str) -> [u8; CHECKSUM_SIZE] {
    let mut hasher = Ripemd160::new();
    hasher.update(payload);
    hasher.update(curve_tag.as_bytes());
    let digest = hasher.finalize();
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Verifies a token checksum.
pub fn verify_checksum(payload: &[u8], curve_tag: &str, checksum_bytes: &[u8]) -> bool {
    checksum(payload, curve_tag) == checksum_bytes
}
