//! Checksummed key token codec.
//!
//! A token is `PREFIX_CURVE_BASE58` where the base58 field carries the payload
//! followed by `RIPEMD160(payload || CURVE)[0..4]`. `PREFIX` is one of
//! `PVT`, `PUB` or `SIG` and `CURVE` one of `K1`, `R1` or `SM2`.

use std::fmt;
use std::str::FromStr;

use keytoken_config::{
    CHECKSUM_SIZE, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SIGNATURE_SIZE, TOKEN_SEPARATOR,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::curve::CurveType;
use crate::hash;

/// Errors raised while decoding a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unrecognized key format")]
    BadShape,
    #[error("unknown curve type: {0}")]
    UnknownCurve(String),
    #[error("invalid base58 payload: {0}")]
    BadBase58(String),
    #[error("checksum doesn't match")]
    ChecksumMismatch,
    #[error("{prefix} payload must be {expected} bytes, got {actual}")]
    BadLength {
        prefix: Prefix,
        expected: usize,
        actual: usize,
    },
}

/// Kind of material a token carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `PVT`: 32-byte private scalar
    Private,
    /// `PUB`: 33-byte compressed point
    Public,
    /// `SIG`: 65-byte recoverable signature
    Signature,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Private => "PVT",
            Prefix::Public => "PUB",
            Prefix::Signature => "SIG",
        }
    }

    /// Fixed payload length for this prefix.
    pub fn payload_len(&self) -> usize {
        match self {
            Prefix::Private => PRIVATE_KEY_SIZE,
            Prefix::Public => PUBLIC_KEY_SIZE,
            Prefix::Signature => SIGNATURE_SIZE,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prefix {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PVT" => Ok(Prefix::Private),
            "PUB" => Ok(Prefix::Public),
            "SIG" => Ok(Prefix::Signature),
            _ => Err(FormatError::BadShape),
        }
    }
}

/// A decoded token: `(prefix, curve type, payload)`.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyToken {
    prefix: Prefix,
    curve_type: CurveType,
    payload: Vec<u8>,
}

impl KeyToken {
    /// Builds a token, checking the payload length against the prefix.
    pub fn new(prefix: Prefix, curve_type: CurveType, payload: &[u8]) -> Result<Self, FormatError> {
        check_length(prefix, payload.len())?;
        Ok(Self {
            prefix,
            curve_type,
            payload: payload.to_vec(),
        })
    }

    #[inline]
    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    #[inline]
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Textual form of this token.
    pub fn encode(&self) -> String {
        encode(self.prefix, self.curve_type, &self.payload)
    }
}

impl Drop for KeyToken {
    fn drop(&mut self) {
        if self.prefix == Prefix::Private {
            self.payload.zeroize();
        }
    }
}

impl fmt::Debug for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("KeyToken");
        debug
            .field("prefix", &self.prefix)
            .field("curve_type", &self.curve_type);
        if self.prefix == Prefix::Private {
            debug.field("payload", &"***");
        } else {
            debug.field("payload", &self.payload);
        }
        debug.finish()
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for KeyToken {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl Serialize for KeyToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for KeyToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        decode(&token).map_err(serde::de::Error::custom)
    }
}

/// Encodes `prefix_curve_base58(payload || checksum)`.
///
/// The payload length is not checked here; use [`KeyToken::new`] when the
/// input is untrusted.
pub fn encode(prefix: Prefix, curve_type: CurveType, payload: &[u8]) -> String {
    let checksum = hash::checksum(payload, curve_type.as_str());
    let mut bytes = Vec::with_capacity(payload.len() + CHECKSUM_SIZE);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&checksum);
    let encoded = bs58::encode(&bytes).into_string();
    bytes.zeroize();

    format!(
        "{prefix}{sep}{curve}{sep}{encoded}",
        prefix = prefix.as_str(),
        curve = curve_type.as_str(),
        sep = TOKEN_SEPARATOR,
    )
}

/// Decodes and verifies a textual token.
pub fn decode(token: &str) -> Result<KeyToken, FormatError> {
    let fields: Vec<&str> = token.split(TOKEN_SEPARATOR).collect();
    if fields.len() != 3 {
        return Err(FormatError::BadShape);
    }
    let prefix: Prefix = fields[0].parse()?;
    let curve_type: CurveType = fields[1].parse()?;

    let mut bytes = bs58::decode(fields[2])
        .into_vec()
        .map_err(|e| FormatError::BadBase58(e.to_string()))?;
    if bytes.len() < CHECKSUM_SIZE {
        // Too short to carry a checksum; report everything that was decoded
        let actual = bytes.len();
        bytes.zeroize();
        return Err(FormatError::BadLength {
            prefix,
            expected: prefix.payload_len(),
            actual,
        });
    }

    let split = bytes.len() - CHECKSUM_SIZE;
    let (payload, checksum) = bytes.split_at(split);
    let result = if !hash::verify_checksum(payload, curve_type.as_str(), checksum) {
        Err(FormatError::ChecksumMismatch)
    } else {
        KeyToken::new(prefix, curve_type, payload)
    };
    bytes.zeroize();
    result
}

fn check_length(prefix: Prefix, actual: usize) -> Result<(), FormatError> {
    let expected = prefix.payload_len();
    if actual != expected {
        return Err(FormatError::BadLength {
            prefix,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload(prefix: Prefix) -> Vec<u8> {
        (0..prefix.payload_len()).map(|i| i as u8 + 1).collect()
    }

    #[test]
    fn test_roundtrip_all_prefixes_and_curves() {
        for prefix in [Prefix::Private, Prefix::Public, Prefix::Signature] {
            for curve in CurveType::ALL {
                let payload = sample_payload(prefix);
                let token = encode(prefix, curve, &payload);
                assert!(token.starts_with(&format!("{}_{}_", prefix, curve)));

                let decoded = decode(&token).unwrap();
                assert_eq!(decoded.prefix(), prefix);
                assert_eq!(decoded.curve_type(), curve);
                assert_eq!(decoded.payload(), &payload[..]);
                assert_eq!(decoded.to_string(), token);
            }
        }
    }

    #[test]
    fn test_bad_shape() {
        assert_eq!(decode("PUB_K1"), Err(FormatError::BadShape));
        assert_eq!(decode("PUB_K1_abc_def"), Err(FormatError::BadShape));
        assert_eq!(decode("KEY_K1_abc"), Err(FormatError::BadShape));
        assert_eq!(decode(""), Err(FormatError::BadShape));
    }

    #[test]
    fn test_unknown_curve() {
        assert_eq!(
            decode("PUB_P1_abc"),
            Err(FormatError::UnknownCurve("P1".to_string()))
        );
    }

    #[test]
    fn test_bad_base58() {
        // '0', 'O', 'I' and 'l' are outside the bitcoin alphabet
        assert!(matches!(
            decode("PUB_K1_0OIl"),
            Err(FormatError::BadBase58(_))
        ));
    }

    #[test]
    fn test_checksum_salted_by_curve() {
        let token = encode(Prefix::Public, CurveType::K1, &sample_payload(Prefix::Public));
        let swapped = token.replacen("_K1_", "_R1_", 1);
        assert_eq!(decode(&swapped), Err(FormatError::ChecksumMismatch));
    }

    #[test]
    fn test_length_checked_after_checksum() {
        let token = encode(Prefix::Public, CurveType::SM2, &[9u8; 32]);
        assert_eq!(
            decode(&token),
            Err(FormatError::BadLength {
                prefix: Prefix::Public,
                expected: 33,
                actual: 32,
            })
        );

        let short = format!("SIG_K1_{}", bs58::encode([1u8, 2, 3]).into_string());
        assert_eq!(
            decode(&short),
            Err(FormatError::BadLength {
                prefix: Prefix::Signature,
                expected: 65,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(KeyToken::new(Prefix::Private, CurveType::K1, &[1u8; 33]).is_err());
        assert!(KeyToken::new(Prefix::Private, CurveType::K1, &[1u8; 32]).is_ok());
    }

    #[test]
    fn test_debug_redacts_private_payload() {
        let token = KeyToken::new(Prefix::Private, CurveType::R1, &[0xab; 32]).unwrap();
        let debug = format!("{:?}", token);
        assert!(debug.contains("***"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn test_serde_as_string() {
        let token = KeyToken::new(Prefix::Public, CurveType::K1, &[2u8; 33]).unwrap();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{}\"", token));
        let parsed: KeyToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }
}
