//! Property-based tests for the token codec and the canonical signer.

use keytoken_cryptography::{
    decode, encode, is_canonical, new_key_pair, recover, sign, CurveType, FormatError, Prefix,
    RawSignature,
};
use proptest::prelude::*;

fn curve_strategy() -> impl Strategy<Value = CurveType> {
    prop_oneof![Just(CurveType::K1), Just(CurveType::R1), Just(CurveType::SM2)]
}

fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        Just(Prefix::Private),
        Just(Prefix::Public),
        Just(Prefix::Signature)
    ]
}

fn token_parts() -> impl Strategy<Value = (Prefix, CurveType, Vec<u8>)> {
    (prefix_strategy(), curve_strategy()).prop_flat_map(|(prefix, curve)| {
        (
            Just(prefix),
            Just(curve),
            prop::collection::vec(any::<u8>(), prefix.payload_len()),
        )
    })
}

mod codec_properties {
    use super::*;

    proptest! {
        /// Decoding an encoded token returns the same triple
        #[test]
        fn prop_roundtrip((prefix, curve, payload) in token_parts()) {
            let token = encode(prefix, curve, &payload);
            let decoded = decode(&token).unwrap();
            prop_assert_eq!(decoded.prefix(), prefix);
            prop_assert_eq!(decoded.curve_type(), curve);
            prop_assert_eq!(decoded.payload(), &payload[..]);
        }

        /// Any single bit flip in the checksum bytes is caught
        #[test]
        fn prop_checksum_bit_flip(
            (prefix, curve, payload) in token_parts(),
            byte in 0usize..4,
            bit in 0u8..8,
        ) {
            let token = encode(prefix, curve, &payload);
            let body = token.rsplit('_').next().unwrap();
            let mut bytes = bs58::decode(body).into_vec().unwrap();
            let index = bytes.len() - 4 + byte;
            bytes[index] ^= 1 << bit;

            let tampered = format!("{}_{}_{}", prefix, curve, bs58::encode(&bytes).into_string());
            prop_assert_eq!(decode(&tampered), Err(FormatError::ChecksumMismatch));
        }

        /// Arbitrary strings never panic the decoder
        #[test]
        fn prop_decode_total(input in ".{0,80}") {
            let _ = decode(&input);
        }
    }
}

mod signer_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Every produced signature is canonical and recovers its signer
        #[test]
        fn prop_sign_canonical_and_recoverable(
            curve in curve_strategy(),
            message in prop::collection::vec(any::<u8>(), 0..128),
        ) {
            let pair = new_key_pair(curve);
            let token = sign(&message, &pair.private_key).unwrap();

            let decoded = decode(&token).unwrap();
            let signature = RawSignature::from_payload(decoded.payload()).unwrap();
            prop_assert!(is_canonical(signature.r()));
            prop_assert!(is_canonical(signature.s()));

            prop_assert_eq!(recover(&message, &token).unwrap(), Some(pair.public_key.clone()));
        }
    }
}
