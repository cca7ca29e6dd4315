//! Key token cryptography.
//!
//! Checksummed text tokens for private keys (`PVT`), compressed public keys
//! (`PUB`) and recoverable signatures (`SIG`) over secp256k1 (`K1`),
//! secp256r1 (`R1`) and the SM2 curve (`SM2`), together with:
//!
//! - key pair generation and private-to-public derivation ([`keys`])
//! - a deterministic signer that only emits canonical `r` and `s` ([`signer`])
//! - public key recovery from a signature and message ([`recover`])
//!
//! All curve-specific arithmetic sits behind [`curve::CurveGroup`].

pub mod codec;
pub mod curve;
pub mod error;
pub mod hash;
pub mod keys;
pub mod point;
pub mod recover;
pub mod signature;
pub mod signer;

pub use codec::{decode, encode, FormatError, KeyToken, Prefix};
pub use curve::{CurveGroup, CurveType};
pub use error::{Error, Result};
pub use keys::{derive_public, new_key_pair, private_to_public, KeyError, KeyPair};
pub use point::CompressedPoint;
pub use recover::{recover, recover_hash, verify, RecoveryError};
pub use signature::RawSignature;
pub use signer::{is_canonical, sign, SignatureError, Signer};
