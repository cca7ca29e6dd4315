//! # keytoken: checksummed key tokens with recoverable signatures
//!
//! Keys and signatures travel as short text tokens:
//!
//! - `PVT_<curve>_<base58>`: 32-byte private scalar
//! - `PUB_<curve>_<base58>`: 33-byte compressed public key
//! - `SIG_<curve>_<base58>`: 65-byte signature `[27 + parity] || r || s`
//!
//! where `<curve>` is `K1` (secp256k1), `R1` (secp256r1) or `SM2`, and the
//! base58 body ends with a four-byte RIPEMD-160 checksum salted with the curve
//! tag.
//!
//! Signatures are deterministic and canonical, and the signer's public key
//! can be recovered from a signature and its message alone.
//!
//! ## Quick Start
//!
//! ```rust
//! use keytoken::prelude::*;
//!
//! let pair = new_key_pair(CurveType::K1);
//! let signature = sign(b"Hello World!", &pair.private_key)?;
//! let recovered = recover(b"Hello World!", &signature)?;
//! assert_eq!(recovered, Some(pair.public_key.clone()));
//! # Ok::<(), keytoken::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - wire-format constants and `keytool` configuration
//! - [`crypto`] - codec, key derivation, canonical signer and recoverer

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use keytoken_config as config;
pub use keytoken_cryptography as crypto;

pub use keytoken_cryptography::{Error, Result};

/// Common imports for keytoken users
pub mod prelude {
    pub use crate::crypto::{
        decode, encode, new_key_pair, private_to_public, recover, sign, verify, CurveType,
        KeyPair, KeyToken, Prefix, Signer,
    };
}

/// keytoken library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
