//! Keytoken Configuration Module
//!
//! This module provides the wire-format constants shared by every keytoken
//! crate and the configuration types read by the `keytool` binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Size of a private key payload (big-endian scalar) in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of a compressed public key payload in bytes
pub const PUBLIC_KEY_SIZE: usize = 33;
/// Size of a signature payload (recovery byte, r, s) in bytes
pub const SIGNATURE_SIZE: usize = 65;
/// Size of a field element or scalar in bytes
pub const FIELD_SIZE: usize = 32;
/// Number of RIPEMD-160 bytes appended to a payload before base58 encoding
pub const CHECKSUM_SIZE: usize = 4;
/// Separator between the fields of a textual token
pub const TOKEN_SEPARATOR: char = '_';
/// Offset added to the parity bit to form a signature's recovery byte
pub const RECOVERY_BYTE_OFFSET: u8 = 27;
/// Default cap on canonical-signature attempts within one `sign` call
pub const DEFAULT_MAX_SIGN_ATTEMPTS: u32 = 1000;
/// Curve used by `keytool keygen` when none is configured
pub const DEFAULT_CURVE: &str = "K1";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Canonical signer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Attempts allowed before signing gives up with `ExhaustedRetries`
    pub max_attempts: u32,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_SIGN_ATTEMPTS,
        }
    }
}

impl SignerConfig {
    /// Rejects settings the signer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "signer.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Keytool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeytoolConfig {
    /// Curve tag (`K1`, `R1` or `SM2`) used when `keygen` is given none
    pub default_curve: String,
    pub signer: SignerConfig,
}

impl Default for KeytoolConfig {
    fn default() -> Self {
        Self {
            default_curve: DEFAULT_CURVE.to_string(),
            signer: SignerConfig::default(),
        }
    }
}

impl KeytoolConfig {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: KeytoolConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_curve.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_curve must not be empty".to_string(),
            ));
        }
        self.signer.validate()
    }
}
