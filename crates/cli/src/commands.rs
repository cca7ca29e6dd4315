//! Subcommand handlers.
//!
//! Each handler returns the text printed on stdout so that the binary stays a
//! thin wrapper and the handlers can be exercised directly in tests.

use anyhow::{Context, Result};
use keytoken_config::KeytoolConfig;
use keytoken_cryptography::{keys, recover, verify, CurveType, Signer};
use tracing::{debug, info};

use crate::args::{Command, MessageArgs};

/// Runs `command` against `config`.
pub fn execute(command: &Command, config: &KeytoolConfig) -> Result<String> {
    match command {
        Command::Keygen { curve } => keygen(*curve, config),
        Command::Pubkey { private_key } => {
            Ok(keys::private_to_public(private_key).context("cannot derive public key")?)
        }
        Command::Sign { key, message } => sign(key, message, config),
        Command::Recover { signature, message } => {
            let bytes = message_bytes(message)?;
            recover(&bytes, signature)
                .context("cannot recover public key")?
                .context("token is not a signature")
        }
        Command::Verify {
            signature,
            key,
            message,
        } => {
            let bytes = message_bytes(message)?;
            let valid = verify(&bytes, signature, key).context("cannot verify signature")?;
            info!(valid, "signature checked");
            Ok(if valid { "valid" } else { "invalid" }.to_string())
        }
    }
}

fn keygen(curve: Option<CurveType>, config: &KeytoolConfig) -> Result<String> {
    let curve = match curve {
        Some(curve) => curve,
        None => config
            .default_curve
            .parse()
            .with_context(|| format!("invalid default_curve '{}'", config.default_curve))?,
    };
    let pair = keys::new_key_pair(curve);
    info!(curve = %curve, "key pair generated");
    Ok(format!("{}\n{}", pair.private_key, pair.public_key))
}

fn sign(key: &str, message: &MessageArgs, config: &KeytoolConfig) -> Result<String> {
    let bytes = message_bytes(message)?;
    let signer = Signer::from(&config.signer);
    debug!(max_attempts = signer.max_attempts(), "signing");
    Ok(signer.sign(&bytes, key).context("cannot sign message")?)
}

fn message_bytes(message: &MessageArgs) -> Result<Vec<u8>> {
    message.bytes().context("message is not valid hex")
}
