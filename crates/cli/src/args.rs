use clap::{Args, Parser, Subcommand, ValueEnum};
use keytoken_cryptography::CurveType;
use std::path::PathBuf;

/// Command-line arguments for keytool
#[derive(Parser, Debug, Clone)]
#[command(
    name = "keytool",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate, sign with and recover checksummed key tokens",
    long_about = "keytool works with PVT_, PUB_ and SIG_ tokens over the K1 (secp256k1), R1 (secp256r1) and SM2 curves. Signatures are canonical and carry enough information to recover the signer's public key."
)]
pub struct CliArgs {
    /// Specifies the config file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// The verbose log level
    #[arg(long = "verbose", value_enum, default_value = "warn", global = true)]
    pub verbose: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a new key pair
    Keygen {
        /// Curve to generate on; defaults to the configured curve
        #[arg(long, value_parser = parse_curve)]
        curve: Option<CurveType>,
    },

    /// Print the public key token for a private key token
    Pubkey {
        /// PVT token
        private_key: String,
    },

    /// Sign a message with a private key token
    Sign {
        /// PVT token
        #[arg(short = 'k', long = "key", env = "KEYTOOL_PRIVATE_KEY")]
        key: String,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Recover the public key token from a signature token
    Recover {
        /// SIG token
        #[arg(short = 's', long = "signature")]
        signature: String,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Check that a signature token recovers to a public key token
    Verify {
        /// SIG token
        #[arg(short = 's', long = "signature")]
        signature: String,

        /// PUB token
        #[arg(short = 'k', long = "key")]
        key: String,

        #[command(flatten)]
        message: MessageArgs,
    },
}

/// Message input shared by `sign`, `recover` and `verify`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MessageArgs {
    /// Message to process (UTF-8, or hex with --hex)
    pub message: String,

    /// Treat the message as hex-encoded bytes
    #[arg(long = "hex")]
    pub hex: bool,
}

impl MessageArgs {
    /// Raw message bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        if self.hex {
            hex::decode(self.message.trim_start_matches("0x"))
        } else {
            Ok(self.message.as_bytes().to_vec())
        }
    }
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level logging
    Trace,
    /// Debug level logging
    Debug,
    /// Info level logging
    Info,
    /// Warning level logging
    Warn,
    /// Error level logging
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn parse_curve(s: &str) -> Result<CurveType, String> {
    s.to_ascii_uppercase()
        .parse::<CurveType>()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["keytool", "keygen"]);
        assert_eq!(args.verbose, LogLevel::Warn);
        assert_eq!(args.config, None);
        assert_eq!(args.command, Command::Keygen { curve: None });
    }

    #[test]
    fn test_curve_is_case_insensitive() {
        let args = CliArgs::parse_from(["keytool", "keygen", "--curve", "sm2"]);
        assert_eq!(
            args.command,
            Command::Keygen {
                curve: Some(CurveType::SM2)
            }
        );
        assert!(CliArgs::try_parse_from(["keytool", "keygen", "--curve", "P1"]).is_err());
    }

    #[test]
    fn test_hex_message() {
        let message = MessageArgs {
            message: "0x48656c6c6f".to_string(),
            hex: true,
        };
        assert_eq!(message.bytes().unwrap(), b"Hello");

        let message = MessageArgs {
            message: "zz".to_string(),
            hex: true,
        };
        assert!(message.bytes().is_err());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }
}
