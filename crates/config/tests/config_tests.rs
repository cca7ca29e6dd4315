//! Configuration loading tests
//!
//! Covers TOML parsing, defaults for missing keys, validation failures and
//! serde round-trips through JSON.

use keytoken_config::{ConfigError, KeytoolConfig, SignerConfig, DEFAULT_MAX_SIGN_ATTEMPTS};
use std::io::Write;

#[test]
fn test_full_document() {
    let config = KeytoolConfig::from_toml_str(
        r#"
        default_curve = "SM2"

        [signer]
        max_attempts = 16
        "#,
    )
    .unwrap();

    assert_eq!(config.default_curve, "SM2");
    assert_eq!(config.signer.max_attempts, 16);
}

#[test]
fn test_partial_document_keeps_defaults() {
    let config = KeytoolConfig::from_toml_str("default_curve = \"R1\"").unwrap();
    assert_eq!(config.default_curve, "R1");
    assert_eq!(config.signer.max_attempts, DEFAULT_MAX_SIGN_ATTEMPTS);

    let config = KeytoolConfig::from_toml_str("[signer]\nmax_attempts = 3").unwrap();
    assert_eq!(config.default_curve, "K1");
    assert_eq!(config.signer.max_attempts, 3);
}

#[test]
fn test_invalid_documents() {
    let result = KeytoolConfig::from_toml_str("[signer]\nmax_attempts = 0");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    let result = KeytoolConfig::from_toml_str("default_curve = \"\"");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    let result = KeytoolConfig::from_toml_str("[signer]\nmax_attempts = \"many\"");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "default_curve = \"K1\"\n[signer]\nmax_attempts = 42").unwrap();

    let config = KeytoolConfig::load(file.path()).unwrap();
    assert_eq!(config.signer, SignerConfig { max_attempts: 42 });
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = KeytoolConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_json_roundtrip() {
    let config = KeytoolConfig {
        default_curve: "R1".to_string(),
        signer: SignerConfig { max_attempts: 7 },
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: KeytoolConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
