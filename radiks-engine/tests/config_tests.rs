use pretty_assertions::assert_eq;
use radiks_engine::{EngineConfig, Phase, RecordError};
use std::io::Write;

#[test]
fn defaults_verify_and_decrypt() {
    let config = EngineConfig::default();
    assert!(config.verify_signatures);
    assert!(config.decrypt_by_default);
    assert_eq!(config.index.api_base_url, "http://localhost:1260");
}

#[test]
fn partial_toml_fills_defaults() {
    let config = EngineConfig::from_toml_str(
        r#"
        verify_signatures = false

        [index]
        api_base_url = "https://index.example"
        "#,
    )
    .unwrap();
    assert!(!config.verify_signatures);
    assert!(config.decrypt_by_default);
    assert_eq!(config.index.api_base_url, "https://index.example");
    assert_eq!(config.index.timeout_secs, 30);
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
}

#[test]
fn toml_roundtrip() {
    let config = EngineConfig {
        decrypt_by_default: false,
        ..EngineConfig::default()
    };
    let text = config.to_toml_string().unwrap();
    assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn invalid_toml_is_parse_error() {
    let err = EngineConfig::from_toml_str("verify_signatures = \"yes\"").unwrap_err();
    assert!(matches!(err, RecordError::ConfigParse(_)));
    assert_eq!(err.phase(), Phase::Validate);
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "decrypt_by_default = false").unwrap();
    let config = EngineConfig::load(file.path()).unwrap();
    assert!(!config.decrypt_by_default);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, RecordError::ConfigIo(_)));
}
