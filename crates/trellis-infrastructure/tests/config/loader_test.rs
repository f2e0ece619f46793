//! Configuration Loader Tests

use serde_json::json;
use tempfile::TempDir;
use trellis_domain::Properties;
use trellis_infrastructure::config::{ConfigLoader, TrellisConfig};
use trellis_infrastructure::constants::DEFAULT_LOG_LEVEL;

#[test]
fn test_config_loader_default() {
    let config = ConfigLoader::new().load().unwrap();

    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.runtime.locale, "en");
    assert!(config.runtime.enforce_declarations);
    assert!(config.packages.is_empty());
}

#[test]
fn test_config_from_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("trellis.toml");
    std::fs::write(
        &config_path,
        r#"
[logging]
level = "debug"

[runtime]
locale = "de"
enforce_declarations = false

[packages.map]
apiKey = "secret"
zoom = 5
"#,
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.runtime.locale, "de");
    assert!(!config.runtime.enforce_declarations);
    let map = &config.packages["map"];
    assert_eq!(map.get("apiKey"), Some(&json!("secret")));
    assert_eq!(map.get_as::<u32>("zoom").unwrap(), 5);
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("saved.toml");

    let mut original = TrellisConfig::default();
    original.runtime.locale = "nl".to_string();
    original
        .packages
        .insert("search".to_string(), Properties::new().with("endpoint", "https://example.org"));

    let loader = ConfigLoader::new().with_config_path(&config_path);
    loader.save_to_file(&original, &config_path).unwrap();
    let loaded = loader.load().unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loader.config_path(), Some(config_path.as_path()));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .load()
        .unwrap();

    assert_eq!(config, TrellisConfig::default());
}

#[test]
fn test_invalid_level_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("trellis.toml");
    std::fs::write(&config_path, "[logging]\nlevel = \"chatty\"\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();
    assert_eq!(err.code(), "configuration");
}
