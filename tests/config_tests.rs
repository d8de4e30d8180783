use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tilewatch::{GridSpec, SettingsStore, TileConfig};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_settings_path() -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "tilewatch-settings-{}-{}.json",
        std::process::id(),
        n
    ));
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn test_default_config_is_valid() {
    let config = TileConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.grid, GridSpec::new(4, 6));
    assert_eq!(config.threshold, 0.1);
    assert_eq!(config.min_ocr_confidence, 50.0);
    assert_eq!(config.capture_interval().as_secs(), 5);
    assert_eq!(config.capture_timeout().as_secs(), 10);
    assert_eq!(config.ocr_cooldown().as_secs(), 20);
}

#[test]
fn test_invalid_configs_are_rejected() {
    let mut config = TileConfig::default();
    config.threshold = 1.5;
    assert!(config.validate().is_err());

    let mut config = TileConfig::default();
    config.grid = GridSpec::new(0, 6);
    assert!(config.validate().is_err());

    let mut config = TileConfig::default();
    config.min_ocr_confidence = 120.0;
    assert!(config.validate().is_err());

    let mut config = TileConfig::default();
    config.capture_interval_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_file_yields_defaults() {
    let path = temp_settings_path();
    let store = SettingsStore::new(path.clone()).unwrap();
    assert_eq!(store.config(), TileConfig::default());
    assert!(!path.exists());
}

#[test]
fn test_update_persists_and_reloads() {
    let path = temp_settings_path();
    let store = SettingsStore::new(path.clone()).unwrap();

    let mut config = TileConfig::default();
    config.grid = GridSpec::new(5, 5);
    config.threshold = 0.25;
    store.update(config.clone()).unwrap();
    assert_eq!(store.config(), config);

    let reopened = SettingsStore::new(path.clone()).unwrap();
    assert_eq!(reopened.config(), config);

    let _ = fs::remove_file(path);
}

#[test]
fn test_invalid_update_is_not_persisted() {
    let path = temp_settings_path();
    let store = SettingsStore::new(path.clone()).unwrap();

    let mut config = TileConfig::default();
    config.threshold = -1.0;
    assert!(store.update(config).is_err());
    assert_eq!(store.config(), TileConfig::default());
    assert!(!path.exists());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let path = temp_settings_path();
    fs::write(&path, r#"{ "threshold": 0.3, "grid": { "rows": 2, "columns": 3 } }"#).unwrap();

    let config = SettingsStore::new(path.clone()).unwrap().config();
    assert_eq!(config.threshold, 0.3);
    assert_eq!(config.grid, GridSpec::new(2, 3));
    assert_eq!(config.capture_interval_secs, 5);

    let _ = fs::remove_file(path);
}

#[test]
fn test_corrupt_or_invalid_file_falls_back_to_defaults() {
    let path = temp_settings_path();
    fs::write(&path, "not json").unwrap();
    assert_eq!(SettingsStore::new(path.clone()).unwrap().config(), TileConfig::default());

    fs::write(&path, r#"{ "threshold": 4.0 }"#).unwrap();
    let store = SettingsStore::new(path.clone()).unwrap();
    assert_eq!(store.config(), TileConfig::default());
    assert!(store.reload().is_err());

    let _ = fs::remove_file(path);
}
