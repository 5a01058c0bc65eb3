//! Config persistence and the config use-cases.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use anyhow::Result;
use btw_cli::application::ports::ConfigStore;
use btw_cli::application::services::config_service;
use btw_cli::domain::config::BtwConfig;
use btw_cli::infra::config::YamlConfigStore;
use btw_common::Target;
use mockall::mock;
use tempfile::TempDir;

mock! {
    Store {}
    impl ConfigStore for Store {
        fn load(&self) -> Result<BtwConfig>;
        fn save(&self, config: &BtwConfig) -> Result<()>;
        fn path(&self) -> Result<PathBuf>;
    }
}

#[test]
fn missing_or_empty_file_yields_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    let store = YamlConfigStore::at(&path);

    let config = store.load().unwrap();
    assert_eq!(config.defaults.target, Target::Claude);
    assert!(config.inject.backup);

    std::fs::write(&path, "\n").unwrap();
    assert!(store.load().unwrap().inject.backup);
}

#[test]
fn save_then_load_keeps_values_and_restricts_mode() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested/config.yaml");
    let store = YamlConfigStore::at(&path);

    let mut config = BtwConfig::default();
    config.set("defaults.target", "windsurf").unwrap();
    config.set("inject.merge", "true").unwrap();
    store.save(&config).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.defaults.target, Target::Windsurf);
    assert!(loaded.inject.merge);
    assert_eq!(store.path().unwrap(), path);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn malformed_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "defaults: [oops").unwrap();
    let err = YamlConfigStore::at(&path).load().unwrap_err();
    assert!(format!("{err:#}").contains("cannot parse"));
}

#[test]
fn set_config_value_persists_validated_value() {
    let mut store = MockStore::new();
    store.expect_load().returning(|| Ok(BtwConfig::default()));
    store
        .expect_save()
        .withf(|config| !config.inject.backup)
        .times(1)
        .returning(|_| Ok(()));

    let config = config_service::set_config_value(&store, "inject.backup", "false").unwrap();
    assert!(!config.inject.backup);
}

#[test]
fn set_config_value_rejects_bad_input_without_saving() {
    let mut store = MockStore::new();
    store.expect_load().returning(|| Ok(BtwConfig::default()));
    store.expect_save().never();

    let err = config_service::set_config_value(&store, "defaults.target", "vscode").unwrap_err();
    assert!(err.to_string().contains("Invalid value"));
    let err = config_service::set_config_value(&store, "security.level", "strict").unwrap_err();
    assert!(err.to_string().contains("Unknown setting"));
}
