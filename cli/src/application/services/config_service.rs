//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::BtwConfig;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<BtwConfig> {
    store.load()
}

/// Validate and apply `key = value`, then persist the result.
///
/// # Errors
///
/// Returns an error if the key or value is invalid or the store fails.
pub fn set_config_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<BtwConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
