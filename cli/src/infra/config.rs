//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::BtwConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BTW_CONFIG";

/// `ConfigStore` backed by a YAML file, `~/.btw/config.yaml` by default.
#[derive(Debug, Clone, Default)]
pub struct YamlConfigStore {
    location: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store at the default location (`$BTW_CONFIG` or `~/.btw/config.yaml`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store at an explicit file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Some(path.into()),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<BtwConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!("no config at {}; using defaults", path.display());
            return Ok(BtwConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(BtwConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &BtwConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.location {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        Ok(btw_home()?.join("config.yaml"))
    }
}

/// `~/.btw`, the root of btw's per-user state.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn btw_home() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".btw"))
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}
