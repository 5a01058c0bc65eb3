//! Domain types and validators for btw configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;

use anyhow::Result;
use btw_common::Target;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "defaults.target",
    "inject.backup",
    "inject.merge",
    "library.path",
];
pub const VALID_TARGETS: &[&str] = &["claude", "cursor", "windsurf", "copilot"];
pub const VALID_BOOLS: &[&str] = &["true", "false"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.btw/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BtwConfig {
    pub defaults: DefaultsConfig,
    pub inject: InjectConfig,
    pub library: LibraryConfig,
}

/// Defaults applied when a command omits a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Target used when `--target` is not given.
    #[serde(default = "default_target")]
    pub target: Target,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
        }
    }
}

fn default_target() -> Target {
    Target::Claude
}

/// Injection behaviour defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectConfig {
    /// Snapshot files before overwriting them.
    #[serde(default = "default_true")]
    pub backup: bool,
    /// Append to the shared document instead of replacing a dangling region.
    #[serde(default)]
    pub merge: bool,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            backup: true,
            merge: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Where installed workflows live.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LibraryConfig {
    /// Library directory; `~/.btw/workflows` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl BtwConfig {
    /// Apply an already validated `key = value` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value is not valid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "defaults.target" => self.defaults.target = value.parse()?,
            "inject.backup" => self.inject.backup = value == "true",
            "inject.merge" => self.inject.merge = value == "true",
            "library.path" => self.library.path = Some(PathBuf::from(value)),
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let allowed = match key {
        "defaults.target" => VALID_TARGETS,
        "inject.backup" | "inject.merge" => VALID_BOOLS,
        "library.path" if !value.trim().is_empty() => return Ok(()),
        "library.path" => &["<non-empty path>"][..],
        _ => return Ok(()),
    };
    if !allowed.contains(&value) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: allowed.join(", "),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
