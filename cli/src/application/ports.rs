//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use btw_common::Manifest;

use crate::domain::config::BtwConfig;

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// The only way the engine touches storage.
///
/// Every call is a suspension point; callers issue them one at a time.
#[allow(async_fn_in_trait)]
pub trait ProjectFs {
    /// Returns `true` if `path` exists (file or directory).
    async fn exists(&self, path: &Path) -> bool;
    /// Read a UTF-8 file.
    async fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Create or truncate a file with `content`. The parent must exist.
    async fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Create a directory and all missing parents.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a file, or a directory. Without `recursive` a directory must
    /// be empty.
    async fn remove(&self, path: &Path, recursive: bool) -> Result<()>;
    /// Entries directly inside `path`, sorted by name.
    async fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    /// Copy `path` to its backup sibling and return the sibling's path.
    async fn backup(&self, path: &Path) -> Result<PathBuf>;
    /// Copy the backup sibling back over `path` and delete the sibling.
    async fn restore(&self, path: &Path) -> Result<()>;
}

// ── Workflow Library Port ─────────────────────────────────────────────────────

/// Enumerates workflows installed in the local library.
#[allow(async_fn_in_trait)]
pub trait WorkflowCatalog {
    /// Every readable manifest, sorted by id.
    async fn list(&self) -> Result<Vec<Manifest>>;
    /// The manifest with the given id, if installed.
    async fn get(&self, id: &str) -> Result<Option<Manifest>>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence (load/save).
pub trait ConfigStore {
    /// Load configuration, returning defaults when none is stored.
    fn load(&self) -> Result<BtwConfig>;
    /// Persist configuration.
    fn save(&self, config: &BtwConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
