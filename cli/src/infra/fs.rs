//! Filesystem infrastructure: implements `ProjectFs` on `tokio::fs`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ProjectFs;
use crate::domain::target::backup_path;

/// Production filesystem implementation of `ProjectFs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl ProjectFs for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading file {}", path.display()))
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("writing file {}", path.display()))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .with_context(|| format!("creating directory {}", path.display()))
    }

    async fn remove(&self, path: &Path, recursive: bool) -> Result<()> {
        let meta = tokio::fs::symlink_metadata(path)
            .await
            .with_context(|| format!("inspecting {}", path.display()))?;
        let result = if !meta.is_dir() {
            tokio::fs::remove_file(path).await
        } else if recursive {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_dir(path).await
        };
        result.with_context(|| format!("removing {}", path.display()))
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("listing directory {}", path.display()))?;
        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("listing directory {}", path.display()))?
        {
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    async fn backup(&self, path: &Path) -> Result<PathBuf> {
        let backup = backup_path(path);
        tokio::fs::copy(path, &backup)
            .await
            .with_context(|| format!("backing up {} to {}", path.display(), backup.display()))?;
        Ok(backup)
    }

    async fn restore(&self, path: &Path) -> Result<()> {
        let backup = backup_path(path);
        tokio::fs::copy(&backup, path)
            .await
            .with_context(|| format!("restoring {} from {}", path.display(), backup.display()))?;
        tokio::fs::remove_file(&backup)
            .await
            .with_context(|| format!("removing backup {}", backup.display()))
    }
}
