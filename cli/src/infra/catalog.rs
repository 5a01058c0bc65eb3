//! Infrastructure implementation of the `WorkflowCatalog` port.
//!
//! The library is a directory holding one sub-directory per workflow, each
//! with a `workflow.yaml` (or `workflow.yml`) manifest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use btw_common::Manifest;

use crate::application::ports::WorkflowCatalog;
use crate::domain::config::BtwConfig;
use crate::infra::config::btw_home;

/// Environment variable overriding the library location.
pub const LIBRARY_ENV: &str = "BTW_WORKFLOWS";

const MANIFEST_NAMES: [&str; 2] = ["workflow.yaml", "workflow.yml"];

/// Resolve the library directory: `$BTW_WORKFLOWS`, then `library.path`,
/// then `~/.btw/workflows`.
///
/// # Errors
///
/// Returns an error if the home directory is needed but unknown.
pub fn library_path(config: &BtwConfig) -> Result<PathBuf> {
    if let Ok(val) = std::env::var(LIBRARY_ENV)
        && !val.trim().is_empty()
    {
        return Ok(PathBuf::from(val));
    }
    if let Some(path) = &config.library.path {
        return Ok(path.clone());
    }
    Ok(btw_home()?.join("workflows"))
}

/// Reads manifests from a local workflow library.
#[derive(Debug, Clone)]
pub struct LocalWorkflowCatalog {
    root: PathBuf,
}

impl LocalWorkflowCatalog {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_manifest(dir: &Path) -> Option<Manifest> {
        for name in MANIFEST_NAMES {
            let path = dir.join(name);
            let Ok(content) = tokio::fs::read_to_string(&path).await else {
                continue;
            };
            match serde_yaml::from_str::<Manifest>(&content) {
                Ok(manifest) => return Some(manifest),
                Err(e) => {
                    tracing::warn!("skipping malformed manifest {}: {e}", path.display());
                    return None;
                }
            }
        }
        None
    }
}

impl WorkflowCatalog for LocalWorkflowCatalog {
    async fn list(&self) -> Result<Vec<Manifest>> {
        if !tokio::fs::try_exists(&self.root).await.unwrap_or(false) {
            tracing::debug!("workflow library {} does not exist", self.root.display());
            return Ok(Vec::new());
        }
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("cannot read workflow library {}", self.root.display()))?;
        let mut manifests = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("cannot read workflow library {}", self.root.display()))?
        {
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            if !is_dir {
                continue;
            }
            if let Some(manifest) = Self::read_manifest(&entry.path()).await {
                manifests.push(manifest);
            }
        }
        manifests.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(manifests)
    }

    async fn get(&self, id: &str) -> Result<Option<Manifest>> {
        Ok(self.list().await?.into_iter().find(|m| m.id == id))
    }
}
