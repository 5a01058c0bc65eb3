//! Application service: derive installation state from artifact contents.
//!
//! There is no installed-workflows list anywhere: every status check,
//! validation and interactive refresh calls [`scan`] and trusts only what the
//! ownership markers on disk say right now.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::application::ports::ProjectFs;
use crate::domain::marker;
use crate::domain::ownership;
use crate::domain::target::{self, TargetProfile};

/// Ownership of a target's scaffold at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipReport {
    /// Artifacts per owning workflow id.
    pub owned: BTreeMap<String, Vec<PathBuf>>,
    /// Artifact-named files without a marker (user content).
    pub unowned: Vec<PathBuf>,
    /// Backup siblings present in the scaffold.
    pub backups: Vec<PathBuf>,
}

impl OwnershipReport {
    /// Distinct owning workflow ids, sorted.
    pub fn workflow_ids(&self) -> impl Iterator<Item = &str> {
        self.owned.keys().map(String::as_str)
    }

    #[must_use]
    pub fn owns(&self, workflow_id: &str) -> bool {
        self.owned.contains_key(workflow_id)
    }

    #[must_use]
    pub fn artifacts_of(&self, workflow_id: &str) -> &[PathBuf] {
        self.owned.get(workflow_id).map_or(&[], Vec::as_slice)
    }

    /// Every owned artifact regardless of owner.
    pub fn all_owned(&self) -> impl Iterator<Item = &PathBuf> {
        self.owned.values().flatten()
    }

    /// The workflow id owning `path`, if any.
    #[must_use]
    pub fn owner_of(&self, path: &Path) -> Option<&str> {
        self.owned
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p == path))
            .map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}

/// Read every candidate artifact in the target's scaffold and group them by
/// owner.
///
/// Never fails: a missing scaffold yields an empty report, and unreadable
/// files are skipped.
pub async fn scan(
    fs: &impl ProjectFs,
    profile: &TargetProfile,
    project_root: &Path,
) -> OwnershipReport {
    let mut report = OwnershipReport::default();
    let dir = profile.scaffold_path(project_root);
    if !fs.exists(&dir).await {
        return report;
    }
    let entries = match fs.list_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("cannot list {}: {e:#}", dir.display());
            return report;
        }
    };

    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if target::is_backup_name(name) {
            report.backups.push(path);
            continue;
        }
        if !profile.is_artifact_name(name) {
            continue;
        }
        let content = match fs.read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("skipping unreadable {}: {e:#}", path.display());
                continue;
            }
        };
        match ownership::parse_artifact_owner(&content) {
            Some(id) => report.owned.entry(id.to_string()).or_default().push(path),
            None => report.unowned.push(path),
        }
    }
    report
}

/// Workflow id embedded in the shared document's region, if the document
/// exists and holds a well-formed region.
pub async fn shared_owner(
    fs: &impl ProjectFs,
    profile: &TargetProfile,
    project_root: &Path,
) -> Option<String> {
    let path = profile.shared_document_path(project_root);
    if !fs.exists(&path).await {
        return None;
    }
    let document = fs.read_to_string(&path).await.ok()?;
    let region = marker::region(&document)?;
    ownership::parse_region_owner(region).map(String::from)
}
