//! Application service: the per-target injection strategy.
//!
//! One [`InjectionStrategy`] exists per [`Target`]; the target's scaffold
//! profile supplies every path and rendering knob. All filesystem calls go
//! through [`ProjectFs`] and are awaited one at a time, so a failure partway
//! through leaves a deterministic partial state that a forced re-injection
//! repairs.

use std::path::{Path, PathBuf};

use btw_common::{AgentDefinition, InjectionResult, InjectionStatus, Manifest, Target};
use chrono::{DateTime, Utc};

use crate::application::ports::ProjectFs;
use crate::application::services::ownership_scan::{self, OwnershipReport};
use crate::domain::error::InjectionError;
use crate::domain::marker::{self, MergeMode};
use crate::domain::ownership;
use crate::domain::target::{self, TargetProfile};
use crate::domain::{artifact, shared_doc, validate};

/// Options for [`InjectionStrategy::inject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectOptions {
    pub project_root: PathBuf,
    /// Snapshot files before they are overwritten or removed.
    pub backup: bool,
    /// Replace this workflow's existing artifacts instead of failing.
    pub force: bool,
    /// Always append to the shared document when no region is located.
    pub merge: bool,
}

impl InjectOptions {
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            backup: true,
            force: false,
            merge: false,
        }
    }
}

/// Options for [`InjectionStrategy::eject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EjectOptions {
    pub project_root: PathBuf,
    /// Eject only this workflow; every btw-owned artifact when `None`.
    pub workflow_id: Option<String>,
    /// Remove the scaffold directory if it ends up empty.
    pub clean: bool,
    /// Put back a pre-injection backup of the shared document.
    pub restore: bool,
}

impl EjectOptions {
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            workflow_id: None,
            clean: false,
            restore: false,
        }
    }

    #[must_use]
    pub fn workflow(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }
}

/// Inject, eject, inspect and validate one target's scaffold.
#[derive(Debug, Clone, Copy)]
pub struct InjectionStrategy {
    profile: &'static TargetProfile,
}

impl InjectionStrategy {
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            profile: target::profile(target),
        }
    }

    #[must_use]
    pub fn target(&self) -> Target {
        self.profile.target
    }

    #[must_use]
    pub fn profile(&self) -> &'static TargetProfile {
        self.profile
    }

    /// Render one agent's artifact, ownership marker included.
    #[must_use]
    pub fn generate_artifact(
        &self,
        agent: &AgentDefinition,
        workflow_id: &str,
        injected_at: DateTime<Utc>,
    ) -> String {
        artifact::render(self.profile, agent, workflow_id, injected_at)
    }

    /// Render the sentinel-framed region for the shared document.
    #[must_use]
    pub fn generate_shared_document(&self, manifest: &Manifest, injected_at: DateTime<Utc>) -> String {
        shared_doc::render(manifest, injected_at)
    }

    /// Write the manifest's artifacts and shared-document region.
    ///
    /// # Errors
    ///
    /// Precondition errors (invalid manifest, already injected without
    /// `force`, conflicting files) are raised before any write. Any port
    /// failure afterwards is an [`InjectionError::Io`].
    pub async fn inject(
        &self,
        fs: &impl ProjectFs,
        manifest: &Manifest,
        options: &InjectOptions,
    ) -> Result<InjectionResult, InjectionError> {
        validate::validate_manifest(manifest)?;
        let root = options.project_root.as_path();
        let report = ownership_scan::scan(fs, self.profile, root).await;

        if report.owns(&manifest.id) && !options.force {
            return Err(InjectionError::AlreadyInjected {
                workflow_id: manifest.id.clone(),
                target: self.target(),
            });
        }

        let planned: Vec<(&AgentDefinition, PathBuf)> = manifest
            .agents
            .iter()
            .map(|agent| (agent, self.profile.artifact_path(root, &agent.id)))
            .collect();
        for (_, path) in &planned {
            check_conflict(&report, &manifest.id, path, options.force)?;
        }

        let scaffold = self.profile.scaffold_path(root);
        create_dir(fs, &scaffold).await?;
        let config_path = self.profile.shared_document_path(root);
        if let Some(parent) = config_path.parent() {
            create_dir(fs, parent).await?;
        }

        let mut backups = Vec::new();
        if options.backup {
            let mut at_risk = Vec::new();
            if !keeps_clean_backup(fs, &config_path).await {
                at_risk.push(config_path.as_path());
            }
            at_risk.extend(report.artifacts_of(&manifest.id).iter().map(PathBuf::as_path));
            at_risk.extend(
                planned
                    .iter()
                    .map(|(_, path)| path.as_path())
                    .filter(|path| report.unowned.iter().any(|u| u == path)),
            );
            for path in at_risk {
                if let Some(backup) = try_backup(fs, path).await {
                    backups.push(backup);
                }
            }
        }

        if options.force {
            for path in report.artifacts_of(&manifest.id) {
                fs.remove(path, false)
                    .await
                    .map_err(|e| InjectionError::io(format!("Failed to remove {}", path.display()), e))?;
            }
        }

        let injected_at = Utc::now();
        let mut artifacts = Vec::with_capacity(planned.len());
        for (agent, path) in planned {
            let content = self.generate_artifact(agent, &manifest.id, injected_at);
            fs.write(&path, &content)
                .await
                .map_err(|e| InjectionError::io(format!("Failed to write {}", path.display()), e))?;
            tracing::debug!("wrote {}", path.display());
            artifacts.push(path);
        }

        let existing = read_optional(fs, &config_path).await?;
        let region = self.generate_shared_document(manifest, injected_at);
        let document = marker::merge(existing.as_deref(), &region, MergeMode::from_flag(options.merge));
        fs.write(&config_path, &document)
            .await
            .map_err(|e| InjectionError::io(format!("Failed to write {}", config_path.display()), e))?;

        tracing::info!(
            workflow = %manifest.id,
            tool = %self.target(),
            agents = artifacts.len(),
            "workflow injected"
        );
        let backup_path = backups.into_iter().next();
        Ok(InjectionResult {
            target: self.target(),
            config_path,
            agents_injected: artifacts.len(),
            artifacts,
            backup_created: backup_path.is_some(),
            backup_path,
        })
    }

    /// Remove owned artifacts and, when it belongs to the ejected workflow,
    /// the shared-document region. A no-op when nothing is owned.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Io`] if a removal or rewrite fails.
    pub async fn eject(&self, fs: &impl ProjectFs, options: &EjectOptions) -> Result<(), InjectionError> {
        let root = options.project_root.as_path();
        let report = ownership_scan::scan(fs, self.profile, root).await;
        let owned: Vec<&PathBuf> = match options.workflow_id.as_deref() {
            Some(id) => report.artifacts_of(id).iter().collect(),
            None => report.all_owned().collect(),
        };

        for path in &owned {
            fs.remove(path, false)
                .await
                .map_err(|e| InjectionError::io(format!("Failed to remove {}", path.display()), e))?;
            let backup = target::backup_path(path);
            if fs.exists(&backup).await
                && let Err(e) = fs.remove(&backup, false).await
            {
                tracing::warn!("could not remove backup {}: {e:#}", backup.display());
            }
        }

        let config_path = self.profile.shared_document_path(root);
        if let Some(document) = read_optional(fs, &config_path).await? {
            self.strip_region(fs, &config_path, &document, options).await?;
        }

        if options.clean {
            remove_empty_dir(fs, &self.profile.scaffold_path(root)).await?;
        }

        tracing::info!(
            workflow = options.workflow_id.as_deref().unwrap_or("*"),
            tool = %self.target(),
            removed = owned.len(),
            "workflow ejected"
        );
        Ok(())
    }

    async fn strip_region(
        &self,
        fs: &impl ProjectFs,
        config_path: &Path,
        document: &str,
        options: &EjectOptions,
    ) -> Result<(), InjectionError> {
        let Some(region) = marker::region(document) else {
            if marker::has_btw_content(document) {
                tracing::warn!(
                    "{} has an incomplete btw region; leaving it untouched",
                    config_path.display()
                );
            }
            return Ok(());
        };
        if let Some(id) = options.workflow_id.as_deref()
            && ownership::parse_region_owner(region) != Some(id)
        {
            return Ok(());
        }
        let Some(remainder) = marker::strip(document) else {
            return Ok(());
        };

        if options.restore && self.restore_backup(fs, config_path).await? {
            return Ok(());
        }
        let result = if remainder.trim().is_empty() {
            fs.remove(config_path, false).await
        } else {
            fs.write(config_path, &remainder).await
        };
        result.map_err(|e| InjectionError::io(format!("Failed to update {}", config_path.display()), e))
    }

    /// Returns `true` if a clean pre-injection backup was put back.
    async fn restore_backup(&self, fs: &impl ProjectFs, config_path: &Path) -> Result<bool, InjectionError> {
        let backup = target::backup_path(config_path);
        let Some(snapshot) = read_optional(fs, &backup).await? else {
            return Ok(false);
        };
        if marker::has_btw_content(&snapshot) {
            tracing::debug!("discarding stale backup {}", backup.display());
            if let Err(e) = fs.remove(&backup, false).await {
                tracing::warn!("could not remove backup {}: {e:#}", backup.display());
            }
            return Ok(false);
        }
        fs.restore(config_path)
            .await
            .map_err(|e| InjectionError::io(format!("Failed to restore {}", config_path.display()), e))?;
        Ok(true)
    }

    /// Installation state derived from the markers on disk. Never fails.
    pub async fn get_status(&self, fs: &impl ProjectFs, project_root: &Path) -> InjectionStatus {
        let report = ownership_scan::scan(fs, self.profile, project_root).await;
        let shared_owner = ownership_scan::shared_owner(fs, self.profile, project_root).await;
        let shared_backup = target::backup_path(&self.profile.shared_document_path(project_root));
        let has_backup = !report.backups.is_empty() || fs.exists(&shared_backup).await;

        let workflow_ids: Vec<String> = report.workflow_ids().map(String::from).collect();
        let workflow_id = shared_owner
            .as_ref()
            .filter(|owner| report.owns(owner))
            .or_else(|| workflow_ids.first())
            .cloned();

        InjectionStatus {
            is_injected: !workflow_ids.is_empty(),
            workflow_id,
            workflow_ids,
            shared_owner,
            has_backup,
        }
    }

    /// Re-read every owned artifact and JSON file in the scaffold. Returns
    /// `false` when nothing is injected or anything fails to parse.
    pub async fn validate(&self, fs: &impl ProjectFs, project_root: &Path) -> bool {
        let report = ownership_scan::scan(fs, self.profile, project_root).await;
        if report.is_empty() {
            return false;
        }
        for path in report.all_owned() {
            let Ok(content) = fs.read_to_string(path).await else {
                return false;
            };
            if let Err(e) = artifact::parse(&content) {
                tracing::debug!("{} is invalid: {e}", path.display());
                return false;
            }
        }

        let Ok(entries) = fs.list_dir(&self.profile.scaffold_path(project_root)).await else {
            return false;
        };
        for path in entries
            .iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        {
            let Ok(content) = fs.read_to_string(path).await else {
                return false;
            };
            if let Err(e) = serde_json::from_str::<serde_json::Value>(&content) {
                tracing::debug!("{} is invalid JSON: {e}", path.display());
                return false;
            }
        }
        true
    }
}

fn check_conflict(
    report: &OwnershipReport,
    workflow_id: &str,
    path: &Path,
    force: bool,
) -> Result<(), InjectionError> {
    match report.owner_of(path) {
        Some(owner) if owner != workflow_id => Err(InjectionError::ArtifactConflict {
            path: path.to_path_buf(),
            owner: Some(owner.to_string()),
        }),
        Some(_) => Ok(()),
        None if !force && report.unowned.iter().any(|u| u == path) => {
            Err(InjectionError::ArtifactConflict {
                path: path.to_path_buf(),
                owner: None,
            })
        }
        None => Ok(()),
    }
}

async fn create_dir(fs: &impl ProjectFs, path: &Path) -> Result<(), InjectionError> {
    fs.create_dir_all(path)
        .await
        .map_err(|e| InjectionError::io(format!("Failed to create {}", path.display()), e))
}

async fn read_optional(fs: &impl ProjectFs, path: &Path) -> Result<Option<String>, InjectionError> {
    if !fs.exists(path).await {
        return Ok(None);
    }
    fs.read_to_string(path)
        .await
        .map(Some)
        .map_err(|e| InjectionError::io(format!("Failed to read {}", path.display()), e))
}

/// Best-effort snapshot; failures are logged and swallowed.
/// A shared document that already carries btw content must not overwrite a
/// backup taken before the first injection.
async fn keeps_clean_backup(fs: &impl ProjectFs, config_path: &Path) -> bool {
    let backup = target::backup_path(config_path);
    match (
        fs.read_to_string(config_path).await,
        fs.read_to_string(&backup).await,
    ) {
        (Ok(current), Ok(snapshot)) => {
            marker::has_btw_content(&current) && !marker::has_btw_content(&snapshot)
        }
        _ => false,
    }
}

async fn try_backup(fs: &impl ProjectFs, path: &Path) -> Option<PathBuf> {
    if !fs.exists(path).await {
        return None;
    }
    match fs.backup(path).await {
        Ok(backup) => Some(backup),
        Err(e) => {
            tracing::warn!("backup of {} failed: {e:#}", path.display());
            None
        }
    }
}

async fn remove_empty_dir(fs: &impl ProjectFs, dir: &Path) -> Result<(), InjectionError> {
    if !fs.exists(dir).await {
        return Ok(());
    }
    let entries = fs
        .list_dir(dir)
        .await
        .map_err(|e| InjectionError::io(format!("Failed to list {}", dir.display()), e))?;
    if entries.is_empty() {
        fs.remove(dir, false)
            .await
            .map_err(|e| InjectionError::io(format!("Failed to remove {}", dir.display()), e))?;
    }
    Ok(())
}
