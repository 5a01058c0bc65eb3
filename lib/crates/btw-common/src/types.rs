use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::target::Target;

/// Outcome of a successful `inject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionResult {
    pub target: Target,
    /// Path of the shared configuration document that received the region.
    pub config_path: PathBuf,
    /// Every per-agent artifact written, in manifest order.
    pub artifacts: Vec<PathBuf>,
    pub agents_injected: usize,
    pub backup_created: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

/// Installation state of a target inside one project, derived from the
/// ownership markers currently on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionStatus {
    pub is_injected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    /// All workflow ids owning at least one artifact, sorted.
    #[serde(default)]
    pub workflow_ids: Vec<String>,
    /// Workflow id embedded in the shared document's region, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_owner: Option<String>,
    pub has_backup: bool,
}

impl InjectionStatus {
    /// The conservative "nothing installed" answer used when a scan fails.
    #[must_use]
    pub fn not_injected() -> Self {
        Self::default()
    }

    /// Returns `true` if `workflow_id` owns at least one artifact.
    #[must_use]
    pub fn is_owned_by(&self, workflow_id: &str) -> bool {
        self.workflow_ids.iter().any(|id| id == workflow_id)
    }
}
