// lib/crates/btw-common/src/manifest.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::target::Target;

/// Workflow manifest (`workflow.yaml`): a named, versioned bundle of agent
/// definitions. Treated as an immutable value once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub targets: BTreeSet<Target>,
    #[serde(default)]
    pub agents: Vec<AgentDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

impl Manifest {
    /// Returns `true` if the manifest declares support for `target`.
    #[must_use]
    pub fn supports(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }
}

/// One agent persona inside a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw prompt body, written verbatim after the artifact header.
    #[serde(alias = "prompt")]
    pub system_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
