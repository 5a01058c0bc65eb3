//! Pure manifest validation: no I/O, no async.
//!
//! Ids become file names inside the project, so they are checked before any
//! path interpolation to prevent path traversal (CWE-22).

use std::collections::HashSet;
use std::sync::LazyLock;

use btw_common::Manifest;
use regex::Regex;

use crate::domain::error::InjectionError;

/// Allowed shape for workflow and agent ids.
pub static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern; cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").expect("valid regex")
});

/// Returns `true` if `id` is safe to use as a file stem and marker value.
pub fn is_valid_id(id: &str) -> bool {
    ID_RE.is_match(id) && !id.contains("..")
}

/// Validate a manifest before injection. Returns `Ok(())` or an error listing
/// every violation.
///
/// # Errors
///
/// Returns `InjectionError::InvalidManifest` if any check fails.
pub fn validate_manifest(manifest: &Manifest) -> Result<(), InjectionError> {
    let mut errors: Vec<String> = Vec::new();

    if !is_valid_id(&manifest.id) {
        errors.push(format!(
            "workflow id '{}' must be alphanumeric with '.', '_' or '-'",
            manifest.id
        ));
    }

    if manifest.agents.is_empty() {
        errors.push("workflow defines no agents".to_string());
    }

    let mut seen = HashSet::new();
    for agent in &manifest.agents {
        if !is_valid_id(&agent.id) {
            errors.push(format!(
                "agent id '{}' must be alphanumeric with '.', '_' or '-'",
                agent.id
            ));
        }
        if !seen.insert(agent.id.as_str()) {
            errors.push(format!("agent id '{}' is defined more than once", agent.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(InjectionError::InvalidManifest(errors.join("\n")))
    }
}
