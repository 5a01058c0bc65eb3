//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed object on
//! stdout; failures print the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use btw_common::{InjectionResult, InjectionStatus, Target};
use serde::Serialize;

use crate::application::services::toggle::ToggleItem;
use crate::domain::config::BtwConfig;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

/// Renders command results as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Render the result of an injection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_inject(&self, workflow_id: &str, result: &InjectionResult) -> Result<()> {
        print(&serde_json::json!({
            "workflowId": workflow_id,
            "result": result,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_eject(&self, target: Target, workflow_id: Option<&str>) -> Result<()> {
        print(&serde_json::json!({
            "ejected": true,
            "target": target,
            "workflowId": workflow_id,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_status(&self, target: Target, status: &InjectionStatus) -> Result<()> {
        print(&serde_json::json!({
            "target": target,
            "status": status,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_validate(&self, target: Target, valid: bool) -> Result<()> {
        print(&serde_json::json!({
            "target": target,
            "valid": valid,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_list(&self, target: Target, items: &[ToggleItem]) -> Result<()> {
        print(&serde_json::json!({
            "target": target,
            "workflows": items,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &BtwConfig, path: &Path) -> Result<()> {
        print(&serde_json::json!({
            "path": path,
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config_set(&self, key: &str, config: &BtwConfig) -> Result<()> {
        print(&serde_json::json!({
            "updated": key,
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        print(&serde_json::json!({ "version": version }))
    }
}
