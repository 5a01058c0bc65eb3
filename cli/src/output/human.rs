//! Human-readable terminal renderer.

use std::path::Path;

use btw_common::{InjectionResult, InjectionStatus, Target};
use owo_colors::OwoColorize as _;

use crate::application::services::toggle::ToggleItem;
use crate::domain::config::BtwConfig;
use crate::output::OutputContext;

/// Renders command results as human-readable terminal output using
/// `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("btw {version}");
    }

    /// Render a completed injection.
    pub fn render_inject(&self, workflow_id: &str, result: &InjectionResult) {
        self.ctx.success(&format!(
            "Injected '{workflow_id}' into {} ({} agent{})",
            result.target,
            result.agents_injected,
            if result.agents_injected == 1 { "" } else { "s" }
        ));
        for path in &result.artifacts {
            self.ctx.kv("  wrote", &path.display().to_string());
        }
        self.ctx
            .kv("  updated", &result.config_path.display().to_string());
        if let Some(backup) = &result.backup_path {
            self.ctx.info(&format!("Backup saved to {}", backup.display()));
        }
    }

    /// Render a completed ejection.
    pub fn render_eject(&self, target: Target, workflow_id: Option<&str>) {
        match workflow_id {
            Some(id) => self.ctx.success(&format!("Ejected '{id}' from {target}")),
            None => self
                .ctx
                .success(&format!("Ejected all btw workflows from {target}")),
        }
    }

    /// Render the installation status of one target.
    pub fn render_status(&self, target: Target, status: &InjectionStatus) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.kv("Target:   ", target.as_str());
        if status.is_injected {
            self.ctx.kv(
                "Status:   ",
                &format!("{}", "injected".style(self.ctx.styles.active)),
            );
            self.ctx.kv("Workflows:", &status.workflow_ids.join(", "));
        } else {
            self.ctx.kv("Status:   ", "not injected");
        }
        if let Some(owner) = &status.shared_owner {
            self.ctx.kv("Shared:   ", owner);
            if !status.is_owned_by(owner) {
                self.ctx.warn(&format!(
                    "The shared document region belongs to '{owner}', which owns no artifacts"
                ));
            }
        }
        self.ctx
            .kv("Backup:   ", if status.has_backup { "yes" } else { "no" });
    }

    /// Render a validation verdict.
    pub fn render_validate(&self, target: Target, valid: bool) {
        if valid {
            self.ctx.success(&format!("{target} configuration is valid"));
        } else {
            self.ctx.error(&format!(
                "{target} configuration is invalid or nothing is injected"
            ));
        }
    }

    /// Render the library listing for a target.
    pub fn render_list(&self, target: Target, items: &[ToggleItem]) {
        if self.ctx.quiet {
            return;
        }
        if items.is_empty() {
            println!("No workflows for {target}. Install one into the workflow library.");
            return;
        }
        println!("Workflows for {target}:\n");
        for item in items {
            let mark = if item.active {
                format!("{}", "●".style(self.ctx.styles.active))
            } else {
                format!("{}", "○".style(self.ctx.styles.dim))
            };
            println!(
                "  {mark} {:<24} {}",
                item.workflow_id,
                item.description.style(self.ctx.styles.dim)
            );
        }
    }

    /// Confirm a changed setting.
    pub fn render_config_set(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }

    /// Render the current btw configuration.
    pub fn render_config(&self, config: &BtwConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<20} {}", "defaults.target:", config.defaults.target);
        println!("  {:<20} {}", "inject.backup:", config.inject.backup);
        println!("  {:<20} {}", "inject.merge:", config.inject.merge);
        println!(
            "  {:<20} {}",
            "library.path:",
            config
                .library
                .path
                .as_ref()
                .map_or_else(|| "(default)".to_string(), |p| p.display().to_string())
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["BTW_CONFIG", "BTW_WORKFLOWS", "BTW_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}
