//! Command implementations

pub mod config;
pub mod eject;
pub mod inject;
pub mod list;
pub mod status;
pub mod toggle;
pub mod validate;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use btw_common::Target;
use clap::Args;

use crate::app::{AppContext, resolve_project};
use crate::domain::config::BtwConfig;

/// Target and project selection shared by every project-scoped command.
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Target tool: claude, cursor, windsurf or copilot [default: defaults.target]
    #[arg(short, long)]
    pub target: Option<String>,

    /// Project directory [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,
}

/// A resolved target and canonical project root.
#[derive(Debug, Clone)]
pub struct Scope {
    pub target: Target,
    pub project_root: PathBuf,
}

impl ScopeArgs {
    /// Resolve the target (flag, then config default) and the project root.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported target name or a missing project
    /// directory.
    pub fn resolve(&self, app: &AppContext, config: &BtwConfig) -> Result<Scope> {
        let target = match self.target.as_deref() {
            Some(name) => app.engine.resolve_target(name)?,
            None => config.defaults.target,
        };
        let project_root = resolve_project(self.project.as_deref())?;
        tracing::debug!("scope: {target} in {}", project_root.display());
        Ok(Scope {
            target,
            project_root,
        })
    }
}
