//! `btw inject`: write a library workflow into a project.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::WorkflowCatalog;
use crate::application::services::config_service;
use crate::application::InjectOptions;
use crate::commands::ScopeArgs;
use crate::domain::InjectionError;
use crate::output::progress;

/// Arguments for the inject command.
#[derive(Args, Debug)]
pub struct InjectArgs {
    /// Workflow id from the library
    pub workflow: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Replace this workflow's existing artifacts
    #[arg(short, long)]
    pub force: bool,

    /// Always append to the shared document instead of replacing a stale region
    #[arg(long)]
    pub merge: bool,

    /// Do not back up files before overwriting them
    #[arg(long)]
    pub no_backup: bool,
}

/// Run the inject command.
///
/// # Errors
///
/// Returns an error if the workflow is unknown or injection fails.
pub async fn run(app: &AppContext, args: &InjectArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let scope = args.scope.resolve(app, &config)?;
    let catalog = app.catalog(&config)?;
    let manifest = catalog.get(&args.workflow).await?.with_context(|| {
        format!(
            "Workflow '{}' is not installed in {}",
            args.workflow,
            catalog.root().display()
        )
    })?;
    if !app.engine.validate_manifest_for_target(&manifest, scope.target) {
        return Err(InjectionError::TargetMismatch {
            workflow_id: manifest.id,
            target: scope.target,
        }
        .into());
    }

    let options = InjectOptions {
        project_root: scope.project_root,
        backup: config.inject.backup && !args.no_backup,
        force: args.force,
        merge: args.merge || config.inject.merge,
    };

    let spinner = (app.output.show_progress() && !app.is_json())
        .then(|| progress::spinner(&format!("Injecting {} into {}...", manifest.id, scope.target)));
    let result = app.engine.inject(&manifest, scope.target, &options).await;
    if let Some(pb) = &spinner {
        progress::finish_clear(pb);
    }

    app.renderer().render_inject(&manifest.id, &result?)?;
    Ok(ExitCode::SUCCESS)
}
