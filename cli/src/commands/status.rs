//! `btw status`: show what is injected for a target.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::commands::ScopeArgs;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error only if the target or project cannot be resolved.
pub async fn run(app: &AppContext, args: &StatusArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let scope = args.scope.resolve(app, &config)?;
    let status = app
        .engine
        .get_status(scope.target, &scope.project_root)
        .await;
    app.renderer().render_status(scope.target, &status)?;
    Ok(ExitCode::SUCCESS)
}
