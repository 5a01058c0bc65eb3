//! `btw validate`: re-read and check every injected artifact.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::commands::ScopeArgs;

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Run the validate command. Exits 1 when the configuration is invalid or
/// nothing is injected.
///
/// # Errors
///
/// Returns an error only if the target or project cannot be resolved.
pub async fn run(app: &AppContext, args: &ValidateArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let scope = args.scope.resolve(app, &config)?;
    let valid = app.engine.validate(scope.target, &scope.project_root).await;
    app.renderer().render_validate(scope.target, valid)?;
    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
