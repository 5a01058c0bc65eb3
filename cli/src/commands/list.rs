//! `btw list`: library workflows for a target and whether each is active.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::{config_service, toggle};
use crate::commands::ScopeArgs;

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the library cannot be read.
pub async fn run(app: &AppContext, args: &ListArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let scope = args.scope.resolve(app, &config)?;
    let catalog = app.catalog(&config)?;
    let items = toggle::load_items(&app.engine, &catalog, scope.target, &scope.project_root).await?;
    app.renderer().render_list(scope.target, &items)?;
    Ok(ExitCode::SUCCESS)
}
