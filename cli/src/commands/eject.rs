//! `btw eject`: remove btw-owned content from a project.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::EjectOptions;
use crate::application::services::config_service;
use crate::commands::ScopeArgs;

/// Arguments for the eject command.
#[derive(Args, Debug)]
pub struct EjectArgs {
    /// Workflow id to eject [default: every btw workflow]
    pub workflow: Option<String>,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Remove the scaffold directory if it is left empty
    #[arg(long)]
    pub clean: bool,

    /// Restore the shared document from its pre-injection backup
    #[arg(long)]
    pub restore: bool,
}

/// Run the eject command.
///
/// # Errors
///
/// Returns an error if a removal or rewrite fails.
pub async fn run(app: &AppContext, args: &EjectArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let scope = args.scope.resolve(app, &config)?;

    if args.workflow.is_none()
        && !app.non_interactive
        && !app.confirm(
            &format!("Eject every btw workflow from {}?", scope.target),
            false,
        )?
    {
        app.output.info("Eject cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let options = EjectOptions {
        project_root: scope.project_root,
        workflow_id: args.workflow.clone(),
        clean: args.clean,
        restore: args.restore,
    };
    app.engine.eject(scope.target, &options).await?;
    app.renderer()
        .render_eject(scope.target, args.workflow.as_deref())?;
    Ok(ExitCode::SUCCESS)
}
