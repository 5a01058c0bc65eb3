//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Inject agent workflows into AI coding tool configurations
#[derive(Parser)]
#[command(
    name = "btw",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer yes to every prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Inject a workflow into a project
    Inject(commands::inject::InjectArgs),

    /// Remove injected workflows from a project
    Eject(commands::eject::EjectArgs),

    /// Show what is injected for a target
    Status(commands::status::StatusArgs),

    /// Check injected artifacts for damage
    Validate(commands::validate::ValidateArgs),

    /// List library workflows for a target
    List(commands::list::ListArgs),

    /// Switch workflows on and off interactively
    Toggle(commands::toggle::ToggleArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Whether JSON output was requested.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        });

        match command {
            Command::Inject(args) => commands::inject::run(&app, &args).await,
            Command::Eject(args) => commands::eject::run(&app, &args).await,
            Command::Status(args) => commands::status::run(&app, &args).await,
            Command::Validate(args) => commands::validate::run(&app, &args).await,
            Command::List(args) => commands::list::run(&app, &args).await,
            Command::Toggle(args) => commands::toggle::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
