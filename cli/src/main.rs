//! btw - inject agent workflows into AI coding tool configurations

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use btw_cli::cli::Cli;
use btw_cli::domain::InjectionError;
use btw_cli::output::json::format_error;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Code reported for failures outside the injection engine.
const COMMAND_FAILED: &str = "COMMAND_FAILED";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BTW_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json = cli.is_json();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            report(&e, json);
            ExitCode::FAILURE
        }
    }
}

fn report(error: &anyhow::Error, json: bool) {
    if !json {
        eprintln!("Error: {error:#}");
        return;
    }
    let code = error
        .downcast_ref::<InjectionError>()
        .map_or(COMMAND_FAILED, InjectionError::code);
    match format_error(&format!("{error:#}"), code) {
        Ok(out) => println!("{out}"),
        Err(_) => eprintln!("Error: {error:#}"),
    }
}
