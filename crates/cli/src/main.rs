//! `fishbowl` command-line entry point.

mod cli;
mod commands;
mod observability;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use fishbowl_infra::{config, FishbowlConnector};
use serde_json::Value;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; real environment variables take precedence.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    observability::init_tracing(cli.log_format);
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "dotenv_loaded");
    }

    match run(&cli).await {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "cli_command_failed");
            print_json(&serde_json::json!({"error": format!("{err:#}")}));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<Value> {
    let config = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone()))?,
        None => config::load()?,
    };
    let connector = FishbowlConnector::from_config(config)?;

    match &cli.command {
        Commands::TestCredentials => commands::test_credentials(&connector).await,
        Commands::Run(args) => commands::run(&connector, args).await,
        Commands::Poll(args) => commands::poll(&connector, args).await,
    }
}

#[allow(clippy::print_stdout)]
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
