use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command line for the Fishbowl connector.
#[derive(Parser)]
#[command(name = "fishbowl")]
#[command(about = "Run Fishbowl Inventory actions and polls from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (JSON or TOML); otherwise environment, then standard paths
    #[arg(short, long, global = true, env = "FISHBOWL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Clone, Copy, ValueEnum, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Connector subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Log in once to verify the configured credential
    TestCredentials,
    /// Run one operation on a resource (e.g. `run part get --params '{"partId": 5}'`)
    Run(RunArgs),
    /// Poll for new or changed records since the last poll
    Poll(PollArgs),
}

/// Arguments for `run`.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Resource name, such as part or salesOrder
    pub resource: String,
    /// Operation name, such as get or getAll
    pub operation: String,
    /// Parameters as a JSON object, or an array of objects for a batch
    #[arg(long, conflicts_with = "params_file")]
    pub params: Option<String>,
    /// File holding the parameters JSON
    #[arg(long)]
    pub params_file: Option<PathBuf>,
    /// Report failed items inline instead of stopping
    #[arg(long)]
    pub continue_on_fail: bool,
}

/// Arguments for `poll`.
#[derive(clap::Args)]
pub struct PollArgs {
    /// Event name, such as salesOrderShipped
    pub event: String,
    /// Trigger options as JSON, e.g. '{"statusFilter": "Issued"}'
    #[arg(long)]
    pub options: Option<String>,
    /// Fail on errors instead of reporting no data
    #[arg(long)]
    pub manual: bool,
}
