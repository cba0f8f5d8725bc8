//! Benchgrid CLI
//!
//! Command-line interface for packing benchmark bundles, submitting them to
//! the orchestrator and polling job status.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "benchgrid")]
#[command(about = "Benchgrid benchmark submission CLI", long_about = None)]
struct Cli {
    /// Orchestrator URL
    #[arg(
        long,
        env = "BENCHGRID_URL",
        default_value = "http://localhost:8080"
    )]
    orchestrator_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        orchestrator_url: cli.orchestrator_url,
    };

    handle_command(cli.command, &config).await
}
