//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod status;
mod submit;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pack and submit a benchmark bundle
    Submit {
        /// Benchmark directory (packed on the fly) or a prepacked .zip file
        path: PathBuf,

        /// Config to run against, canonical form (repeatable); defaults to
        /// the server's built-in set
        #[arg(long = "config")]
        configs: Vec<String>,

        /// Poll until the job reaches a terminal status
        #[arg(long)]
        wait: bool,
    },
    /// Show one job's status
    Status {
        /// Job id returned at submission
        id: String,
    },
    /// List all jobs the orchestrator tracks
    List,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Submit {
            path,
            configs,
            wait,
        } => submit::handle_submit(config, &path, &configs, wait).await,
        Commands::Status { id } => status::handle_status(config, &id).await,
        Commands::List => status::handle_list(config).await,
    }
}
