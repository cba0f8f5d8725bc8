//! Submit command handler
//!
//! Packs a benchmark directory (or reads a prepacked zip), submits it to
//! the orchestrator and optionally polls until the job is done.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use colored::*;

use benchgrid_client::OrchestratorClient;
use benchgrid_core::archive;
use benchgrid_core::domain::job::{JobId, JobStatus};
use benchgrid_core::domain::runner::RunnerConfig;
use benchgrid_core::dto::job::JobView;

use crate::commands::status::print_job_details;
use crate::config::Config;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Pack, upload and optionally wait for one benchmark bundle
pub async fn handle_submit(
    config: &Config,
    path: &Path,
    configs: &[String],
    wait: bool,
) -> Result<()> {
    let client = OrchestratorClient::new(&config.orchestrator_url);

    let archive = if path.is_dir() {
        archive::pack(path).with_context(|| format!("Failed to pack {}", path.display()))?
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    let selected = configs
        .iter()
        .map(|s| s.parse::<RunnerConfig>())
        .collect::<Result<Vec<_>, _>>()?;

    let submitted = client
        .submit(archive, (!selected.is_empty()).then_some(&selected[..]))
        .await?;

    println!(
        "{} job {}",
        "Submitted".green().bold(),
        submitted.job_id.to_string().cyan()
    );

    if !wait {
        println!(
            "{}",
            format!("Poll with: benchgrid status {}", submitted.job_id).dimmed()
        );
        return Ok(());
    }

    let view = wait_for_terminal(&client, submitted.job_id).await?;
    println!();
    print_job_details(&view);

    if view.status == JobStatus::Failed {
        bail!(
            "job failed: {}",
            view.fail_reason.as_deref().unwrap_or("unknown reason")
        );
    }

    Ok(())
}

async fn wait_for_terminal(client: &OrchestratorClient, id: JobId) -> Result<JobView> {
    loop {
        let view = client.get_job(id).await?;

        if view.status.is_terminal() {
            return Ok(view);
        }

        let done = view.results.iter().filter(|r| r.has_run).count();
        println!(
            "{}",
            format!("  {} of {} run(s) complete...", done, view.results.len()).dimmed()
        );

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
