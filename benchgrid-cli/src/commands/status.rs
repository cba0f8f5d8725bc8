//! Status command handlers
//!
//! Renders single-job details and the all-jobs listing.

use anyhow::{Context, Result};
use colored::*;

use benchgrid_client::OrchestratorClient;
use benchgrid_core::domain::job::{JobId, JobStatus};
use benchgrid_core::dto::job::JobView;

use crate::config::Config;

/// Show one job's status
pub async fn handle_status(config: &Config, id: &str) -> Result<()> {
    let client = OrchestratorClient::new(&config.orchestrator_url);

    let job_id: JobId = id
        .parse()
        .with_context(|| format!("'{}' is not a valid job id", id))?;

    match client.get_job(job_id).await {
        Ok(view) => {
            print_job_details(&view);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!(
                "{}",
                format!("Job {} not found (unknown or already purged).", id).yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// List all jobs
pub async fn handle_list(config: &Config) -> Result<()> {
    let client = OrchestratorClient::new(&config.orchestrator_url);
    let jobs = client.list_jobs().await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for view in jobs {
            print_job_summary(&view);
        }
    }

    Ok(())
}

/// Print a one-job summary line block
fn print_job_summary(view: &JobView) {
    let done = view.results.iter().filter(|r| r.has_run).count();

    println!("  {} Job {}", "▸".cyan(), view.job_id.to_string().dimmed());
    println!("    Status:  {}", colorize_status(view.status));
    println!(
        "    Created: {}",
        view.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!("    Runs:    {}/{}", done, view.results.len());
    println!();
}

/// Print detailed job information
pub fn print_job_details(view: &JobView) {
    println!("{}", "Job Details:".bold());
    println!("  ID:      {}", view.job_id.to_string().cyan());
    println!("  Status:  {}", colorize_status(view.status));
    println!(
        "  Created: {}",
        view.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(reason) = &view.fail_reason {
        println!("  Reason:  {}", reason.red());
    }

    println!();
    println!("{}", "Runs:".bold());
    for result in &view.results {
        let marker = if !result.has_run {
            "…".dimmed()
        } else if result.succeeded {
            "✓".green()
        } else {
            "✗".red()
        };

        print!("  {} {:<28}", marker, result.config);
        if let Some(score) = result.score {
            print!(" {}", score.to_string().bold());
        }
        if let Some(error) = &result.error_message {
            print!(" {}", error.red());
        }
        println!();
    }
}

fn colorize_status(status: JobStatus) -> ColoredString {
    match status {
        JobStatus::Created => "Created".blue(),
        JobStatus::Running => "Running".yellow(),
        JobStatus::Finished => "Finished".green(),
        JobStatus::Failed => "Failed".red(),
    }
}
