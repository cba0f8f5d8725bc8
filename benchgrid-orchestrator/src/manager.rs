//! Job manager
//!
//! Accepts benchmark submissions, stages their archives, fans out one worker
//! task per runner config through a bounded pool, collects asynchronous
//! completions into the registry, and reclaims staged artifacts and stale
//! job records.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::time;
use tracing::{debug, error, info, warn};

use benchgrid_core::domain::job::{Job, JobId, REASON_CANNOT_EXTRACT};
use benchgrid_core::domain::runner::RunnerConfig;
use benchgrid_runner::RunnerFactory;

use crate::config::Config;
use crate::registry::{Completion, JobRegistry};
use crate::staging;

/// Orchestrates the lifecycle of every submitted job
///
/// Cheap to clone: worker tasks and the sweep loop each hold their own
/// handle to the same shared state.
#[derive(Clone)]
pub struct JobManager {
    registry: Arc<JobRegistry>,
    factory: Arc<dyn RunnerFactory>,
    permits: Arc<Semaphore>,
    staging_root: PathBuf,
    public_url: String,
    retention: chrono::Duration,
    sweep_interval: std::time::Duration,
}

impl JobManager {
    pub fn new(config: &Config, factory: Arc<dyn RunnerFactory>) -> anyhow::Result<Self> {
        let retention = chrono::Duration::from_std(config.retention)
            .context("retention window out of range")?;

        Ok(Self {
            registry: Arc::new(JobRegistry::new()),
            factory,
            permits: Arc::new(Semaphore::new(config.max_parallel_runs)),
            staging_root: config.staging_root.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
            retention,
            sweep_interval: config.sweep_interval,
        })
    }

    /// Directory staged artifacts live under, for the artifact routes
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Accepts a submission: stages the archive and enqueues one run per
    /// config, returning as soon as the work is enqueued
    ///
    /// When the archive cannot be extracted the job is registered already
    /// failed and nothing is dispatched; polling its id reveals the failure.
    pub async fn submit(&self, archive: Vec<u8>, configs: Vec<RunnerConfig>) -> JobId {
        let id = JobId::random();

        let root = self.staging_root.clone();
        let staged = match tokio::task::spawn_blocking(move || staging::stage(&archive, &root, id))
            .await
        {
            Ok(result) => result,
            Err(e) => {
                error!("Staging task for job {} panicked: {}", id, e);
                Err(std::io::Error::other("staging task failed"))
            }
        };

        let mut job = Job::new(id, configs, Utc::now());

        match staged {
            Err(e) => {
                warn!("Failed to stage archive for job {}: {}", id, e);
                job.mark_failed(REASON_CANNOT_EXTRACT);
                self.registry.insert(job).await;
            }
            Ok(dir) => {
                job.set_work_dir(dir);
                let configs = job.configs().to_vec();
                self.registry.insert(job).await;

                info!("Job {} submitted with {} config(s)", id, configs.len());

                for config in configs {
                    let manager = self.clone();
                    tokio::spawn(async move {
                        manager.run_one(id, config).await;
                    });
                }
            }
        }

        id
    }

    /// Snapshot of one job, or `None` when the id is unknown or purged
    pub async fn status(&self, id: JobId) -> Option<Job> {
        self.registry.snapshot(id).await
    }

    /// Snapshots of all registered jobs, newest first
    pub async fn list(&self) -> Vec<Job> {
        let mut jobs = self.registry.snapshot_all().await;
        jobs.sort_by_key(|job| std::cmp::Reverse(job.created_at()));
        jobs
    }

    /// Starts the background retention sweep
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();

        tokio::spawn(async move {
            info!(
                "Starting retention sweep (interval: {:?})",
                manager.sweep_interval
            );

            let mut ticker = time::interval(manager.sweep_interval);

            loop {
                ticker.tick().await;
                manager.purge_once().await;
            }
        })
    }

    /// One retention pass: evicts every job older than the retention window,
    /// finished or not, and deletes its staged artifacts
    pub async fn purge_once(&self) {
        let purged = self.registry.purge_old(Utc::now(), self.retention).await;

        for mut job in purged {
            info!("Purging job {} ({})", job.id(), job.status());
            if let Some(dir) = job.take_work_dir() {
                Self::remove_staged(job.id(), dir).await;
            }
        }
    }

    /// Executes one (job, config) run inside the bounded pool
    async fn run_one(&self, id: JobId, config: RunnerConfig) {
        let permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                error!("Worker pool closed, abandoning {} for job {}", config, id);
                return;
            }
        };

        let target_url = self.target_url(id, &config);
        debug!("Running {} for job {}", config, id);

        let runner = self.factory.create(&config, &target_url);
        let outcome = runner.run().await;
        drop(permit);

        if outcome.is_failed() {
            let message = outcome
                .error_message
                .unwrap_or_else(|| "benchmark run failed".to_string());
            self.run_failed(id, &config, &message).await;
        } else {
            self.run_finished(id, &config, outcome.score).await;
        }
    }

    async fn run_finished(&self, id: JobId, config: &RunnerConfig, score: f64) {
        info!("Job {}: {} finished with score {}", id, config, score);

        match self.registry.record_success(id, config, score).await {
            Some(completion) => self.reap_if_terminal(id, completion).await,
            // the job was purged while the run was in flight; drop the report
            None => error!(
                "Job {} no longer registered when {} reported success, discarding",
                id, config
            ),
        }
    }

    async fn run_failed(&self, id: JobId, config: &RunnerConfig, message: &str) {
        warn!("Job {}: {} failed: {}", id, config, message);

        match self.registry.record_failure(id, config, message).await {
            Some(completion) => self.reap_if_terminal(id, completion).await,
            None => error!(
                "Job {} no longer registered when {} reported failure, discarding",
                id, config
            ),
        }
    }

    /// Deletes the staged directory once the job goes terminal
    async fn reap_if_terminal(&self, id: JobId, completion: Completion) {
        if let Some(dir) = completion.work_dir {
            info!(
                "Job {} reached {}, removing staged artifacts",
                id, completion.status
            );
            Self::remove_staged(id, dir).await;
        }
    }

    async fn remove_staged(id: JobId, dir: PathBuf) {
        let result = tokio::task::spawn_blocking(move || staging::remove(&dir)).await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to remove staged artifacts for job {}: {}", id, e),
            Err(e) => warn!("Cleanup task for job {} panicked: {}", id, e),
        }
    }

    fn target_url(&self, id: JobId, config: &RunnerConfig) -> String {
        format!(
            "{}/artifacts/{}/index.html?config={}",
            self.public_url, id, config
        )
    }
}
