//! Job registry
//!
//! Process-wide map of active jobs. All mutation and all snapshot reads go
//! through one mutex, so concurrent worker completions, status polls and
//! purge sweeps serialize against each other; the raw map is never exposed
//! and reads hand out deep copies.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use benchgrid_core::domain::job::{Job, JobId, JobStatus};
use benchgrid_core::domain::runner::RunnerConfig;

/// What a completion report produced, for the manager to act on
#[derive(Debug)]
pub struct Completion {
    pub status: JobStatus,

    /// Staged directory handle, present exactly once: on the report that
    /// drove the job into a terminal status.
    pub work_dir: Option<PathBuf>,
}

/// Registry of all known jobs, keyed by id
#[derive(Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, job: Job) {
        self.jobs.lock().await.insert(job.id(), job);
    }

    /// Deep copy of one job, or `None` when unknown or already purged
    pub async fn snapshot(&self, id: JobId) -> Option<Job> {
        self.jobs.lock().await.get(&id).map(Job::snapshot)
    }

    /// Deep copies of every registered job
    pub async fn snapshot_all(&self) -> Vec<Job> {
        self.jobs.lock().await.values().map(Job::snapshot).collect()
    }

    /// Applies a successful run to the job's slot for `config`
    ///
    /// Returns `None` when the job is no longer registered (purged before
    /// the worker reported back); the caller decides what to do with the
    /// late report. Panics on a duplicate report for the same slot.
    pub async fn record_success(
        &self,
        id: JobId,
        config: &RunnerConfig,
        score: f64,
    ) -> Option<Completion> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(&id)?;
        job.record_success(config, score);
        Some(Self::completion_of(job))
    }

    /// Applies a failed run to the job's slot for `config`
    ///
    /// Same contract as `record_success`.
    pub async fn record_failure(
        &self,
        id: JobId,
        config: &RunnerConfig,
        message: &str,
    ) -> Option<Completion> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(&id)?;
        job.record_failure(config, message);
        Some(Self::completion_of(job))
    }

    /// Removes and returns every job older than the retention window,
    /// regardless of completion state
    pub async fn purge_old(&self, now: DateTime<Utc>, retention: Duration) -> Vec<Job> {
        let mut jobs = self.jobs.lock().await;
        let old_ids: Vec<JobId> = jobs
            .values()
            .filter(|job| job.is_old(now, retention))
            .map(|job| job.id())
            .collect();

        old_ids
            .into_iter()
            .filter_map(|id| jobs.remove(&id))
            .collect()
    }

    fn completion_of(job: &mut Job) -> Completion {
        let status = job.status();
        let work_dir = if status.is_terminal() {
            job.take_work_dir()
        } else {
            None
        };
        Completion { status, work_dir }
    }
}
