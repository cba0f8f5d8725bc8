//! Job domain types
//!
//! A `Job` tracks one submitted benchmark bundle's execution across every
//! requested runner configuration. Result slots are pre-populated at
//! construction and each is set exactly once when its runner reports back;
//! the aggregate status is recomputed from the slots and never regresses.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::runner::RunnerConfig;

/// Fail reason recorded when the uploaded archive cannot be staged
pub const REASON_CANNOT_EXTRACT: &str = "can not extract zip";

/// Fail reason recorded when at least one per-config run failed
pub const REASON_RUN_FAILED: &str = "at least one benchmark failed to run";

/// Opaque handle for a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh random id
    pub fn random() -> Self {
        JobId(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(JobId(Uuid::parse_str(s)?))
    }
}

/// Aggregate job status, derived from the per-config result slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Created,
    Running,
    Finished,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Created => write!(f, "Created"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Finished => write!(f, "Finished"),
            JobStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Outcome (or pending state) of one job on one runner config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub config: RunnerConfig,
    pub has_run: bool,
    pub succeeded: bool,
    pub score: f64,
    pub error_message: Option<String>,
}

impl JobResult {
    fn pending(config: RunnerConfig) -> Self {
        Self {
            config,
            has_run: false,
            succeeded: false,
            score: 0.0,
            error_message: None,
        }
    }
}

/// One submitted benchmark bundle's execution across a set of runner configs
///
/// Mutation goes through `record_success` / `record_failure` / `mark_failed`
/// only; readers take `snapshot()` copies.
#[derive(Debug, Clone)]
pub struct Job {
    id: JobId,
    status: JobStatus,
    created_at: DateTime<Utc>,
    configs: Vec<RunnerConfig>,
    results: HashMap<RunnerConfig, JobResult>,
    work_dir: Option<PathBuf>,
    fail_reason: Option<String>,
}

impl Job {
    /// Creates a job with one not-run result slot per requested config
    ///
    /// Duplicate configs in the request collapse into a single slot.
    pub fn new(id: JobId, configs: Vec<RunnerConfig>, created_at: DateTime<Utc>) -> Self {
        let mut ordered = Vec::with_capacity(configs.len());
        let mut results = HashMap::with_capacity(configs.len());

        for config in configs {
            if results.contains_key(&config) {
                continue;
            }
            results.insert(config.clone(), JobResult::pending(config.clone()));
            ordered.push(config);
        }

        Self {
            id,
            status: JobStatus::Created,
            created_at,
            configs: ordered,
            results,
            work_dir: None,
            fail_reason: None,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Requested configs, in submission order
    pub fn configs(&self) -> &[RunnerConfig] {
        &self.configs
    }

    pub fn result(&self, config: &RunnerConfig) -> Option<&JobResult> {
        self.results.get(config)
    }

    pub fn fail_reason(&self) -> Option<&str> {
        self.fail_reason.as_deref()
    }

    pub fn work_dir(&self) -> Option<&PathBuf> {
        self.work_dir.as_ref()
    }

    pub fn set_work_dir(&mut self, dir: PathBuf) {
        self.work_dir = Some(dir);
    }

    /// Detaches the staged directory handle so cleanup happens exactly once
    pub fn take_work_dir(&mut self) -> Option<PathBuf> {
        self.work_dir.take()
    }

    /// Records a successful run for `config`
    ///
    /// # Panics
    /// Panics if the slot has already been filled: a second completion
    /// report for the same config means the dispatch contract was violated.
    pub fn record_success(&mut self, config: &RunnerConfig, score: f64) {
        let slot = self.slot_mut(config);
        slot.has_run = true;
        slot.succeeded = true;
        slot.score = score;
        self.recompute_status();
    }

    /// Records a failed run for `config`
    ///
    /// The job-level fail reason is only set if nothing else (e.g. a staging
    /// failure) already claimed it.
    ///
    /// # Panics
    /// Panics if the slot has already been filled, same as `record_success`.
    pub fn record_failure(&mut self, config: &RunnerConfig, message: impl Into<String>) {
        let slot = self.slot_mut(config);
        slot.has_run = true;
        slot.succeeded = false;
        slot.error_message = Some(message.into());
        if self.fail_reason.is_none() {
            self.fail_reason = Some(REASON_RUN_FAILED.to_string());
        }
        self.recompute_status();
    }

    /// Fails the whole job without touching per-config slots
    ///
    /// Used when the job can never be dispatched, e.g. the uploaded archive
    /// could not be extracted.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.fail_reason = Some(reason.into());
    }

    /// True once every result slot has been filled
    pub fn is_done(&self) -> bool {
        self.results.values().all(|r| r.has_run)
    }

    /// True once the job has outlived the retention window
    pub fn is_old(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        now.signed_duration_since(self.created_at) > retention
    }

    /// Deep, independent copy safe for concurrent inspection
    pub fn snapshot(&self) -> Job {
        self.clone()
    }

    fn slot_mut(&mut self, config: &RunnerConfig) -> &mut JobResult {
        let id = self.id;
        let slot = self
            .results
            .get_mut(config)
            .unwrap_or_else(|| panic!("job {id}: no result slot for config {config}"));
        if slot.has_run {
            panic!("job {id}: duplicate completion report for config {config}");
        }
        slot
    }

    fn recompute_status(&mut self) {
        if self.status.is_terminal() {
            return;
        }

        let total = self.results.len();
        let successes = self.results.values().filter(|r| r.succeeded).count();
        let failures = self
            .results
            .values()
            .filter(|r| r.has_run && !r.succeeded)
            .count();

        self.status = if successes == total {
            JobStatus::Finished
        } else if successes + failures == total {
            JobStatus::Failed
        } else if successes + failures > 0 {
            JobStatus::Running
        } else {
            JobStatus::Created
        };
    }
}
