//! Job DTOs for the orchestrator API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobId, JobStatus};

/// Response to a benchmark submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
}

/// Outcome of one requested config, as reported to status pollers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResultView {
    /// Canonical config string, e.g. `linux-firefox-115`
    pub config: String,
    pub has_run: bool,
    pub succeeded: bool,
    /// Benchmark score, present only for successful runs
    pub score: Option<f64>,
    pub error_message: Option<String>,
}

/// Point-in-time view of a job for status polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub fail_reason: Option<String>,
    /// Per-config outcomes, in submission order
    pub results: Vec<RunResultView>,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        let results = job
            .configs()
            .iter()
            .filter_map(|config| job.result(config))
            .map(|result| RunResultView {
                config: result.config.to_string(),
                has_run: result.has_run,
                succeeded: result.succeeded,
                score: result.succeeded.then_some(result.score),
                error_message: result.error_message.clone(),
            })
            .collect();

        JobView {
            job_id: job.id(),
            status: job.status(),
            created_at: job.created_at(),
            fail_reason: job.fail_reason().map(str::to_string),
            results,
        }
    }
}
