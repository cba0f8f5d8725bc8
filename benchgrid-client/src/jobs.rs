//! Benchmark job API endpoints

use crate::OrchestratorClient;
use crate::error::Result;
use benchgrid_core::domain::job::JobId;
use benchgrid_core::domain::runner::RunnerConfig;
use benchgrid_core::dto::job::{JobView, SubmitResponse};

impl OrchestratorClient {
    /// Submit a zipped benchmark bundle for execution
    ///
    /// # Arguments
    /// * `archive` - The zipped benchmark bundle
    /// * `configs` - Configs to run against; `None` uses the server's
    ///   built-in default set
    ///
    /// # Returns
    /// The generated job id
    pub async fn submit(
        &self,
        archive: Vec<u8>,
        configs: Option<&[RunnerConfig]>,
    ) -> Result<SubmitResponse> {
        let mut url = format!("{}/api/benchmarks", self.base_url);
        if let Some(configs) = configs {
            let joined = configs
                .iter()
                .map(RunnerConfig::to_string)
                .collect::<Vec<_>>()
                .join(",");
            url = format!("{url}?configs={joined}");
        }

        tracing::debug!("Submitting {} byte bundle to {}", archive.len(), url);

        let response = self.client.post(&url).body(archive).send().await?;

        self.handle_response(response).await
    }

    /// Get a job status snapshot by ID
    ///
    /// # Arguments
    /// * `job_id` - The job id returned at submission
    ///
    /// # Returns
    /// The job's aggregate status and per-config outcomes
    pub async fn get_job(&self, job_id: JobId) -> Result<JobView> {
        let url = format!("{}/api/benchmarks/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List all registered jobs
    ///
    /// # Returns
    /// A status snapshot for every job the orchestrator still tracks
    pub async fn list_jobs(&self) -> Result<Vec<JobView>> {
        let url = format!("{}/api/benchmarks", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
