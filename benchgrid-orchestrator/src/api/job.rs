//! Benchmark job API handlers
//!
//! HTTP endpoints for submitting benchmark bundles and polling job status.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use benchgrid_core::domain::job::JobId;
use benchgrid_core::domain::runner::RunnerConfig;
use benchgrid_core::dto::job::{JobView, SubmitResponse};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SubmitQuery {
    /// Comma-separated canonical config strings; defaults to the built-in
    /// set when absent
    pub configs: Option<String>,
}

/// POST /api/benchmarks
/// Submit a zipped benchmark bundle for execution
pub async fn submit_benchmark(
    State(state): State<AppState>,
    Query(params): Query<SubmitQuery>,
    body: Bytes,
) -> ApiResult<Json<SubmitResponse>> {
    let configs = parse_configs(params.configs.as_deref())?;

    tracing::info!(
        "Received benchmark submission ({} bytes, {} config(s))",
        body.len(),
        configs.len()
    );

    let job_id = state.manager.submit(body.to_vec(), configs).await;

    Ok(Json(SubmitResponse { job_id }))
}

/// GET /api/benchmarks/{id}
/// Get a job status snapshot by ID
pub async fn get_benchmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobView>> {
    tracing::debug!("Getting job: {}", id);

    let job_id: JobId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid job id '{}'", id)))?;

    let job = state
        .manager
        .status(job_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobView::from(&job)))
}

/// GET /api/benchmarks
/// List all registered jobs
pub async fn list_benchmarks(State(state): State<AppState>) -> ApiResult<Json<Vec<JobView>>> {
    tracing::debug!("Listing all jobs");

    let jobs = state.manager.list().await;
    Ok(Json(jobs.iter().map(JobView::from).collect()))
}

fn parse_configs(raw: Option<&str>) -> Result<Vec<RunnerConfig>, ApiError> {
    let Some(raw) = raw else {
        return Ok(RunnerConfig::default_set());
    };

    raw.split(',')
        .map(str::trim)
        .map(|part| {
            part.parse::<RunnerConfig>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))
        })
        .collect()
}
