//! API Module
//!
//! HTTP layer for the orchestrator: submission and status endpoints plus
//! static serving of staged artifacts so runner browser sessions can load
//! each job's benchmark entry page.

pub mod error;
pub mod health;
pub mod job;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::manager::JobManager;

/// Uploaded benchmark bundles can carry compiled assets
const MAX_ARCHIVE_BYTES: usize = 64 * 1024 * 1024;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub manager: JobManager,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let artifacts = ServeDir::new(state.manager.staging_root());

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Benchmark job endpoints
        .route("/api/benchmarks", post(job::submit_benchmark))
        .route("/api/benchmarks", get(job::list_benchmarks))
        .route("/api/benchmarks/{id}", get(job::get_benchmark))
        // Staged artifact serving
        .nest_service("/artifacts", artifacts)
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_ARCHIVE_BYTES))
        .layer(TraceLayer::new_for_http())
}
