use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use benchgrid_orchestrator::api::{self, AppState};
use benchgrid_orchestrator::config::Config;
use benchgrid_orchestrator::manager::JobManager;
use benchgrid_runner::AgentRunnerFactory;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "benchgrid_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Benchgrid Orchestrator...");

    let config = Config::from_env();
    config.validate().expect("Invalid configuration");

    std::fs::create_dir_all(&config.staging_root).expect("Failed to create staging root");

    let factory = Arc::new(AgentRunnerFactory::new(&config.agent_url));
    let manager = JobManager::new(&config, factory).expect("Failed to create manager");

    manager.spawn_sweeper();

    // Build router with all API endpoints
    let app = api::create_router(AppState { manager });

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
