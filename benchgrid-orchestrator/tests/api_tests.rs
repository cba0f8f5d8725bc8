//! Integration tests for the HTTP API
//!
//! These tests spawn a real Axum server on a random port and use reqwest to
//! hit it with actual HTTP requests, with runner execution scripted.

mod common;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use benchgrid_core::domain::job::JobStatus;
use benchgrid_core::dto::job::{JobView, SubmitResponse};
use benchgrid_orchestrator::api::{self, AppState};
use benchgrid_orchestrator::manager::JobManager;

use common::{ScriptedFactory, cfg, sample_bundle, test_config};

async fn spawn_server(factory: Arc<ScriptedFactory>, staging_root: &Path) -> String {
    let manager = JobManager::new(&test_config(staging_root), factory).unwrap();
    let app = api::create_router(AppState { manager });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn poll_until_terminal(client: &reqwest::Client, url: &str) -> JobView {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let view: JobView = client
                .get(url)
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if view.status.is_terminal() {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not reach a terminal status in time")
}

#[tokio::test]
async fn test_submit_and_poll_to_finished() {
    let staging = tempfile::tempdir().unwrap();
    let factory = Arc::new(
        ScriptedFactory::new()
            .succeed(&cfg("120"), 1234.5)
            .succeed(&cfg("121"), 2345.5),
    );
    let base = spawn_server(factory, staging.path()).await;
    let client = reqwest::Client::new();

    let submit: SubmitResponse = client
        .post(format!(
            "{base}/api/benchmarks?configs=linux-chrome-120,linux-chrome-121"
        ))
        .body(sample_bundle())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let view =
        poll_until_terminal(&client, &format!("{base}/api/benchmarks/{}", submit.job_id)).await;

    assert_eq!(view.status, JobStatus::Finished);
    assert_eq!(view.results.len(), 2);
    assert_eq!(view.results[0].config, "linux-chrome-120");
    assert_eq!(view.results[0].score, Some(1234.5));
    assert_eq!(view.results[1].score, Some(2345.5));
}

#[tokio::test]
async fn test_corrupt_upload_polls_as_failed() {
    let staging = tempfile::tempdir().unwrap();
    let factory = Arc::new(ScriptedFactory::new());
    let base = spawn_server(factory.clone(), staging.path()).await;
    let client = reqwest::Client::new();

    let submit: SubmitResponse = client
        .post(format!("{base}/api/benchmarks"))
        .body(&b"not a zip archive"[..])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let view: JobView = client
        .get(format!("{base}/api/benchmarks/{}", submit.job_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view.status, JobStatus::Failed);
    assert_eq!(view.fail_reason.as_deref(), Some("can not extract zip"));
    assert!(view.results.iter().all(|r| !r.has_run));
    assert_eq!(factory.created(), 0);
}

#[tokio::test]
async fn test_unknown_job_is_404_not_failed() {
    let staging = tempfile::tempdir().unwrap();
    let base = spawn_server(Arc::new(ScriptedFactory::new()), staging.path()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!(
            "{base}/api/benchmarks/00000000-0000-4000-8000-000000000000"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_malformed_ids_and_configs_are_400() {
    let staging = tempfile::tempdir().unwrap();
    let base = spawn_server(Arc::new(ScriptedFactory::new()), staging.path()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/api/benchmarks/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{base}/api/benchmarks?configs=beos-netscape-4"))
        .body(sample_bundle())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submission_without_configs_uses_default_set() {
    let staging = tempfile::tempdir().unwrap();
    let factory = Arc::new(ScriptedFactory::new());
    let base = spawn_server(factory, staging.path()).await;
    let client = reqwest::Client::new();

    let submit: SubmitResponse = client
        .post(format!("{base}/api/benchmarks"))
        .body(sample_bundle())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let view: JobView = client
        .get(format!("{base}/api/benchmarks/{}", submit.job_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let configs: Vec<_> = view.results.iter().map(|r| r.config.as_str()).collect();
    assert_eq!(
        configs,
        vec![
            "linux-chrome-120",
            "linux-firefox-115",
            "macos-safari-17",
            "windows-explorer-11",
        ]
    );
}

#[tokio::test]
async fn test_staged_artifacts_are_served_while_job_runs() {
    let staging = tempfile::tempdir().unwrap();
    let (factory, gate) = ScriptedFactory::gated();
    let factory = Arc::new(factory.succeed(&cfg("120"), 1.0));
    let base = spawn_server(factory, staging.path()).await;
    let client = reqwest::Client::new();

    let submit: SubmitResponse = client
        .post(format!("{base}/api/benchmarks?configs=linux-chrome-120"))
        .body(sample_bundle())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // the runner is gated, so the staged directory is still alive
    let page = client
        .get(format!("{base}/artifacts/{}/index.html", submit.job_id))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), reqwest::StatusCode::OK);
    assert_eq!(page.text().await.unwrap(), "<html>bench</html>");

    gate.send(true).unwrap();
}

#[tokio::test]
async fn test_list_includes_submitted_jobs() {
    let staging = tempfile::tempdir().unwrap();
    let factory = Arc::new(ScriptedFactory::new().succeed(&cfg("120"), 1.0));
    let base = spawn_server(factory, staging.path()).await;
    let client = reqwest::Client::new();

    let submit: SubmitResponse = client
        .post(format!("{base}/api/benchmarks?configs=linux-chrome-120"))
        .body(sample_bundle())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let views: Vec<JobView> = client
        .get(format!("{base}/api/benchmarks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(views.iter().any(|v| v.job_id == submit.job_id));
}

#[tokio::test]
async fn test_health_check() {
    let staging = tempfile::tempdir().unwrap();
    let base = spawn_server(Arc::new(ScriptedFactory::new()), staging.path()).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}
