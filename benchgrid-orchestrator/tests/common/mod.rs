//! Shared test fixtures
//!
//! A scripted runner factory (no real browsers), sample benchmark bundles
//! and polling helpers used by the manager and API integration tests.

// not every test binary uses every helper
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use benchgrid_core::archive;
use benchgrid_core::domain::job::{Job, JobId};
use benchgrid_core::domain::runner::{Browser, Os, RunnerConfig};
use benchgrid_orchestrator::config::Config;
use benchgrid_orchestrator::manager::JobManager;
use benchgrid_runner::{RunOutcome, Runner, RunnerFactory};

/// Chrome-on-linux config with the given version, the tests' workhorse
pub fn cfg(version: &str) -> RunnerConfig {
    RunnerConfig::new(Browser::Chrome, Os::Linux, version)
}

/// Orchestrator config pointing at a test staging root
pub fn test_config(staging_root: &Path) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        public_url: "http://localhost:8080".to_string(),
        staging_root: staging_root.to_path_buf(),
        agent_url: "http://localhost:9515".to_string(),
        max_parallel_runs: 4,
        retention: Duration::from_secs(3600),
        sweep_interval: Duration::from_secs(600),
    }
}

/// A small but real zipped benchmark bundle
pub fn sample_bundle() -> Vec<u8> {
    let source = tempfile::tempdir().unwrap();
    std::fs::write(source.path().join("index.html"), b"<html>bench</html>").unwrap();
    std::fs::create_dir(source.path().join("js")).unwrap();
    std::fs::write(source.path().join("js/bench.js"), b"run();").unwrap();
    archive::pack(source.path()).unwrap()
}

/// Runner factory that replays scripted outcomes instead of driving browsers
///
/// Optionally gated: runners block until the gate opens, letting tests hold
/// runs in flight deterministically.
pub struct ScriptedFactory {
    outcomes: Mutex<HashMap<String, RunOutcome>>,
    created: AtomicUsize,
    gate: Option<watch::Receiver<bool>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            created: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Factory whose runners wait until `true` is sent on the returned gate
    pub fn gated() -> (Self, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let factory = Self {
            outcomes: Mutex::new(HashMap::new()),
            created: AtomicUsize::new(0),
            gate: Some(rx),
        };
        (factory, tx)
    }

    pub fn succeed(self, config: &RunnerConfig, score: f64) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(config.to_string(), RunOutcome::success(score));
        self
    }

    pub fn fail(self, config: &RunnerConfig, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(config.to_string(), RunOutcome::failure(message));
        self
    }

    /// How many runners have been built so far
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl RunnerFactory for ScriptedFactory {
    fn create(&self, config: &RunnerConfig, _target_url: &str) -> Box<dyn Runner> {
        self.created.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(&config.to_string())
            .cloned()
            .unwrap_or_else(|| RunOutcome::failure(format!("no scripted outcome for {config}")));

        Box::new(ScriptedRunner {
            outcome,
            gate: self.gate.clone(),
        })
    }
}

struct ScriptedRunner {
    outcome: RunOutcome,
    gate: Option<watch::Receiver<bool>>,
}

#[async_trait]
impl Runner for ScriptedRunner {
    async fn run(&self) -> RunOutcome {
        if let Some(gate) = &self.gate {
            let mut gate = gate.clone();
            let _ = gate.wait_for(|open| *open).await;
        }
        self.outcome.clone()
    }
}

/// Polls until the job reaches a terminal status
pub async fn wait_for_terminal(manager: &JobManager, id: JobId) -> Job {
    timeout(Duration::from_secs(5), async {
        loop {
            if let Some(job) = manager.status(id).await {
                if job.status().is_terminal() {
                    return job;
                }
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not reach a terminal status in time")
}

/// Polls until `check` holds
pub async fn wait_until(check: impl Fn() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !check() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition did not hold in time")
}
