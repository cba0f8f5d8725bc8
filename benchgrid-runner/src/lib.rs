//! Benchgrid Runner
//!
//! The runner capability abstraction: a `Runner` executes one benchmark
//! session for one browser/OS configuration against a target URL and yields
//! a pass/fail plus numeric score. The orchestrator only ever sees the
//! `Runner`/`RunnerFactory` traits, so the browser-automation implementation
//! can be swapped without touching orchestration logic.

pub mod agent;

use async_trait::async_trait;
use benchgrid_core::domain::runner::RunnerConfig;

pub use agent::{AgentRunner, AgentRunnerFactory};

/// Outcome of one benchmark session
///
/// Failure is data, not an error type: the orchestrator routes it straight
/// into the job's per-config result slot.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub succeeded: bool,
    pub score: f64,
    pub error_message: Option<String>,
}

impl RunOutcome {
    pub fn success(score: f64) -> Self {
        Self {
            succeeded: true,
            score,
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            score: 0.0,
            error_message: Some(message.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        !self.succeeded
    }
}

/// One benchmark session against a target URL
///
/// `run` blocks for the real benchmark duration; callers are expected to
/// drive it from a worker task.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(&self) -> RunOutcome;
}

/// Builds a runner for a (config, target URL) pair
///
/// The only seam the orchestrator depends on.
pub trait RunnerFactory: Send + Sync {
    fn create(&self, config: &RunnerConfig, target_url: &str) -> Box<dyn Runner>;
}
