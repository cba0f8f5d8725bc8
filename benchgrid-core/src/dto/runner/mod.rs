//! Runner DTOs
//!
//! Wire types exchanged between the orchestrator's runner workers and the
//! browser agent service that drives real browser sessions.

use serde::{Deserialize, Serialize};

use crate::domain::runner::RunnerConfig;

/// Ask an agent to run one benchmark session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Config the agent should launch
    pub config: RunnerConfig,

    /// Entry page the browser session loads
    pub target_url: String,
}

/// Agent's report for one benchmark session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReply {
    pub success: bool,

    /// Benchmark score, meaningful when `success` is true
    #[serde(default)]
    pub score: f64,

    /// Failure description when `success` is false
    #[serde(default)]
    pub error: Option<String>,
}
