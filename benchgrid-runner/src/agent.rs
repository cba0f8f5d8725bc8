//! HTTP browser-agent runner
//!
//! Production `Runner` implementation. A browser agent service sits next to
//! the real browsers; each run is a single POST to `{agent_url}/run` with
//! the config and target URL, answered once the browser session finishes
//! with a success flag, score and optional error. Transport problems and
//! non-2xx answers become run failures, never errors, so the orchestrator
//! treats an unreachable agent the same as a crashed browser.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use benchgrid_core::domain::runner::RunnerConfig;
use benchgrid_core::dto::runner::{RunReply, RunRequest};

use crate::{RunOutcome, Runner, RunnerFactory};

/// Benchmark sessions can legitimately take minutes
const RUN_TIMEOUT: Duration = Duration::from_secs(600);

/// Runner that delegates one browser session to a remote agent
pub struct AgentRunner {
    client: reqwest::Client,
    agent_url: String,
    config: RunnerConfig,
    target_url: String,
}

#[async_trait]
impl Runner for AgentRunner {
    async fn run(&self) -> RunOutcome {
        let url = format!("{}/run", self.agent_url);
        let request = RunRequest {
            config: self.config.clone(),
            target_url: self.target_url.clone(),
        };

        debug!("Dispatching {} against {}", self.config, self.target_url);

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Agent request for {} failed: {}", self.config, e);
                return RunOutcome::failure(format!("agent unreachable: {e}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return RunOutcome::failure(format!("agent returned {status}: {body}"));
        }

        let reply: RunReply = match response.json().await {
            Ok(reply) => reply,
            Err(e) => return RunOutcome::failure(format!("unreadable agent reply: {e}")),
        };

        if reply.success {
            RunOutcome::success(reply.score)
        } else {
            RunOutcome::failure(
                reply
                    .error
                    .unwrap_or_else(|| "agent reported failure without a message".to_string()),
            )
        }
    }
}

/// Factory producing `AgentRunner`s for a fixed agent endpoint
pub struct AgentRunnerFactory {
    client: reqwest::Client,
    agent_url: String,
}

impl AgentRunnerFactory {
    pub fn new(agent_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(RUN_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            agent_url: agent_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn agent_url(&self) -> &str {
        &self.agent_url
    }
}

impl RunnerFactory for AgentRunnerFactory {
    fn create(&self, config: &RunnerConfig, target_url: &str) -> Box<dyn Runner> {
        Box::new(AgentRunner {
            client: self.client.clone(),
            agent_url: self.agent_url.clone(),
            config: config.clone(),
            target_url: target_url.to_string(),
        })
    }
}
