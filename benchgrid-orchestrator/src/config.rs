//! Orchestrator configuration
//!
//! Defines all configurable parameters for the orchestrator including bind
//! address, artifact staging location, worker-pool size and job retention.

use std::path::PathBuf;
use std::time::Duration;

/// Orchestrator configuration
///
/// Retention and sweep cadence are configurable mostly for tests; the
/// defaults match production behavior (one hour retention, ten minute
/// sweeps).
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API binds to
    pub bind_addr: String,

    /// Externally reachable base URL, used to build the artifact URLs
    /// runner browser sessions load
    pub public_url: String,

    /// Directory submitted archives are staged under
    pub staging_root: PathBuf,

    /// Base URL of the browser agent service runs are delegated to
    pub agent_url: String,

    /// Max concurrently in-flight browser sessions
    pub max_parallel_runs: usize,

    /// How long a job stays registered after submission
    pub retention: Duration,

    /// How often the purge sweep runs
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a configuration with defaults suitable for local development
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            public_url: "http://localhost:8080".to_string(),
            staging_root: PathBuf::from("/tmp/benchgrid"),
            agent_url: "http://localhost:9515".to_string(),
            max_parallel_runs: 4,
            retention: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(600),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized variables (all optional):
    /// - BENCHGRID_BIND_ADDR (default: 0.0.0.0:8080)
    /// - BENCHGRID_PUBLIC_URL (default: http://localhost:8080)
    /// - BENCHGRID_STAGING_ROOT (default: /tmp/benchgrid)
    /// - BENCHGRID_AGENT_URL (default: http://localhost:9515)
    /// - BENCHGRID_MAX_PARALLEL_RUNS (default: 4)
    /// - BENCHGRID_RETENTION_SECS (default: 3600)
    /// - BENCHGRID_SWEEP_INTERVAL_SECS (default: 600)
    pub fn from_env() -> Self {
        let defaults = Self::new();

        Self {
            bind_addr: std::env::var("BENCHGRID_BIND_ADDR").unwrap_or(defaults.bind_addr),
            public_url: std::env::var("BENCHGRID_PUBLIC_URL").unwrap_or(defaults.public_url),
            staging_root: std::env::var("BENCHGRID_STAGING_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_root),
            agent_url: std::env::var("BENCHGRID_AGENT_URL").unwrap_or(defaults.agent_url),
            max_parallel_runs: env_parse("BENCHGRID_MAX_PARALLEL_RUNS")
                .unwrap_or(defaults.max_parallel_runs),
            retention: env_parse("BENCHGRID_RETENTION_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.retention),
            sweep_interval: env_parse("BENCHGRID_SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if !self.public_url.starts_with("http://") && !self.public_url.starts_with("https://") {
            anyhow::bail!("public_url must start with http:// or https://");
        }

        if !self.agent_url.starts_with("http://") && !self.agent_url.starts_with("https://") {
            anyhow::bail!("agent_url must start with http:// or https://");
        }

        if self.max_parallel_runs == 0 {
            anyhow::bail!("max_parallel_runs must be greater than 0");
        }

        if self.retention.as_secs() == 0 {
            anyhow::bail!("retention must be greater than 0");
        }

        if self.sweep_interval.as_secs() == 0 {
            anyhow::bail!("sweep_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse::<T>().ok())
}
