//! Benchgrid HTTP Client
//!
//! A simple, type-safe HTTP client for the Benchgrid orchestrator API,
//! shared by the CLI and any external tooling that submits benchmark
//! bundles or polls job status.
//!
//! # Example
//!
//! ```no_run
//! use benchgrid_client::OrchestratorClient;
//!
//! # async fn example() -> benchgrid_client::Result<()> {
//! let client = OrchestratorClient::new("http://localhost:8080");
//!
//! let submitted = client.submit(std::fs::read("bundle.zip").unwrap(), None).await?;
//! let view = client.get_job(submitted.job_id).await?;
//! println!("job {} is {}", view.job_id, view.status);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Benchgrid orchestrator API
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the orchestrator API (e.g., "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
