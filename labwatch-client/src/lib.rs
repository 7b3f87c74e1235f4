//! Labwatch HTTP Clients
//!
//! Type-safe HTTP clients for the two external collaborators of labwatch:
//! the SSL Labs scan API and the incoming-webhook notification sink.
//!
//! # Example
//!
//! ```no_run
//! use labwatch_client::ScanApiClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ScanApiClient::new("https://api.ssllabs.com/api/v3");
//!
//!     client.start_analysis("example.com").await?;
//!     let analysis = client.analysis_status("example.com").await?;
//!
//!     println!("{}: {}", analysis.host, analysis.status);
//!     Ok(())
//! }
//! ```

mod analyze;
pub mod error;
mod webhook;

pub use error::{ClientError, Result};
pub use webhook::WebhookClient;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default base URL of the scan API
pub const DEFAULT_API_URL: &str = "https://api.ssllabs.com/api/v3";

/// HTTP client for the scan API
///
/// Exposes the two operations the runner needs:
/// - starting a fresh analysis for a host
/// - fetching the current state of a host's analysis
#[derive(Debug, Clone)]
pub struct ScanApiClient {
    /// Base URL of the API (e.g., "https://api.ssllabs.com/api/v3")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ScanApiClient {
    /// Create a new scan API client
    ///
    /// # Example
    /// ```
    /// use labwatch_client::ScanApiClient;
    ///
    /// let client = ScanApiClient::new("https://api.ssllabs.com/api/v3/");
    /// assert_eq!(client.base_url(), "https://api.ssllabs.com/api/v3");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new scan API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Check the status code and deserialize the JSON body
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
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

/// Check the status code of a response whose body is not needed
async fn handle_empty_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    Ok(())
}
