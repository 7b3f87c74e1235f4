//! Scan repository
//!
//! Handles communication with the scan API:
//! - Starting a new analysis for a host
//! - Fetching the current analysis payload of a host

use anyhow::{Context, Result};
use async_trait::async_trait;
use labwatch_client::ScanApiClient;
use labwatch_core::domain::analysis::Analysis;

/// Repository trait for scan API operations
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Asks the API to start a fresh analysis of `host`
    ///
    /// Fails on transport errors and on any answer other than `200 OK`.
    async fn start_analysis(&self, host: &str) -> Result<()>;

    /// Fetches the current analysis payload of `host`
    async fn fetch_analysis(&self, host: &str) -> Result<Analysis>;
}

/// HTTP implementation of ScanRepository
pub struct HttpScanRepository {
    client: ScanApiClient,
}

impl HttpScanRepository {
    /// Creates a new HTTP scan repository
    ///
    /// # Arguments
    /// * `client` - Configured scan API client
    pub fn new(client: ScanApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScanRepository for HttpScanRepository {
    async fn start_analysis(&self, host: &str) -> Result<()> {
        self.client
            .start_analysis(host)
            .await
            .with_context(|| format!("Failed to start analysis of {}", host))
    }

    async fn fetch_analysis(&self, host: &str) -> Result<Analysis> {
        self.client
            .analysis_status(host)
            .await
            .with_context(|| format!("Failed to fetch analysis of {}", host))
    }
}
