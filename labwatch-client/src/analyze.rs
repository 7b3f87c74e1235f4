//! Analysis endpoints of the scan API

use crate::error::{ClientError, Result};
use crate::{ScanApiClient, handle_response};
use labwatch_core::domain::analysis::Analysis;
use reqwest::StatusCode;
use tracing::debug;

impl ScanApiClient {
    /// Start a fresh analysis for `host`
    ///
    /// The API only accepts the request when it answers `200 OK`; any other
    /// status (429 when rate limited, 503/529 when overloaded) is returned as
    /// [`ClientError::ApiError`].
    pub async fn start_analysis(&self, host: &str) -> Result<()> {
        if host.is_empty() {
            return Err(ClientError::InvalidRequest("host cannot be empty".to_string()));
        }

        debug!(host, "requesting new analysis");

        let response = self
            .client
            .get(self.analyze_url())
            .query(&[("host", host), ("startNew", "on"), ("all", "done")])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }

    /// Fetch the current state of the analysis for `host`
    ///
    /// Does not start a new analysis; returns whatever the API currently
    /// holds, including in-progress payloads.
    pub async fn analysis_status(&self, host: &str) -> Result<Analysis> {
        if host.is_empty() {
            return Err(ClientError::InvalidRequest("host cannot be empty".to_string()));
        }

        debug!(host, "fetching analysis status");

        let response = self
            .client
            .get(self.analyze_url())
            .query(&[("host", host), ("all", "done")])
            .send()
            .await?;

        handle_response(response).await
    }
}
