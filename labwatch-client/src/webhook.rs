//! Incoming-webhook client

use crate::error::{ClientError, Result};
use crate::handle_empty_response;
use labwatch_core::dto::notification::Message;
use reqwest::Client;

/// Client posting notification messages to a single webhook URL
#[derive(Debug, Clone)]
pub struct WebhookClient {
    url: String,
    client: Client,
}

impl WebhookClient {
    /// Create a webhook client for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, Client::new())
    }

    /// Create a webhook client with a custom HTTP client
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// Post a message as JSON
    ///
    /// Any non-2xx answer is reported as [`ClientError::ApiError`].
    pub async fn post_message(&self, message: &Message) -> Result<()> {
        if self.url.is_empty() {
            return Err(ClientError::InvalidRequest(
                "webhook url cannot be empty".to_string(),
            ));
        }

        let response = self.client.post(&self.url).json(message).send().await?;

        handle_empty_response(response).await
    }
}
