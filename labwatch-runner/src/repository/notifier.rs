//! Notification repository
//!
//! Ships formatted messages to the webhook. An unconfigured destination is
//! not an error: sends are skipped and the caller decides how to log it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use labwatch_client::WebhookClient;
use labwatch_core::dto::notification::Message;

/// What happened to a message handed to a notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the destination
    Sent,
    /// No destination configured
    Skipped,
}

/// Repository trait for the notification sink
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends one message
    async fn send(&self, message: &Message) -> Result<Delivery>;
}

/// Webhook implementation of Notifier
pub struct WebhookNotifier {
    client: Option<WebhookClient>,
}

impl WebhookNotifier {
    /// Creates a notifier; `None` disables delivery
    pub fn new(client: Option<WebhookClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &Message) -> Result<Delivery> {
        let Some(client) = &self.client else {
            return Ok(Delivery::Skipped);
        };

        client
            .post_message(message)
            .await
            .context("Failed to post message to webhook")?;

        Ok(Delivery::Sent)
    }
}
