//! Notification DTOs
//!
//! Incoming-webhook message layout: a free-text summary plus a list of
//! colored, titled and linked attachments.

use serde::{Deserialize, Serialize};

/// Message posted to the notification webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub username: String,
    pub icon_emoji: String,
    pub attachments: Vec<Attachment>,
}

/// A single entry of a message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// `good`, `warning`, `danger` or empty
    pub color: String,
    pub title: String,
    pub title_link: String,
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,

    /// Epoch seconds shown in the attachment footer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

/// Labeled value attached to an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}
