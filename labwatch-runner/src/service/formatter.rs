//! Report formatter
//!
//! Turns a finished [`ScanResult`] into the webhook message layout.
//!
//! Branches, in order:
//! - expired jobs: one negative entry, "timed out"
//! - unavailable jobs: one negative entry, "service unavailable"
//! - `ERROR` payloads: one negative entry carrying the API's status message
//! - everything else: one entry per endpoint, colored by grade

use labwatch_core::domain::analysis::{AnalysisStatus, Endpoint, Severity};
use labwatch_core::domain::result::{Outcome, ScanResult};
use labwatch_core::dto::notification::{Attachment, Field, Message};

const USERNAME: &str = "ssl-labs";
const ICON_EMOJI: &str = ":shield:";

pub const TIMED_OUT_TEXT: &str = "timed out";
pub const UNAVAILABLE_TEXT: &str = "service unavailable";

/// Service trait for building notification messages
pub trait ReportFormatter: Send + Sync {
    /// Builds the message for one finished job
    fn format(&self, result: &ScanResult) -> Message;
}

/// Formatter producing Slack incoming-webhook messages
#[derive(Debug, Clone)]
pub struct SlackFormatter {
    report_url: String,
}

impl SlackFormatter {
    /// Creates a formatter linking entries to pages under `report_url`
    pub fn new(report_url: impl Into<String>) -> Self {
        Self {
            report_url: report_url.into(),
        }
    }

    /// Report page of a host
    pub fn host_link(&self, host: &str) -> String {
        format!("{}?d={}", self.report_url, host)
    }

    /// Report page of a single endpoint of a host
    pub fn endpoint_link(&self, host: &str, address: &str) -> String {
        format!("{}?d={}&s={}", self.report_url, host, address)
    }

    fn failure(&self, result: &ScanResult, text: String) -> Attachment {
        Attachment {
            color: Severity::Negative.color().to_string(),
            title_link: self.host_link(&result.host),
            text,
            ..Default::default()
        }
    }

    fn endpoint(&self, host: &str, endpoint: &Endpoint) -> Attachment {
        let title_link = self.endpoint_link(host, &endpoint.ip_address);

        match &endpoint.grade {
            Some(grade) => Attachment {
                color: grade.severity().color().to_string(),
                title: endpoint.ip_address.clone(),
                title_link,
                fields: vec![Field {
                    title: "Rating".to_string(),
                    value: grade.to_string(),
                    short: true,
                }],
                ..Default::default()
            },
            None => Attachment {
                color: Severity::Negative.color().to_string(),
                title: endpoint.ip_address.clone(),
                title_link,
                text: endpoint.status_message.clone().unwrap_or_default(),
                ..Default::default()
            },
        }
    }
}

impl ReportFormatter for SlackFormatter {
    fn format(&self, result: &ScanResult) -> Message {
        let mut attachments = match (result.outcome, &result.analysis) {
            (Outcome::Expired, _) => vec![self.failure(result, TIMED_OUT_TEXT.to_string())],
            (Outcome::Unavailable, _) => vec![self.failure(result, UNAVAILABLE_TEXT.to_string())],
            (Outcome::Completed, Some(analysis)) if analysis.status == AnalysisStatus::Error => {
                let text = analysis.status_message.clone().unwrap_or_default();
                vec![self.failure(result, text)]
            }
            (Outcome::Completed, Some(analysis)) => analysis
                .endpoints
                .iter()
                .map(|endpoint| self.endpoint(&result.host, endpoint))
                .collect(),
            (Outcome::Completed, None) => Vec::new(),
        };

        if let Some(finished_at) = result.finished_at {
            for attachment in &mut attachments {
                attachment.ts = Some(finished_at.timestamp());
            }
        }

        Message {
            text: result.host.clone(),
            username: USERNAME.to_string(),
            icon_emoji: ICON_EMOJI.to_string(),
            attachments,
        }
    }
}
