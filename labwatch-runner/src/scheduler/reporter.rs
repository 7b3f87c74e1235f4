//! Reporter
//!
//! Single consumer of the result queue. For each result it formats a
//! message, logs it, hands it to the notifier and acknowledges it. The loop
//! ends once the queue's countdown reaches zero.

use std::sync::Arc;

use labwatch_core::domain::result::ScanResult;
use tracing::{debug, error, info, warn};

use crate::repository::{Delivery, Notifier};
use crate::scheduler::queue::ResultReceiver;
use crate::service::{ReportFormatter, ReportSummary};

/// Drains the result queue and ships notifications
pub struct Reporter {
    receiver: ResultReceiver,
    formatter: Arc<dyn ReportFormatter>,
    notifier: Arc<dyn Notifier>,
}

impl Reporter {
    pub fn new(
        receiver: ResultReceiver,
        formatter: Arc<dyn ReportFormatter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            receiver,
            formatter,
            notifier,
        }
    }

    /// Processes results until every expected one has been reported
    pub async fn run(mut self) -> ReportSummary {
        let mut summary = ReportSummary::new();

        while let Some(result) = self.receiver.recv().await {
            self.report(&result, &mut summary).await;
            self.receiver.task_done();
            debug!(
                remaining = self.receiver.remaining(),
                "Result acknowledged"
            );
        }

        if self.receiver.remaining() > 0 {
            warn!(
                "Result queue closed with {} result(s) still expected",
                self.receiver.remaining()
            );
        }

        info!("Reported {} result(s)", self.receiver.processed());
        summary
    }

    async fn report(&self, result: &ScanResult, summary: &mut ReportSummary) {
        let message = self.formatter.format(result);

        match serde_json::to_string(&message) {
            Ok(json) => info!(host = %result.host, "{}", json),
            Err(e) => warn!(host = %result.host, "Failed to serialize report: {}", e),
        }

        let delivery = match self.notifier.send(&message).await {
            Ok(Delivery::Sent) => {
                debug!(host = %result.host, "Report delivered");
                Some(Delivery::Sent)
            }
            Ok(Delivery::Skipped) => {
                warn!(
                    host = %result.host,
                    "Could not send report: webhook url is not configured (SLACK_WEBHOOK)"
                );
                Some(Delivery::Skipped)
            }
            Err(e) => {
                error!(host = %result.host, "Failed to deliver report: {:#}", e);
                None
            }
        };

        summary.record(result);
        summary.record_delivery(delivery);
    }
}
