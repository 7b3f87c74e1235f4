//! Scan driver
//!
//! Spawns the reporter and one job runner per host, then waits for the
//! reporter to acknowledge as many results as there are hosts.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::repository::{Notifier, ScanRepository};
use crate::scheduler::analyzer::JobRunner;
use crate::scheduler::queue::result_queue;
use crate::scheduler::reporter::Reporter;
use crate::service::{ReportFormatter, ReportSummary};

/// Runs a batch of host analyses to completion
pub struct ScanDriver {
    config: Arc<Config>,
    repository: Arc<dyn ScanRepository>,
    formatter: Arc<dyn ReportFormatter>,
    notifier: Arc<dyn Notifier>,
}

impl ScanDriver {
    /// Creates a new scan driver
    pub fn new(
        config: Config,
        repository: Arc<dyn ScanRepository>,
        formatter: Arc<dyn ReportFormatter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            repository,
            formatter,
            notifier,
        }
    }

    /// Analyzes every host and returns once all of them were reported
    pub async fn run(&self, hosts: Vec<String>) -> Result<ReportSummary> {
        if hosts.is_empty() {
            info!("No hosts given, nothing to do");
            return Ok(ReportSummary::new());
        }

        info!("Scanning {} host(s)", hosts.len());

        let (queue, receiver) = result_queue(hosts.len());
        let reporter = Reporter::new(
            receiver,
            Arc::clone(&self.formatter),
            Arc::clone(&self.notifier),
        );
        let reporter_handle = tokio::spawn(reporter.run());

        let mut runner_handles = Vec::with_capacity(hosts.len());
        for (index, host) in hosts.into_iter().enumerate() {
            let runner = JobRunner::new(
                index,
                host.clone(),
                Arc::clone(&self.config),
                Arc::clone(&self.repository),
                queue.clone(),
            );
            runner_handles.push((host, tokio::spawn(runner.run())));
        }

        // Runners hold the only producers from here on, so a runner that dies
        // without reporting closes the queue instead of hanging the reporter.
        drop(queue);

        let summary = reporter_handle.await.context("Reporter task panicked")?;

        for (host, handle) in runner_handles {
            if let Err(e) = handle.await {
                warn!(host = %host, "Job runner task panicked: {}", e);
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::{
        CallKind, FakeScanRepository, RecordingNotifier, error, ready,
    };
    use crate::service::SlackFormatter;
    use labwatch_core::domain::job::JobState;

    fn driver(repository: Arc<FakeScanRepository>, notifier: Arc<RecordingNotifier>) -> ScanDriver {
        let config = Config::default();
        let formatter = Arc::new(SlackFormatter::new(config.report_url.clone()));
        ScanDriver::new(config, repository, formatter, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_hosts_is_a_no_op() {
        let repository = Arc::new(FakeScanRepository::new());
        let notifier = Arc::new(RecordingNotifier::configured());

        let summary = driver(repository, notifier.clone())
            .run(Vec::new())
            .await
            .unwrap();

        assert_eq!(summary.processed(), 0);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_host_single_notification() {
        let repository =
            Arc::new(FakeScanRepository::new().with_launch_always_failing("down.example"));
        let notifier = Arc::new(RecordingNotifier::configured());

        let summary = driver(repository.clone(), notifier.clone())
            .run(vec!["down.example".to_string()])
            .await
            .unwrap();

        assert_eq!(summary.count(JobState::Unavailable), 1);
        assert!(repository.calls("down.example", CallKind::Fetch).is_empty());

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].attachments.len(), 1);
        assert_eq!(messages[0].attachments[0].text, "service unavailable");
        assert_eq!(messages[0].attachments[0].color, "danger");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_error_single_notification() {
        let repository = Arc::new(
            FakeScanRepository::new().with_polls("bad.example", vec![Some(error("bad.example", "M"))]),
        );
        let notifier = Arc::new(RecordingNotifier::configured());

        driver(repository.clone(), notifier.clone())
            .run(vec!["bad.example".to_string()])
            .await
            .unwrap();

        assert_eq!(repository.calls("bad.example", CallKind::Start).len(), 1);
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].attachments.len(), 1);
        assert_eq!(messages[0].attachments[0].text, "M");
        assert_eq!(messages[0].attachments[0].color, "danger");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_every_host_in_completion_order() {
        // c finishes first although it launches last
        let repository = Arc::new(
            FakeScanRepository::new()
                .with_polls(
                    "a.example",
                    vec![None, None, None, None, None, Some(ready("a.example", &[("10.0.0.1", "A")]))],
                )
                .with_launch_always_failing("b.example")
                .with_polls("c.example", vec![Some(ready("c.example", &[("10.0.0.3", "F")]))]),
        );
        let notifier = Arc::new(RecordingNotifier::unconfigured());

        let summary = driver(repository, notifier.clone())
            .run(vec![
                "a.example".to_string(),
                "b.example".to_string(),
                "c.example".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(summary.processed(), 3);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.count(JobState::Ready), 2);
        assert_eq!(summary.count(JobState::Unavailable), 1);

        let order: Vec<_> = notifier.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(order, vec!["c.example", "a.example", "b.example"]);
    }
}
