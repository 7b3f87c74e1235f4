//! Job runner
//!
//! Drives one host through its analysis lifecycle:
//!
//! `PendingStart → Launching → Polling → {Ready, Error, Unavailable, Expired}`
//!
//! The runner owns its [`ScanResult`] until it reaches a terminal state, then
//! pushes it onto the result queue exactly once.

use std::sync::Arc;
use std::time::Duration;

use labwatch_client::ClientError;
use labwatch_core::domain::job::JobState;
use labwatch_core::domain::result::ScanResult;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::repository::ScanRepository;
use crate::scheduler::queue::ResultQueue;

/// Runs the analysis of a single host
pub struct JobRunner {
    /// Spawn order, used only for the stagger delay
    index: usize,
    host: String,
    config: Arc<Config>,
    repository: Arc<dyn ScanRepository>,
    queue: ResultQueue,
    result: ScanResult,
    state: JobState,
    remaining_retries: u32,
}

impl JobRunner {
    /// Creates a runner for the `index`-th host
    pub fn new(
        index: usize,
        host: String,
        config: Arc<Config>,
        repository: Arc<dyn ScanRepository>,
        queue: ResultQueue,
    ) -> Self {
        let remaining_retries = config.launch_retries;
        Self {
            index,
            result: ScanResult::new(host.clone()),
            host,
            config,
            repository,
            queue,
            state: JobState::PendingStart,
            remaining_retries,
        }
    }

    /// Runs the job to a terminal state and hands the result off
    pub async fn run(mut self) -> JobState {
        self.stagger().await;

        if self.launch().await {
            self.poll().await;
        } else {
            self.result.mark_unavailable();
            warn!(host = %self.host, "Scan API unavailable, giving up");
            self.transition(JobState::Unavailable);
        }

        let state = self.state;
        self.result.mark_finished();

        if let Err(e) = self.queue.push(self.result) {
            error!("{:#}", e);
        }

        state
    }

    fn transition(&mut self, next: JobState) {
        debug_assert!(
            !self.state.is_terminal(),
            "job for {} left terminal state {}",
            self.host,
            self.state
        );
        debug!(host = %self.host, from = %self.state, to = %next, "Job state change");
        self.state = next;
    }

    /// `index × start_delay`, saturating instead of overflowing
    fn stagger_delay(&self) -> Duration {
        let index = u32::try_from(self.index).unwrap_or(u32::MAX);
        self.config.start_delay.saturating_mul(index)
    }

    async fn stagger(&self) {
        if self.index == 0 {
            return;
        }

        let delay = self.stagger_delay();
        debug!(host = %self.host, ?delay, "Waiting before launch");
        time::sleep(delay).await;
    }

    /// Returns `true` once a launch succeeded, `false` when the budget ran out
    async fn launch(&mut self) -> bool {
        self.transition(JobState::Launching);
        info!(host = %self.host, "Starting analysis");

        loop {
            match self.repository.start_analysis(&self.host).await {
                Ok(()) => return true,
                Err(e) => {
                    warn!(
                        host = %self.host,
                        remaining_retries = self.remaining_retries,
                        reason = launch_failure_reason(&e),
                        "Failed to start analysis: {:#}", e
                    );

                    if self.remaining_retries == 0 {
                        return false;
                    }

                    time::sleep(self.config.launch_backoff).await;
                    self.remaining_retries -= 1;
                    info!(host = %self.host, "Retrying analysis start");
                }
            }
        }
    }

    async fn poll(&mut self) {
        self.transition(JobState::Polling);
        let started = Instant::now();

        loop {
            time::sleep(self.config.poll_interval).await;

            debug!(host = %self.host, "Fetching analysis status");
            match self.repository.fetch_analysis(&self.host).await {
                Ok(analysis) => {
                    debug!(host = %self.host, status = %analysis.status, "Fetched analysis");
                    self.result.analysis = Some(analysis);
                }
                Err(e) => {
                    warn!(host = %self.host, "Failed to fetch analysis: {:#}", e);
                }
            }

            if self.result.is_ready() {
                let state = self.result.state();
                info!(host = %self.host, %state, "Analysis finished");
                self.transition(state);
                return;
            }

            if started.elapsed() > self.config.fetch_timeout {
                self.result.mark_expired();
                warn!(
                    host = %self.host,
                    timeout = ?self.config.fetch_timeout,
                    "Analysis did not finish in time"
                );
                self.transition(JobState::Expired);
                return;
            }
        }
    }
}

/// Short classification of a failed launch for the logs
fn launch_failure_reason(error: &anyhow::Error) -> &'static str {
    match error.downcast_ref::<ClientError>() {
        Some(e) if e.is_rate_limited() => "rate limited",
        Some(e) if e.is_server_error() => "overloaded",
        Some(e) if e.is_client_error() => "rejected",
        Some(ClientError::ApiError { .. }) => "unexpected status",
        _ => "unreachable",
    }
}
