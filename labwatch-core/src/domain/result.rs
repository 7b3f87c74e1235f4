//! Result of a host's analysis job
//!
//! A `ScanResult` is created empty when a job starts, filled in by the owning
//! job runner while it polls, and moved into the result queue once the job
//! reaches a terminal state. Nothing mutates it after the handoff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::analysis::{Analysis, AnalysisStatus};
use crate::domain::job::JobState;

/// How a job ended
///
/// The three outcomes are mutually exclusive. `Completed` covers both
/// `READY` and `ERROR` payloads; the payload status tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Completed,
    /// Polling exceeded the fetch timeout
    Expired,
    /// The analysis could never be launched
    Unavailable,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::Expired => write!(f, "expired"),
            Outcome::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Per-host job result handed from a runner to the reporter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub host: String,

    /// Last payload fetched from the scan API, if any
    pub analysis: Option<Analysis>,

    pub outcome: Outcome,

    /// Set when the result is handed off
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScanResult {
    /// Creates an empty result for `host`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            analysis: None,
            outcome: Outcome::Completed,
            finished_at: None,
        }
    }

    /// Whether the last fetched payload carries a terminal status
    pub fn is_ready(&self) -> bool {
        self.analysis.as_ref().is_some_and(Analysis::is_ready)
    }

    pub fn mark_expired(&mut self) {
        self.outcome = Outcome::Expired;
    }

    pub fn mark_unavailable(&mut self) {
        self.outcome = Outcome::Unavailable;
    }

    pub fn mark_finished(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Terminal job state this result corresponds to
    pub fn state(&self) -> JobState {
        match self.outcome {
            Outcome::Expired => JobState::Expired,
            Outcome::Unavailable => JobState::Unavailable,
            Outcome::Completed => match self.analysis.as_ref().map(|a| &a.status) {
                Some(AnalysisStatus::Error) => JobState::Error,
                _ => JobState::Ready,
            },
        }
    }
}
