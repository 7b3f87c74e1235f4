//! Job domain types

use serde::{Deserialize, Serialize};

/// Lifecycle state of a single host's analysis job
///
/// `PendingStart → Launching → Polling → {Ready, Error, Unavailable, Expired}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Waiting out the stagger delay
    PendingStart,
    /// Issuing start requests against the scan API
    Launching,
    /// Launched, waiting for a terminal analysis status
    Polling,
    /// Analysis finished with `READY`
    Ready,
    /// Analysis finished with `ERROR`
    Error,
    /// Every launch attempt failed
    Unavailable,
    /// Polling exceeded the fetch timeout
    Expired,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Ready | JobState::Error | JobState::Unavailable | JobState::Expired
        )
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::PendingStart => write!(f, "PendingStart"),
            JobState::Launching => write!(f, "Launching"),
            JobState::Polling => write!(f, "Polling"),
            JobState::Ready => write!(f, "Ready"),
            JobState::Error => write!(f, "Error"),
            JobState::Unavailable => write!(f, "Unavailable"),
            JobState::Expired => write!(f, "Expired"),
        }
    }
}
