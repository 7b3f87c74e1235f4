//! Run summary
//!
//! Tallies what the reporter processed so `main` can print a short table
//! once every host has been reported.

use colored::*;
use labwatch_core::domain::job::JobState;
use labwatch_core::domain::result::ScanResult;

use crate::repository::Delivery;

/// One reported host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub host: String,
    pub state: JobState,
    /// Endpoint grades, in payload order; ungraded endpoints show as "-"
    pub grades: Vec<String>,
}

/// Aggregated outcome of a run
#[derive(Debug, Clone, Default)]
pub struct ReportSummary {
    pub entries: Vec<SummaryEntry>,
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a processed result
    pub fn record(&mut self, result: &ScanResult) {
        let grades = match result.state() {
            JobState::Ready => result
                .analysis
                .iter()
                .flat_map(|analysis| analysis.endpoints.iter())
                .map(|endpoint| {
                    endpoint
                        .grade
                        .as_ref()
                        .map(|grade| grade.to_string())
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect(),
            _ => Vec::new(),
        };

        self.entries.push(SummaryEntry {
            host: result.host.clone(),
            state: result.state(),
            grades,
        });
    }

    /// Records how a message delivery went; `None` means the send failed
    pub fn record_delivery(&mut self, delivery: Option<Delivery>) {
        match delivery {
            Some(Delivery::Sent) => self.delivered += 1,
            Some(Delivery::Skipped) => self.skipped += 1,
            None => self.failed += 1,
        }
    }

    /// Number of processed results
    pub fn processed(&self) -> usize {
        self.entries.len()
    }

    /// Number of results that ended in `state`
    pub fn count(&self, state: JobState) -> usize {
        self.entries.iter().filter(|e| e.state == state).count()
    }

    /// Prints the summary table to stdout
    pub fn print(&self) {
        println!();
        println!(
            "{}",
            format!("Reported {} host(s):", self.processed()).bold()
        );
        for entry in &self.entries {
            let state = match entry.state {
                JobState::Ready => entry.state.to_string().green(),
                JobState::Error | JobState::Unavailable => entry.state.to_string().red(),
                JobState::Expired => entry.state.to_string().yellow(),
                _ => entry.state.to_string().normal(),
            };

            if entry.grades.is_empty() {
                println!("  {:<40} {}", entry.host.cyan(), state);
            } else {
                println!(
                    "  {:<40} {} [{}]",
                    entry.host.cyan(),
                    state,
                    entry.grades.join(", ")
                );
            }
        }
        println!(
            "Ready: {}, error: {}, unavailable: {}, expired: {}",
            self.count(JobState::Ready),
            self.count(JobState::Error),
            self.count(JobState::Unavailable),
            self.count(JobState::Expired)
        );
        println!(
            "Notifications: {} sent, {} skipped, {} failed",
            self.delivered.to_string().green(),
            self.skipped.to_string().yellow(),
            self.failed.to_string().red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labwatch_core::domain::analysis::{Analysis, AnalysisStatus, Endpoint, Grade};

    #[test]
    fn test_record_ready_collects_grades() {
        let mut result = ScanResult::new("example.com");
        result.analysis = Some(Analysis {
            host: "example.com".to_string(),
            status: AnalysisStatus::Ready,
            status_message: None,
            endpoints: vec![
                Endpoint {
                    ip_address: "10.0.0.1".to_string(),
                    grade: Some(Grade::new("A+")),
                    status_message: None,
                },
                Endpoint {
                    ip_address: "10.0.0.2".to_string(),
                    grade: None,
                    status_message: Some("No secure protocols supported".to_string()),
                },
            ],
        });

        let mut summary = ReportSummary::new();
        summary.record(&result);

        assert_eq!(summary.processed(), 1);
        assert_eq!(summary.count(JobState::Ready), 1);
        assert_eq!(summary.entries[0].grades, vec!["A+", "-"]);
    }

    #[test]
    fn test_record_failures_and_deliveries() {
        let mut expired = ScanResult::new("slow.example");
        expired.mark_expired();
        let mut unavailable = ScanResult::new("down.example");
        unavailable.mark_unavailable();

        let mut summary = ReportSummary::new();
        summary.record(&expired);
        summary.record(&unavailable);
        summary.record_delivery(Some(Delivery::Sent));
        summary.record_delivery(Some(Delivery::Skipped));
        summary.record_delivery(None);

        assert_eq!(summary.count(JobState::Expired), 1);
        assert_eq!(summary.count(JobState::Unavailable), 1);
        assert!(summary.entries.iter().all(|e| e.grades.is_empty()));
        assert_eq!((summary.delivered, summary.skipped, summary.failed), (1, 1, 1));
    }
}
