//! Analysis domain types
//!
//! Mirrors the subset of the scan API payload the runner and reporter consult:
//! the overall status, its message, and the per-endpoint grades.

use serde::{Deserialize, Deserializer, Serialize};

/// Analysis payload as returned by the scan API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Host the analysis was run against
    #[serde(default)]
    pub host: String,

    /// Current analysis status
    pub status: AnalysisStatus,

    /// Human readable status, set by the API on errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// Resolved endpoints, present once the analysis progressed far enough
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl Analysis {
    /// Whether the analysis reached a status that ends polling
    pub fn is_ready(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Analysis status token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisStatus {
    Dns,
    InProgress,
    Ready,
    Error,
    /// Token not known to this client
    Other(String),
}

impl AnalysisStatus {
    /// `READY` and `ERROR` end polling; everything else keeps it going.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Ready | AnalysisStatus::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnalysisStatus::Dns => "DNS",
            AnalysisStatus::InProgress => "IN_PROGRESS",
            AnalysisStatus::Ready => "READY",
            AnalysisStatus::Error => "ERROR",
            AnalysisStatus::Other(token) => token,
        }
    }
}

impl From<String> for AnalysisStatus {
    fn from(token: String) -> Self {
        match token.as_str() {
            "DNS" => AnalysisStatus::Dns,
            "IN_PROGRESS" => AnalysisStatus::InProgress,
            "READY" => AnalysisStatus::Ready,
            "ERROR" => AnalysisStatus::Error,
            _ => AnalysisStatus::Other(token),
        }
    }
}

impl From<AnalysisStatus> for String {
    fn from(status: AnalysisStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved address of a scanned host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub ip_address: String,

    #[serde(
        default,
        deserialize_with = "non_empty_grade",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade: Option<Grade>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

fn non_empty_grade<'de, D>(deserializer: D) -> Result<Option<Grade>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|g| !g.is_empty()).map(Grade))
}

/// Letter-scale rating of a single endpoint's configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(pub String);

impl Grade {
    pub fn new(grade: impl Into<String>) -> Self {
        Self(grade.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Maps the grade onto the three-tier notification scale
    pub fn severity(&self) -> Severity {
        match self.0.as_str() {
            "A+" | "A" | "A-" => Severity::Positive,
            "B" | "C" | "D" | "E" => Severity::Caution,
            "F" | "T" | "M" => Severity::Negative,
            _ => Severity::Neutral,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity of a reported entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Positive,
    Caution,
    Negative,
    Neutral,
}

impl Severity {
    /// Attachment color understood by the webhook
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Positive => "good",
            Severity::Caution => "warning",
            Severity::Negative => "danger",
            Severity::Neutral => "",
        }
    }
}
