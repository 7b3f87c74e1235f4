//! Service layer
//!
//! Services hold the reporting policy: turning a finished job result into a
//! notification message, and tallying what happened over a run.
//!
//! Formatting is trait-based so the reporter can be exercised with any
//! message layout.

mod formatter;
mod summary;

// Re-export traits
pub use formatter::ReportFormatter;

// Re-export implementations
pub use formatter::SlackFormatter;
pub use summary::ReportSummary;
