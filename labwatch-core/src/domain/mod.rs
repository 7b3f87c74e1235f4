//! Core domain types
//!
//! This module contains the structures used across labwatch components.
//! Analysis payloads come from the scan API, results and job states are
//! produced by the runner and consumed by the reporter.

pub mod analysis;
pub mod job;
pub mod result;
