//! Labwatch Core
//!
//! Core types shared by the labwatch client and runner.
//!
//! This crate contains:
//! - Domain types: scan API payloads, grades, per-host job results and states
//! - DTOs: the webhook notification message
//!
//! Note: HTTP access lives in labwatch-client, job orchestration in labwatch-runner.

pub mod domain;
pub mod dto;
