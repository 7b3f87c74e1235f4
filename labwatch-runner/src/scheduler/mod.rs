//! Scheduler layer for the runner
//!
//! This layer runs the per-host job lifecycle and funnels finished results
//! through a single queue to the reporter:
//! - `analyzer`: one job runner per host (stagger, launch, poll, hand off)
//! - `queue`: many-producer/one-consumer result queue with a countdown
//! - `reporter`: drains the queue and ships notifications
//! - `driver`: wires the above together for a list of hosts

pub mod analyzer;
pub mod driver;
pub mod queue;
pub mod reporter;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::ScanDriver;
