//! Repository layer
//!
//! Repositories are thin adapters over the HTTP clients in labwatch-client.
//! They give the scheduler small, focused interfaces without any business
//! logic.
//!
//! All repositories are trait-based so the scheduler can be driven by
//! scripted fakes in tests.

mod notifier;
mod scan;

// Re-export traits
pub use notifier::{Delivery, Notifier};
pub use scan::ScanRepository;

// Re-export implementations
pub use notifier::WebhookNotifier;
pub use scan::HttpScanRepository;
