//! Error handling and exporter statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, upstream calls and scrapes
//! - The `ApiCall` enum naming every upstream call
//! - Exporter statistics (scrapes, refresh passes, per-call failures)
//!
//! Failures are categorized into:
//! - **Upstream failures**: transport errors and non-success statuses, always non-fatal
//! - **Scrape-aborting failures**: turned into a single `ikuai_up{id="host"} 0`

mod stats;
mod types;

// Re-export public API
pub use stats::ExporterStats;
pub use types::{ApiCall, ApiError, CollectError, InitializationError};
