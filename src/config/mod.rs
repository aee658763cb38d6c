//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (page size, intervals, label conventions)
//! - CLI/environment option types and validation

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigError, LogFormat, LogLevel};
