//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger (plain or JSON)
//! - HTTP client with a cookie store for the appliance session
//! - iKuai API client
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::{init_http_client, init_ikuai_client};
pub use logger::init_logger_with;
