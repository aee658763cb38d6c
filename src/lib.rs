//! ikuai_exporter library: Prometheus exporter for iKuai routers
//!
//! The exporter keeps a cache of the router's VLAN inventory fresh in the
//! background and, on every scrape, joins live system, device and interface
//! data against it to produce labelled gauges.
//!
//! # Example
//!
//! ```no_run
//! use ikuai_exporter::{run_exporter, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     ikuai_url: "https://192.168.1.1".to_string(),
//!     ikuai_password: "secret".to_string(),
//!     ..Default::default()
//! };
//!
//! run_exporter(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod collector;
pub mod config;
pub mod error_handling;
pub mod ikuai;
pub mod initialization;
pub mod refresh;
mod run;
pub mod status_server;
pub mod vlan_cache;

// Re-export public API
pub use collector::{MetricDesc, MetricsCollector, Observation};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ApiCall, ApiError, CollectError, ExporterStats};
pub use ikuai::{IkuaiApi, IkuaiClient, VlanRecord};
pub use run::{run_exporter, run_exporter_with};
pub use vlan_cache::VlanCache;
