//! Process wiring.
//!
//! Builds the shared state, warms the VLAN inventory up once, starts the
//! background refresh loop and serves HTTP until the server stops.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::collector::MetricsCollector;
use crate::config::Config;
use crate::error_handling::ExporterStats;
use crate::ikuai::IkuaiApi;
use crate::initialization::init_ikuai_client;
use crate::refresh::{load_all, run_refresh_loop, RefreshSettings};
use crate::status_server::{start_status_server, AppState};
use crate::vlan_cache::VlanCache;

/// Runs the exporter against the appliance named in `config`.
///
/// Only returns when the HTTP server fails or cannot bind.
///
/// # Errors
///
/// This function will return an error if:
/// - The configuration is invalid
/// - The API client cannot be built
/// - The listen address cannot be bound
pub async fn run_exporter(config: Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;
    let api: Arc<dyn IkuaiApi> =
        init_ikuai_client(&config).context("Failed to initialize iKuai client")?;
    run_exporter_with(api, config).await
}

/// Runs the exporter against any [`IkuaiApi`] implementation.
pub async fn run_exporter_with(api: Arc<dyn IkuaiApi>, config: Config) -> Result<()> {
    let addr = config.socket_addr().context("Invalid listen address")?;
    let settings = RefreshSettings::from(&config);
    let cache = VlanCache::new();
    let stats = Arc::new(ExporterStats::new());

    info!("Exporting iKuai metrics from {}", config.ikuai_url);

    // Warm-up load so the first scrapes already have account labels
    match load_all(api.as_ref(), &cache, &stats, settings.page_size).await {
        Ok(summary) => {
            stats.record_refresh_success(chrono::Utc::now().timestamp());
            info!(
                "Warm-up complete: {} VLANs from {} WAN interfaces",
                summary.vlans, summary.wan_interfaces
            );
        }
        Err(e) => {
            stats.record_refresh_failure();
            warn!("Warm-up VLAN load failed, continuing with an empty inventory: {}", e);
        }
    }

    tokio::spawn(run_refresh_loop(
        Arc::clone(&api),
        cache.clone(),
        Arc::clone(&stats),
        settings,
    ));

    let collector = MetricsCollector::new(api, cache.clone(), Arc::clone(&stats));
    start_status_server(addr, AppState::new(collector, cache, stats)).await
}
