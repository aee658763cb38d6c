//! Background refresh of the VLAN inventory.
//!
//! A pass fetches the WAN list, then pages through the VLANs of every WAN
//! interface and upserts them into the [`VlanCache`]. The loop runs passes
//! forever: a pass that fails, or panics, is logged and the next one starts
//! after the usual interval.

mod pagination;

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};

use crate::config::Config;
use crate::error_handling::{ApiError, ExporterStats};
use crate::ikuai::IkuaiApi;
use crate::vlan_cache::VlanCache;

pub use pagination::{page_retry_strategy, paginate_wan};

/// Timing and paging of the refresh loop.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub page_size: usize,
    /// Pause after every pass, successful or not
    pub interval: Duration,
    /// Pause before the first pass
    pub startup_delay: Duration,
}

impl From<&Config> for RefreshSettings {
    fn from(config: &Config) -> Self {
        RefreshSettings {
            page_size: config.page_size,
            interval: config.refresh_interval(),
            startup_delay: config.startup_delay(),
        }
    }
}

/// Outcome of a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub wan_interfaces: usize,
    pub vlans: usize,
}

/// Runs one full pass over every WAN interface.
///
/// A failed WAN list aborts the pass; page failures are retried in place.
pub async fn load_all(
    api: &dyn IkuaiApi,
    cache: &VlanCache,
    stats: &ExporterStats,
    page_size: usize,
) -> Result<RefreshSummary, ApiError> {
    info!("Loading VLAN inventory from iKuai");

    let wans = api.fetch_wan_list().await.map_err(|e| {
        stats.record_api_failure(e.call());
        e
    })?;

    let mut summary = RefreshSummary::default();
    for wan in &wans {
        let count = paginate_wan(api, cache, stats, &wan.interface, page_size).await?;
        log::debug!("Loaded {} VLANs from {}", count, wan.interface);
        summary.wan_interfaces += 1;
        summary.vlans += count;
    }

    info!(
        "VLAN inventory loaded: {} VLANs across {} WAN interfaces",
        summary.vlans, summary.wan_interfaces
    );
    Ok(summary)
}

/// Runs one pass on its own task so a panic inside it is contained.
///
/// Returns true when the pass completed.
pub async fn run_pass(
    api: &Arc<dyn IkuaiApi>,
    cache: &VlanCache,
    stats: &Arc<ExporterStats>,
    page_size: usize,
) -> bool {
    let task = {
        let api = Arc::clone(api);
        let cache = cache.clone();
        let stats = Arc::clone(stats);
        tokio::spawn(async move { load_all(api.as_ref(), &cache, &stats, page_size).await })
    };

    match task.await {
        Ok(Ok(_)) => {
            stats.record_refresh_success(chrono::Utc::now().timestamp());
            true
        }
        Ok(Err(e)) => {
            warn!("VLAN refresh pass aborted: {}", e);
            stats.record_refresh_failure();
            false
        }
        Err(join_error) => {
            error!("VLAN refresh pass failed unexpectedly: {}", join_error);
            stats.record_refresh_failure();
            false
        }
    }
}

/// Refreshes the inventory forever.
///
/// The first pass waits for `startup_delay` so the warm-up load done at
/// startup is not overlapped.
pub async fn run_refresh_loop(
    api: Arc<dyn IkuaiApi>,
    cache: VlanCache,
    stats: Arc<ExporterStats>,
    settings: RefreshSettings,
) {
    tokio::time::sleep(settings.startup_delay).await;
    info!(
        "Background VLAN refresh started (every {}s)",
        settings.interval.as_secs()
    );

    loop {
        run_pass(&api, &cache, &stats, settings.page_size).await;
        tokio::time::sleep(settings.interval).await;
    }
}
