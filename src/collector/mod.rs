//! Scrape-time metrics collection.
//!
//! A scrape fetches system stats, LAN devices and the interface monitor,
//! joins them against the [`VlanCache`] and returns a flat list of gauge
//! samples. System stats are load-bearing: without them the scrape reports
//! only `ikuai_up{id="host"} 0`. The device and interface sections are
//! best effort and are skipped on their own when their call fails.

mod descriptors;
pub mod devices;
pub mod interfaces;
pub mod system;

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, error, warn};

use crate::config::HOST_ID;
use crate::error_handling::{CollectError, ExporterStats};
use crate::ikuai::{IkuaiApi, VlanRecord};
use crate::vlan_cache::VlanCache;

pub use descriptors::{host_down, MetricDesc, Observation, DESCRIPTORS};

/// Joins live appliance data with the VLAN inventory on every scrape.
#[derive(Clone)]
pub struct MetricsCollector {
    api: Arc<dyn IkuaiApi>,
    cache: VlanCache,
    stats: Arc<ExporterStats>,
}

impl MetricsCollector {
    pub fn new(api: Arc<dyn IkuaiApi>, cache: VlanCache, stats: Arc<ExporterStats>) -> Self {
        MetricsCollector { api, cache, stats }
    }

    /// Descriptors of every family [`MetricsCollector::collect`] can emit.
    pub fn describe(&self) -> &'static [MetricDesc] {
        DESCRIPTORS
    }

    /// Runs one scrape.
    ///
    /// Never fails: any error or panic inside the pass yields the single
    /// host-down sample instead, and no partial output leaks out.
    pub async fn collect(&self) -> Vec<Observation> {
        let task = {
            let api = Arc::clone(&self.api);
            let cache = self.cache.clone();
            let stats = Arc::clone(&self.stats);
            tokio::spawn(async move {
                let now = chrono::Utc::now().timestamp();
                scrape(api.as_ref(), &cache, &stats, now).await
            })
        };

        let observations = match task.await {
            Ok(Ok(observations)) => Some(observations),
            Ok(Err(e)) => {
                warn!("Scrape aborted: {}", e);
                None
            }
            Err(join_error) => {
                error!("Scrape failed unexpectedly: {}", join_error);
                None
            }
        };

        match observations {
            Some(observations) => {
                debug!("Scrape produced {} samples", observations.len());
                self.stats.record_scrape(true);
                observations
            }
            None => {
                self.stats.record_scrape(false);
                vec![host_down()]
            }
        }
    }

    /// Copy of the VLAN inventory as it currently stands.
    pub async fn snapshot(&self) -> BTreeMap<String, VlanRecord> {
        self.cache.read_all().await
    }
}

/// One collection pass with the clock pinned to `now` (unix seconds).
pub async fn scrape(
    api: &dyn IkuaiApi,
    cache: &VlanCache,
    stats: &ExporterStats,
    now: i64,
) -> Result<Vec<Observation>, CollectError> {
    let system_stats = api.fetch_system_stats().await.map_err(|e| {
        stats.record_api_failure(e.call());
        CollectError::SystemStats(e)
    })?;

    let mut out = Vec::new();
    system::observe(&system_stats, &mut out)?;
    out.push(descriptors::UP.observe(&[HOST_ID, ""], 1.0)?);

    match api.fetch_lan_devices().await {
        Ok(devices) => devices::observe(&devices, cache, &mut out).await?,
        Err(e) => {
            stats.record_api_failure(e.call());
            warn!("Skipping LAN device metrics: {}", e);
        }
    }

    match api.fetch_interface_monitor().await {
        Ok(monitor) => interfaces::observe(&monitor, cache, now, &mut out).await?,
        Err(e) => {
            stats.record_api_failure(e.call());
            warn!("Skipping interface metrics: {}", e);
        }
    }

    Ok(out)
}
