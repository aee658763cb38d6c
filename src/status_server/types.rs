//! Status server data structures.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::collector::MetricsCollector;
use crate::error_handling::ExporterStats;
use crate::vlan_cache::VlanCache;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub collector: MetricsCollector,
    pub cache: VlanCache,
    pub stats: Arc<ExporterStats>,
    pub start_time: Arc<Instant>,
}

impl AppState {
    pub fn new(collector: MetricsCollector, cache: VlanCache, stats: Arc<ExporterStats>) -> Self {
        AppState {
            collector,
            cache,
            stats,
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// JSON response for `/status` endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub uptime_seconds: f64,
    pub vlan_cache_entries: usize,
    pub refresh: RefreshCounts,
    pub scrapes: ScrapeCounts,
    pub api_failures: ApiFailureCounts,
}

#[derive(Debug, Serialize)]
pub struct RefreshCounts {
    pub completed_passes: usize,
    pub failed_passes: usize,
    /// RFC 3339 time of the last completed pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeCounts {
    pub total: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiFailureCounts {
    pub total: usize,
    pub by_call: BTreeMap<&'static str, usize>,
}
