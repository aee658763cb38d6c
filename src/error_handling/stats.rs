//! Exporter statistics tracking.
//!
//! Thread-safe counters describing the exporter itself: scrapes served,
//! refresh passes, and upstream failures per call. Exposed on `/status`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ApiCall;

/// Thread-safe exporter statistics tracker.
///
/// All counters are atomics, so one instance is shared through an `Arc`
/// between the refresh loop, the collector and the HTTP handlers.
pub struct ExporterStats {
    api_failures: HashMap<ApiCall, AtomicUsize>,
    scrapes: AtomicUsize,
    failed_scrapes: AtomicUsize,
    refresh_passes: AtomicUsize,
    failed_refresh_passes: AtomicUsize,
    /// Unix seconds of the last completed refresh pass, 0 if none yet
    last_refresh: AtomicI64,
}

impl Default for ExporterStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterStats {
    pub fn new() -> Self {
        let mut api_failures = HashMap::new();
        for call in ApiCall::iter() {
            api_failures.insert(call, AtomicUsize::new(0));
        }

        ExporterStats {
            api_failures,
            scrapes: AtomicUsize::new(0),
            failed_scrapes: AtomicUsize::new(0),
            refresh_passes: AtomicUsize::new(0),
            failed_refresh_passes: AtomicUsize::new(0),
            last_refresh: AtomicI64::new(0),
        }
    }

    /// Increment the failure counter of an upstream call.
    pub fn record_api_failure(&self, call: ApiCall) {
        if let Some(counter) = self.api_failures.get(&call) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map",
                call
            );
        }
    }

    /// Get the failure count of an upstream call.
    pub fn api_failure_count(&self, call: ApiCall) -> usize {
        self.api_failures
            .get(&call)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Sum of failures across all upstream calls.
    pub fn total_api_failures(&self) -> usize {
        self.api_failures
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    /// Record a finished scrape; `healthy` is false when it ended as `up=0`.
    pub fn record_scrape(&self, healthy: bool) {
        self.scrapes.fetch_add(1, Ordering::Relaxed);
        if !healthy {
            self.failed_scrapes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn scrapes(&self) -> usize {
        self.scrapes.load(Ordering::SeqCst)
    }

    pub fn failed_scrapes(&self) -> usize {
        self.failed_scrapes.load(Ordering::SeqCst)
    }

    /// Record a refresh pass that walked every WAN interface.
    pub fn record_refresh_success(&self, finished_at: i64) {
        self.refresh_passes.fetch_add(1, Ordering::Relaxed);
        self.last_refresh.store(finished_at, Ordering::SeqCst);
    }

    /// Record a refresh pass that was aborted.
    pub fn record_refresh_failure(&self) {
        self.failed_refresh_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn refresh_passes(&self) -> usize {
        self.refresh_passes.load(Ordering::SeqCst)
    }

    pub fn failed_refresh_passes(&self) -> usize {
        self.failed_refresh_passes.load(Ordering::SeqCst)
    }

    /// Unix seconds of the last completed refresh pass, if any.
    pub fn last_refresh(&self) -> Option<i64> {
        match self.last_refresh.load(Ordering::SeqCst) {
            0 => None,
            ts => Some(ts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = ExporterStats::new();
        for call in ApiCall::iter() {
            assert_eq!(stats.api_failure_count(call), 0);
        }
        assert_eq!(stats.total_api_failures(), 0);
        assert_eq!(stats.scrapes(), 0);
        assert_eq!(stats.refresh_passes(), 0);
        assert_eq!(stats.last_refresh(), None);
    }

    #[test]
    fn test_api_failures_are_counted_per_call() {
        let stats = ExporterStats::new();
        stats.record_api_failure(ApiCall::VlanPage);
        stats.record_api_failure(ApiCall::VlanPage);
        stats.record_api_failure(ApiCall::LanDevices);

        assert_eq!(stats.api_failure_count(ApiCall::VlanPage), 2);
        assert_eq!(stats.api_failure_count(ApiCall::LanDevices), 1);
        assert_eq!(stats.api_failure_count(ApiCall::SystemStats), 0);
        assert_eq!(stats.total_api_failures(), 3);
    }

    #[test]
    fn test_scrape_counters() {
        let stats = ExporterStats::new();
        stats.record_scrape(true);
        stats.record_scrape(false);
        stats.record_scrape(true);
        assert_eq!(stats.scrapes(), 3);
        assert_eq!(stats.failed_scrapes(), 1);
    }

    #[test]
    fn test_refresh_counters() {
        let stats = ExporterStats::new();
        stats.record_refresh_failure();
        stats.record_refresh_success(1_700_000_000);
        assert_eq!(stats.refresh_passes(), 1);
        assert_eq!(stats.failed_refresh_passes(), 1);
        assert_eq!(stats.last_refresh(), Some(1_700_000_000));
    }

    #[test]
    fn test_concurrent_increments() {
        use std::sync::Arc;
        let stats = Arc::new(ExporterStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_api_failure(ApiCall::InterfaceMonitor);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }
        assert_eq!(stats.api_failure_count(ApiCall::InterfaceMonitor), 800);
    }
}
