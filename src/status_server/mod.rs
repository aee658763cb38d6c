//! HTTP server exposing the exporter.
//!
//! Provides three endpoints:
//! - `/metrics` - Prometheus text exposition, scraped live from the appliance
//! - `/allVlan` - the cached VLAN inventory as JSON
//! - `/status` - JSON status of the exporter itself

mod handlers;
mod types;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;

use handlers::{metrics_handler, status_handler, vlans_handler};
pub use handlers::render_exposition;
pub use types::{AppState, StatusResponse};

/// Builds the router without binding it
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/allVlan", get(vlans_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Binds `addr` and serves until the server stops
pub async fn start_status_server(addr: SocketAddr, state: AppState) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP server to {}: {}", addr, e))?;

    log::info!("Exporter listening on http://{}/", addr);
    log::info!("  - Metrics: http://{}/metrics", addr);
    log::info!("  - VLANs: http://{}/allVlan", addr);
    log::info!("  - Status: http://{}/status", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::collector::MetricsCollector;
    use crate::error_handling::ExporterStats;
    use crate::ikuai::{IkuaiApi, MockIkuai};
    use crate::vlan_cache::VlanCache;

    #[tokio::test]
    async fn test_bind_failure_is_an_error() {
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = occupied.local_addr().unwrap();

        let api: Arc<dyn IkuaiApi> = Arc::new(MockIkuai::new());
        let cache = VlanCache::new();
        let stats = Arc::new(ExporterStats::new());
        let collector = MetricsCollector::new(api, cache.clone(), Arc::clone(&stats));

        let err = start_status_server(addr, AppState::new(collector, cache, stats))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to bind HTTP server"));
    }
}
