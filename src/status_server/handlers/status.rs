//! JSON status handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strum::IntoEnumIterator;

use super::super::types::{ApiFailureCounts, AppState, RefreshCounts, ScrapeCounts, StatusResponse};
use crate::error_handling::ApiCall;

/// JSON status endpoint describing the exporter itself
pub async fn status_handler(State(state): State<AppState>) -> Response {
    let stats = &state.stats;

    let last_success = stats
        .last_refresh()
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|at| at.to_rfc3339());

    let response = StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        vlan_cache_entries: state.cache.len().await,
        refresh: RefreshCounts {
            completed_passes: stats.refresh_passes(),
            failed_passes: stats.failed_refresh_passes(),
            last_success,
        },
        scrapes: ScrapeCounts {
            total: stats.scrapes(),
            failed: stats.failed_scrapes(),
        },
        api_failures: ApiFailureCounts {
            total: stats.total_api_failures(),
            by_call: ApiCall::iter()
                .map(|call| (call.as_str(), stats.api_failure_count(call)))
                .collect(),
        },
    };

    let json = match serde_json::to_string_pretty(&response) {
        Ok(json) => json,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize status: {}", e),
            )
                .into_response();
        }
    };

    (StatusCode::OK, [("content-type", "application/json")], json).into_response()
}
