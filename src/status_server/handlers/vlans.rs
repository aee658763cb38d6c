//! VLAN inventory handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::super::types::AppState;

/// Current VLAN inventory as a JSON object keyed by VLAN name
pub async fn vlans_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.collector.snapshot().await;

    let json = match serde_json::to_string(&snapshot) {
        Ok(json) => json,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize VLAN inventory: {}", e),
            )
                .into_response();
        }
    };

    (StatusCode::OK, [("content-type", "application/json")], json).into_response()
}
