//! HTTP endpoints served through the router, without binding a socket.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use helpers::{healthy_appliance, Harness};
use ikuai_exporter::refresh::load_all;
use ikuai_exporter::status_server::{router, AppState};
use ikuai_exporter::ApiCall;

fn app(h: &Harness) -> axum::Router {
    router(AppState::new(
        h.collector.clone(),
        h.cache.clone(),
        h.stats.clone(),
    ))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_metrics_endpoint_renders_exposition() {
    let h = Harness::new(healthy_appliance());
    load_all(h.api.as_ref(), &h.cache, &h.stats, 100)
        .await
        .unwrap();

    let (status, content_type, body) = get(app(&h), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert!(body.contains("# TYPE ikuai_up gauge"));
    assert!(body.contains("ikuai_up{id=\"host\",adsl_no=\"\"} 1\n"));
    assert!(body.contains("# HELP ikuai_device_info "));
    assert!(body.contains("ikuai_iface_info{id=\"iface/adsl1\",interface=\"adsl1\""));
    assert!(body.contains("ikuai_cpu_usage_ratio{id=\"core/0\"} 0.125\n"));
    // Each family header appears once
    assert_eq!(body.matches("# TYPE ikuai_network_conn_count gauge").count(), 1);
}

#[tokio::test]
async fn test_metrics_endpoint_when_appliance_is_down() {
    let h = Harness::new(healthy_appliance());
    h.mock.fail_always(ApiCall::SystemStats);

    let (status, _, body) = get(app(&h), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    let samples: Vec<&str> = body.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(samples, vec!["ikuai_up{id=\"host\",adsl_no=\"\"} 0"]);
}

#[tokio::test]
async fn test_all_vlan_endpoint_serves_the_inventory() {
    let h = Harness::new(healthy_appliance());
    load_all(h.api.as_ref(), &h.cache, &h.stats, 100)
        .await
        .unwrap();

    let (status, content_type, body) = get(app(&h), "/allVlan").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let vlans = json.as_object().unwrap();
    let names: Vec<&String> = vlans.keys().collect();
    assert_eq!(names, vec!["adsl1", "adsl1000", "adsl2"]);
    assert_eq!(json["adsl2"]["username"], "acct-adsl2");
    assert_eq!(json["adsl2"]["interface"], "wan2");
}

#[tokio::test]
async fn test_all_vlan_endpoint_before_first_load() {
    let h = Harness::new(healthy_appliance());
    let (status, _, body) = get(app(&h), "/allVlan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn test_status_endpoint_reports_counters() {
    let h = Harness::new(healthy_appliance());
    h.mock.fail_times(ApiCall::LanDevices, 1);
    h.collector.collect().await;

    let (status, _, body) = get(app(&h), "/status").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["vlan_cache_entries"], 0);
    assert_eq!(json["scrapes"]["total"], 1);
    assert_eq!(json["scrapes"]["failed"], 0);
    assert_eq!(json["api_failures"]["total"], 1);
    assert_eq!(json["api_failures"]["by_call"]["lan_devices"], 1);
    assert_eq!(json["refresh"]["completed_passes"], 0);
    assert!(json["refresh"].get("last_success").is_none());
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let h = Harness::new(healthy_appliance());
    let (status, _, _) = get(app(&h), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
