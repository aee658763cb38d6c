//! Prometheus metrics handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::super::types::AppState;
use crate::collector::{MetricDesc, Observation};

const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Prometheus-compatible metrics endpoint; every request runs a fresh scrape
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let observations = state.collector.collect().await;
    let body = render_exposition(state.collector.describe(), &observations);

    (StatusCode::OK, [("content-type", CONTENT_TYPE)], body).into_response()
}

/// Renders samples in the Prometheus text format.
///
/// Families appear in descriptor order and families without samples are
/// left out entirely.
pub fn render_exposition(descriptors: &[MetricDesc], observations: &[Observation]) -> String {
    let mut out = String::new();

    for desc in descriptors {
        let samples: Vec<&Observation> = observations
            .iter()
            .filter(|o| o.name == desc.name)
            .collect();
        if samples.is_empty() {
            continue;
        }

        out.push_str(&format!("# HELP {} {}\n", desc.name, escape_help(desc.help)));
        out.push_str(&format!("# TYPE {} gauge\n", desc.name));
        for sample in samples {
            out.push_str(sample.name);
            if !sample.labels.is_empty() {
                let labels: Vec<String> = sample
                    .labels
                    .iter()
                    .map(|(name, value)| format!("{}=\"{}\"", name, escape_label_value(value)))
                    .collect();
                out.push('{');
                out.push_str(&labels.join(","));
                out.push('}');
            }
            out.push(' ');
            out.push_str(&format_value(sample.value));
            out.push('\n');
        }
    }

    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
