// Shared test helpers for building exporters around a scripted appliance.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Not every test file uses every helper

use std::sync::Arc;

use ikuai_exporter::ikuai::mock::{iface_check, iface_stream, lan_device, sample_system_stats, vlan};
use ikuai_exporter::ikuai::{InterfaceMonitor, MockIkuai};
use ikuai_exporter::{ExporterStats, IkuaiApi, MetricsCollector, Observation, VlanCache};

/// Everything a test needs to drive scrapes and refresh passes.
pub struct Harness {
    pub mock: Arc<MockIkuai>,
    pub api: Arc<dyn IkuaiApi>,
    pub cache: VlanCache,
    pub stats: Arc<ExporterStats>,
    pub collector: MetricsCollector,
}

impl Harness {
    pub fn new(mock: MockIkuai) -> Self {
        let mock = Arc::new(mock);
        let api: Arc<dyn IkuaiApi> = mock.clone();
        let cache = VlanCache::new();
        let stats = Arc::new(ExporterStats::new());
        let collector = MetricsCollector::new(Arc::clone(&api), cache.clone(), Arc::clone(&stats));
        Harness {
            mock,
            api,
            cache,
            stats,
            collector,
        }
    }
}

/// An appliance with one duplicated device, two interfaces and two WANs of VLANs.
///
/// `adsl1` came up an hour ago; `adsl2` is down.
pub fn healthy_appliance() -> MockIkuai {
    let now = chrono::Utc::now().timestamp();
    MockIkuai::new()
        .with_system_stats(sample_system_stats())
        .with_lan_devices(vec![
            lan_device("10.0.0.5", "laptop"),
            lan_device("10.0.0.5", "laptop-again"),
            lan_device("10.0.1.7", "phone"),
        ])
        .with_interface_monitor(InterfaceMonitor {
            iface_check: vec![
                iface_check("adsl1", "success", &(now - 3600).to_string()),
                iface_check("adsl2", "fail", &(now - 3600).to_string()),
            ],
            iface_stream: vec![iface_stream("adsl1", "12"), iface_stream("adsl2", "3")],
        })
        .with_wan(
            "wan1",
            vec![vlan("adsl1", "acct-adsl1"), vlan("adsl1000", "acct-subnet")],
        )
        .with_wan("wan2", vec![vlan("adsl2", "acct-adsl2")])
}

/// Samples named `name`.
pub fn samples<'a>(out: &'a [Observation], name: &str) -> Vec<&'a Observation> {
    out.iter().filter(|o| o.name == name).collect()
}

/// The one sample named `name` whose `id` label is `id`.
pub fn sample<'a>(out: &'a [Observation], name: &str, id: &str) -> Option<&'a Observation> {
    out.iter()
        .find(|o| o.name == name && o.label("id") == Some(id))
}
