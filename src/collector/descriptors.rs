//! Metric descriptors and observations.
//!
//! Names and label sets are fixed; dashboards and alerts depend on them.

use crate::config::HOST_ID;
use crate::error_handling::CollectError;

/// Name, help text and label names of one gauge family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

/// One gauge sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub name: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Observation {
    /// Value of the label called `name`, if the observation has one.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, value)| value.as_str())
    }
}

impl MetricDesc {
    /// Builds a sample, checking that one value is given per label name.
    pub fn observe(&self, values: &[&str], value: f64) -> Result<Observation, CollectError> {
        if values.len() != self.label_names.len() {
            return Err(CollectError::LabelMismatch {
                metric: self.name,
                expected: self.label_names.len(),
                got: values.len(),
            });
        }

        Ok(Observation {
            name: self.name,
            labels: self
                .label_names
                .iter()
                .zip(values)
                .map(|(name, value)| (*name, (*value).to_string()))
                .collect(),
            value,
        })
    }
}

const ID_ADSL: &[&str] = &["id", "adsl_no"];

pub const VERSION: MetricDesc = MetricDesc {
    name: "ikuai_version",
    help: "iKuai firmware version info",
    label_names: &["version", "arch", "verstring"],
};

pub const CPU_USAGE_RATIO: MetricDesc = MetricDesc {
    name: "ikuai_cpu_usage_ratio",
    help: "CPU usage ratio per core (0-1)",
    label_names: &["id"],
};

pub const CPU_TEMPERATURE: MetricDesc = MetricDesc {
    name: "ikuai_cpu_temperature",
    help: "CPU temperature in degrees Celsius",
    label_names: &[],
};

pub const MEMORY_SIZE: MetricDesc = MetricDesc {
    name: "ikuai_memory_size_bytes",
    help: "Total memory",
    label_names: &[],
};

pub const MEMORY_USAGE: MetricDesc = MetricDesc {
    name: "ikuai_memory_usage_bytes",
    help: "Memory in use (total minus available)",
    label_names: &[],
};

pub const MEMORY_CACHED: MetricDesc = MetricDesc {
    name: "ikuai_memory_cached_bytes",
    help: "Memory used by the page cache",
    label_names: &[],
};

pub const MEMORY_BUFFERS: MetricDesc = MetricDesc {
    name: "ikuai_memory_buffers_bytes",
    help: "Memory used by buffers",
    label_names: &[],
};

pub const DEVICE_INFO: MetricDesc = MetricDesc {
    name: "ikuai_device_info",
    help: "LAN device info",
    label_names: &["id", "mac", "hostname", "ip_addr", "comment", "adsl_no"],
};

pub const DEVICE_COUNT: MetricDesc = MetricDesc {
    name: "ikuai_device_count",
    help: "Number of online LAN devices",
    label_names: &[],
};

pub const IFACE_INFO: MetricDesc = MetricDesc {
    name: "ikuai_iface_info",
    help: "Interface info",
    label_names: &[
        "id",
        "interface",
        "comment",
        "adsl_no",
        "internet",
        "parent_interface",
        "ip_addr",
    ],
};

pub const UP: MetricDesc = MetricDesc {
    name: "ikuai_up",
    help: "Whether the host or interface is up",
    label_names: ID_ADSL,
};

pub const UPTIME: MetricDesc = MetricDesc {
    name: "ikuai_uptime",
    help: "Seconds since the host booted or the interface came up",
    label_names: ID_ADSL,
};

pub const SEND_BYTES: MetricDesc = MetricDesc {
    name: "ikuai_network_send_bytes",
    help: "Total bytes sent",
    label_names: ID_ADSL,
};

pub const RECV_BYTES: MetricDesc = MetricDesc {
    name: "ikuai_network_recv_bytes",
    help: "Total bytes received",
    label_names: ID_ADSL,
};

pub const SEND_RATE: MetricDesc = MetricDesc {
    name: "ikuai_network_send_kbytes_per_second",
    help: "Current send rate",
    label_names: ID_ADSL,
};

pub const RECV_RATE: MetricDesc = MetricDesc {
    name: "ikuai_network_recv_kbytes_per_second",
    help: "Current receive rate",
    label_names: ID_ADSL,
};

pub const CONN_COUNT: MetricDesc = MetricDesc {
    name: "ikuai_network_conn_count",
    help: "Open connection count",
    label_names: ID_ADSL,
};

/// Every family the collector can emit, in exposition order.
pub const DESCRIPTORS: &[MetricDesc] = &[
    VERSION,
    CPU_USAGE_RATIO,
    CPU_TEMPERATURE,
    MEMORY_SIZE,
    MEMORY_USAGE,
    MEMORY_CACHED,
    MEMORY_BUFFERS,
    DEVICE_INFO,
    DEVICE_COUNT,
    IFACE_INFO,
    UP,
    UPTIME,
    SEND_BYTES,
    RECV_BYTES,
    SEND_RATE,
    RECV_RATE,
    CONN_COUNT,
];

/// The lone sample of a scrape that could not reach the appliance.
pub fn host_down() -> Observation {
    Observation {
        name: UP.name,
        labels: vec![("id", HOST_ID.to_string()), ("adsl_no", String::new())],
        value: 0.0,
    }
}

/// Appends the traffic and connection samples shared by hosts, devices and interfaces.
pub(crate) fn push_traffic(
    out: &mut Vec<Observation>,
    id: &str,
    adsl_no: &str,
    traffic: Traffic,
) -> Result<(), CollectError> {
    let labels = [id, adsl_no];
    out.push(SEND_BYTES.observe(&labels, traffic.total_up as f64)?);
    out.push(RECV_BYTES.observe(&labels, traffic.total_down as f64)?);
    out.push(SEND_RATE.observe(&labels, traffic.upload as f64)?);
    out.push(RECV_RATE.observe(&labels, traffic.download as f64)?);
    out.push(CONN_COUNT.observe(&labels, traffic.connections as f64)?);
    Ok(())
}

/// Traffic figures in the shape every section reports them.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Traffic {
    pub total_up: i64,
    pub total_down: i64,
    pub upload: i64,
    pub download: i64,
    pub connections: i64,
}
