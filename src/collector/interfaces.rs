//! Per-interface samples from the interface monitor.

use super::descriptors::{push_traffic, Observation, Traffic, IFACE_INFO, UP, UPTIME};
use crate::config::{IFACE_CHECK_SUCCESS, IFACE_ID_PREFIX};
use crate::error_handling::CollectError;
use crate::ikuai::{IfaceCheck, InterfaceMonitor};
use crate::vlan_cache::VlanCache;

/// Health of one interface after joining its check entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfaceStatus {
    pub internet: String,
    pub parent_interface: String,
    pub up: bool,
    /// Seconds since the last state change; 0 while down
    pub uptime: i64,
}

impl Default for IfaceStatus {
    fn default() -> Self {
        IfaceStatus {
            internet: String::new(),
            parent_interface: String::new(),
            up: true,
            uptime: 0,
        }
    }
}

/// Joins `interface` against the health checks.
///
/// Every matching check is considered: a single non-success entry marks the
/// interface down, and the last match supplies the labels and the state
/// change time. Without a match the interface is reported up with no uptime.
pub fn iface_status(checks: &[IfaceCheck], interface: &str, now: i64) -> IfaceStatus {
    let mut matching = checks.iter().filter(|c| c.interface == interface);
    let Some(first) = matching.next() else {
        return IfaceStatus::default();
    };

    let mut up = first.result == IFACE_CHECK_SUCCESS;
    let mut last = first;
    for check in matching {
        up &= check.result == IFACE_CHECK_SUCCESS;
        last = check;
    }

    let uptime = if up {
        last.updatetime
            .trim()
            .parse::<i64>()
            .map(|changed_at| (now - changed_at).max(0))
            .unwrap_or(0)
    } else {
        0
    };

    IfaceStatus {
        internet: last.internet.clone(),
        parent_interface: last.parent_interface.clone(),
        up,
        uptime,
    }
}

/// Connection count sent as a string; anything unparsable counts as 0.
pub fn parse_conn_count(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// Appends info, liveness and traffic samples for every monitored interface.
pub async fn observe(
    monitor: &InterfaceMonitor,
    cache: &VlanCache,
    now: i64,
    out: &mut Vec<Observation>,
) -> Result<(), CollectError> {
    for stream in &monitor.iface_stream {
        let id = format!("{}{}", IFACE_ID_PREFIX, stream.interface);
        let status = iface_status(&monitor.iface_check, &stream.interface, now);
        let adsl_no = cache.username_of(&stream.interface).await;

        out.push(IFACE_INFO.observe(
            &[
                &id,
                &stream.interface,
                &stream.comment,
                &adsl_no,
                &status.internet,
                &status.parent_interface,
                &stream.ip_addr,
            ],
            1.0,
        )?);
        push_traffic(
            out,
            &id,
            &adsl_no,
            Traffic {
                total_up: stream.total_up,
                total_down: stream.total_down,
                upload: stream.upload,
                download: stream.download,
                connections: parse_conn_count(&stream.connect_num),
            },
        )?;
        out.push(UP.observe(&[&id, &adsl_no], if status.up { 1.0 } else { 0.0 })?);
        out.push(UPTIME.observe(&[&id, &adsl_no], status.uptime as f64)?);
    }
    Ok(())
}
