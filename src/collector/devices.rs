//! Per-device samples from the LAN device listing.

use std::collections::HashSet;

use super::descriptors::{push_traffic, Observation, Traffic, DEVICE_INFO};
use crate::config::{DERIVED_VLAN_PREFIX, DEVICE_ID_PREFIX};
use crate::error_handling::CollectError;
use crate::ikuai::LanDevice;
use crate::vlan_cache::VlanCache;

/// Keeps the first device seen for every IP, in upstream order.
///
/// Devices without an IP are dropped.
pub fn dedup_by_ip(devices: &[LanDevice]) -> Vec<&LanDevice> {
    let mut seen = HashSet::new();
    devices
        .iter()
        .filter(|device| !device.ip_addr.is_empty())
        .filter(|device| seen.insert(device.ip_addr.as_str()))
        .collect()
}

/// VLAN name a device's subnet is cached under: `10.0.0.5` becomes `adsl1000`.
///
/// Returns `None` for an address without a dot.
pub fn derived_vlan_name(ip: &str) -> Option<String> {
    let (prefix, _) = ip.rsplit_once('.')?;
    let digits: String = prefix.chars().filter(char::is_ascii_digit).collect();
    Some(format!("{}{}", DERIVED_VLAN_PREFIX, digits))
}

async fn account_label(cache: &VlanCache, ip: &str) -> String {
    match derived_vlan_name(ip) {
        Some(name) => cache.username_of(&name).await,
        None => String::new(),
    }
}

/// Appends info and traffic samples for every distinct device.
pub async fn observe(
    devices: &[LanDevice],
    cache: &VlanCache,
    out: &mut Vec<Observation>,
) -> Result<(), CollectError> {
    for device in dedup_by_ip(devices) {
        let id = format!("{}{}", DEVICE_ID_PREFIX, device.ip_addr);
        let adsl_no = account_label(cache, &device.ip_addr).await;

        out.push(DEVICE_INFO.observe(
            &[
                &id,
                &device.mac,
                &device.hostname,
                &device.ip_addr,
                &device.comment,
                &adsl_no,
            ],
            1.0,
        )?);
        push_traffic(
            out,
            &id,
            &adsl_no,
            Traffic {
                total_up: device.total_up,
                total_down: device.total_down,
                upload: device.upload,
                download: device.download,
                connections: device.connect_num,
            },
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ikuai::mock::{lan_device, vlan};

    #[test]
    fn test_derived_vlan_name() {
        assert_eq!(derived_vlan_name("10.0.0.5").as_deref(), Some("adsl1000"));
        assert_eq!(
            derived_vlan_name("192.168.12.40").as_deref(),
            Some("adsl19216812")
        );
        assert_eq!(derived_vlan_name("no-dots"), None);
        assert_eq!(derived_vlan_name(""), None);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let devices = vec![
            lan_device("10.0.0.5", "first"),
            lan_device("10.0.0.9", "other"),
            lan_device("10.0.0.5", "second"),
            lan_device("", "no-ip"),
        ];
        let unique = dedup_by_ip(&devices);
        let hosts: Vec<&str> = unique.iter().map(|d| d.hostname.as_str()).collect();
        assert_eq!(hosts, vec!["first", "other"]);
    }

    #[tokio::test]
    async fn test_device_samples_carry_account_label() {
        let cache = VlanCache::new();
        cache
            .write("adsl1000".to_string(), vlan("adsl1000", "acct-1"))
            .await;
        let devices = vec![
            lan_device("10.0.0.5", "first"),
            lan_device("10.0.0.5", "second"),
            lan_device("10.9.9.1", "unknown-subnet"),
        ];

        let mut out = Vec::new();
        observe(&devices, &cache, &mut out).await.unwrap();

        let info: Vec<&Observation> = out.iter().filter(|o| o.name == "ikuai_device_info").collect();
        assert_eq!(info.len(), 2);
        assert_eq!(info[0].label("id"), Some("device/10.0.0.5"));
        assert_eq!(info[0].label("hostname"), Some("first"));
        assert_eq!(info[0].label("adsl_no"), Some("acct-1"));
        assert_eq!(info[1].label("adsl_no"), Some(""));

        // info plus five traffic families per device
        assert_eq!(out.len(), 12);
        let conn = out
            .iter()
            .find(|o| o.name == "ikuai_network_conn_count")
            .unwrap();
        assert_eq!(conn.label("id"), Some("device/10.0.0.5"));
        assert_eq!(conn.label("adsl_no"), Some("acct-1"));
        assert_eq!(conn.value, 5.0);
    }
}
