//! Upstream response types.
//!
//! The appliance is inconsistent about sending numbers as JSON numbers or as
//! strings, and omits fields freely, so every field defaults and numeric fields
//! are decoded leniently.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::SUCCESS_SENTINEL;

/// Application-level status carried by every response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiStatus {
    #[serde(rename = "Result", default, deserialize_with = "lenient_i64")]
    pub code: i64,
    #[serde(rename = "ErrMsg", default, deserialize_with = "lenient_string")]
    pub message: String,
}

impl ApiStatus {
    pub fn is_success(&self) -> bool {
        self.message == SUCCESS_SENTINEL
    }
}

/// Response envelope of `/Action/call`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(rename = "Data", default)]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VersionInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub arch: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub verstring: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub modelname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Memory {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub available: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub free: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub cached: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub buffers: i64,
}

/// Aggregate traffic counters of the whole appliance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stream {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub connect_num: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub upload: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub download: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_up: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_down: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OnlineUser {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub count: i64,
}

/// Host-level figures returned by the `sysstat` call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SystemStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub verinfo: VersionInfo,
    /// Per-core usage as percentage strings such as `"12.5%"`
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpu: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cputemp: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: Memory,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stream: Stream,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub uptime: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub online_user: OnlineUser,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SystemStatsData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sysstat: SystemStats,
}

/// One row of the LAN device listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LanDevice {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ip_addr: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mac: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hostname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub upload: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub download: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_up: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_down: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub connect_num: i64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LanDeviceData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<LanDevice>,
}

/// Health-check entry of one interface.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IfaceCheck {
    #[serde(default, deserialize_with = "lenient_string")]
    pub interface: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub parent_interface: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub internet: String,
    /// `"success"` while the link is up
    #[serde(default, deserialize_with = "lenient_string")]
    pub result: String,
    /// Unix seconds of the last state change, as a decimal string
    #[serde(default, deserialize_with = "lenient_string")]
    pub updatetime: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ip_addr: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: String,
}

/// Traffic entry of one interface.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IfaceStream {
    #[serde(default, deserialize_with = "lenient_string")]
    pub interface: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ip_addr: String,
    /// Connection count, sent as a string
    #[serde(default, deserialize_with = "lenient_string")]
    pub connect_num: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub upload: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub download: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_up: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_down: i64,
}

/// The two parallel lists returned by the `monitor_iface` call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InterfaceMonitor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub iface_check: Vec<IfaceCheck>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub iface_stream: Vec<IfaceStream>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WanInterface {
    #[serde(default, deserialize_with = "lenient_string")]
    pub interface: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WanListData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub snapshoot_wan: Vec<WanInterface>,
}

/// Account metadata of one VLAN sub-interface, keyed by `vlan_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub vlan_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vlan_id: String,
    /// Account/owner label joined onto metrics as `adsl_no`
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    /// Parent WAN interface
    #[serde(default, deserialize_with = "lenient_string")]
    pub interface: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ip_addr: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mac: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub enabled: String,
}

/// One page of a WAN interface's VLAN list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VlanPage {
    pub records: Vec<VlanRecord>,
    /// Total number of VLANs the appliance reports for the interface
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VlanPageData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub vlan_data: Vec<VlanRecord>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub vlan_total: i64,
}

impl From<VlanPageData> for VlanPage {
    fn from(data: VlanPageData) -> Self {
        VlanPage {
            records: data.vlan_data,
            total: usize::try_from(data.vlan_total).unwrap_or(0),
        }
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Bool(b) => i64::from(b),
        _ => 0,
    })
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
