//! Scripted in-memory appliance for tests.
//!
//! Each call serves a standing response that tests replace at will. Calls can
//! be made to fail a number of times, fail until recovered, or panic, which
//! is how the refresh loop and the collector are exercised under outages.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::types::{
    IfaceCheck, IfaceStream, InterfaceMonitor, LanDevice, SystemStats, VersionInfo, VlanPage,
    VlanRecord, WanInterface,
};
use super::IkuaiApi;
use crate::error_handling::{ApiCall, ApiError};

#[derive(Default)]
struct Fault {
    remaining: usize,
    always: bool,
    panic: bool,
}

#[derive(Default)]
struct State {
    system_stats: SystemStats,
    lan_devices: Vec<LanDevice>,
    interface_monitor: InterfaceMonitor,
    wans: BTreeMap<String, Vec<VlanRecord>>,
    reported_totals: HashMap<String, usize>,
    faults: HashMap<ApiCall, Fault>,
    attempts: HashMap<ApiCall, usize>,
    served_pages: Vec<(String, usize)>,
}

/// In-memory [`IkuaiApi`] implementation.
#[derive(Default)]
pub struct MockIkuai {
    state: Mutex<State>,
}

impl MockIkuai {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_stats(self, stats: SystemStats) -> Self {
        self.set_system_stats(stats);
        self
    }

    pub fn with_lan_devices(self, devices: Vec<LanDevice>) -> Self {
        self.set_lan_devices(devices);
        self
    }

    pub fn with_interface_monitor(self, monitor: InterfaceMonitor) -> Self {
        self.set_interface_monitor(monitor);
        self
    }

    /// Adds a WAN interface hosting `records`.
    pub fn with_wan(self, wan: &str, records: Vec<VlanRecord>) -> Self {
        self.set_wan(wan, records);
        self
    }

    pub fn set_system_stats(&self, stats: SystemStats) {
        self.lock().system_stats = stats;
    }

    pub fn set_lan_devices(&self, devices: Vec<LanDevice>) {
        self.lock().lan_devices = devices;
    }

    pub fn set_interface_monitor(&self, monitor: InterfaceMonitor) {
        self.lock().interface_monitor = monitor;
    }

    pub fn set_wan(&self, wan: &str, records: Vec<VlanRecord>) {
        self.lock().wans.insert(wan.to_string(), records);
    }

    /// Overrides the total the appliance reports for `wan`.
    pub fn set_reported_total(&self, wan: &str, total: usize) {
        self.lock().reported_totals.insert(wan.to_string(), total);
    }

    /// Makes the next `times` attempts of `call` fail.
    pub fn fail_times(&self, call: ApiCall, times: usize) {
        self.lock().faults.entry(call).or_default().remaining = times;
    }

    /// Makes every attempt of `call` fail until [`MockIkuai::recover`].
    pub fn fail_always(&self, call: ApiCall) {
        self.lock().faults.entry(call).or_default().always = true;
    }

    /// Makes every attempt of `call` panic until [`MockIkuai::recover`].
    pub fn panic_on(&self, call: ApiCall) {
        self.lock().faults.entry(call).or_default().panic = true;
    }

    /// Clears every fault injected for `call`.
    pub fn recover(&self, call: ApiCall) {
        self.lock().faults.remove(&call);
    }

    /// Number of attempts of `call`, failed ones included.
    pub fn attempts(&self, call: ApiCall) -> usize {
        self.lock().attempts.get(&call).copied().unwrap_or(0)
    }

    /// `(wan, offset)` of every VLAN page served successfully, in order.
    pub fn served_pages(&self) -> Vec<(String, usize)> {
        self.lock().served_pages.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Counts the attempt and applies any fault injected for `call`.
    fn enter(&self, call: ApiCall) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.lock();
        *state.attempts.entry(call).or_insert(0) += 1;

        let mut should_panic = false;
        let mut should_fail = false;
        if let Some(fault) = state.faults.get_mut(&call) {
            if fault.panic {
                should_panic = true;
            } else if fault.always {
                should_fail = true;
            } else if fault.remaining > 0 {
                fault.remaining -= 1;
                should_fail = true;
            }
        }

        if should_panic {
            drop(state);
            panic!("injected panic in {}", call);
        }
        if should_fail {
            return Err(ApiError::Status {
                call,
                code: -1,
                message: "injected failure".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl IkuaiApi for MockIkuai {
    async fn fetch_system_stats(&self) -> Result<SystemStats, ApiError> {
        Ok(self.enter(ApiCall::SystemStats)?.system_stats.clone())
    }

    async fn fetch_lan_devices(&self) -> Result<Vec<LanDevice>, ApiError> {
        Ok(self.enter(ApiCall::LanDevices)?.lan_devices.clone())
    }

    async fn fetch_interface_monitor(&self) -> Result<InterfaceMonitor, ApiError> {
        Ok(self.enter(ApiCall::InterfaceMonitor)?.interface_monitor.clone())
    }

    async fn fetch_wan_list(&self) -> Result<Vec<WanInterface>, ApiError> {
        let state = self.enter(ApiCall::WanList)?;
        Ok(state
            .wans
            .keys()
            .map(|name| WanInterface {
                interface: name.clone(),
                comment: String::new(),
            })
            .collect())
    }

    async fn fetch_vlan_page(
        &self,
        wan: &str,
        offset: usize,
        page_size: usize,
    ) -> Result<VlanPage, ApiError> {
        let mut state = self.enter(ApiCall::VlanPage)?;
        let records = state.wans.get(wan).cloned().unwrap_or_default();
        let total = state
            .reported_totals
            .get(wan)
            .copied()
            .unwrap_or(records.len());
        let page: Vec<VlanRecord> = records.into_iter().skip(offset).take(page_size).collect();
        state.served_pages.push((wan.to_string(), offset));
        Ok(VlanPage {
            records: page,
            total,
        })
    }
}

/// Healthy system stats with two cores and one temperature reading.
pub fn sample_system_stats() -> SystemStats {
    SystemStats {
        verinfo: VersionInfo {
            version: "3.7.4".to_string(),
            arch: "x86".to_string(),
            verstring: "3.7.4 x64 Build202307041010".to_string(),
            modelname: String::new(),
        },
        cpu: vec!["12.50%".to_string(), "3%".to_string()],
        cputemp: vec![47.0],
        memory: super::types::Memory {
            total: 8_000_000,
            available: 3_000_000,
            free: 1_000_000,
            cached: 500_000,
            buffers: 100_000,
        },
        stream: super::types::Stream {
            connect_num: 1200,
            upload: 300,
            download: 900,
            total_up: 10_000,
            total_down: 50_000,
        },
        uptime: 86_400,
        online_user: super::types::OnlineUser { count: 42 },
    }
}

pub fn lan_device(ip: &str, hostname: &str) -> LanDevice {
    LanDevice {
        ip_addr: ip.to_string(),
        mac: format!("00:11:22:33:44:{:02x}", hostname.len()),
        hostname: hostname.to_string(),
        comment: String::new(),
        upload: 10,
        download: 20,
        total_up: 1000,
        total_down: 2000,
        connect_num: 5,
    }
}

pub fn iface_stream(interface: &str, connect_num: &str) -> IfaceStream {
    IfaceStream {
        interface: interface.to_string(),
        comment: String::new(),
        ip_addr: String::new(),
        connect_num: connect_num.to_string(),
        upload: 100,
        download: 200,
        total_up: 10_000,
        total_down: 20_000,
    }
}

pub fn iface_check(interface: &str, result: &str, updatetime: &str) -> IfaceCheck {
    IfaceCheck {
        interface: interface.to_string(),
        parent_interface: "wan1".to_string(),
        internet: "1".to_string(),
        result: result.to_string(),
        updatetime: updatetime.to_string(),
        ip_addr: String::new(),
        comment: String::new(),
    }
}

pub fn vlan(name: &str, username: &str) -> VlanRecord {
    VlanRecord {
        vlan_name: name.to_string(),
        username: username.to_string(),
        ..Default::default()
    }
}
