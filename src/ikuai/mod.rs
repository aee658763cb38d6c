//! iKuai management API.
//!
//! [`IkuaiApi`] is the seam between the exporter core and the appliance:
//! [`IkuaiClient`] talks to a real router over HTTP, `mock::MockIkuai`
//! serves scripted data to tests and is only built for tests or with the
//! `test-util` feature.

mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
mod types;

use async_trait::async_trait;

use crate::error_handling::ApiError;

pub use client::IkuaiClient;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockIkuai;
pub use types::{
    ApiStatus, IfaceCheck, IfaceStream, InterfaceMonitor, LanDevice, Memory, OnlineUser, Stream,
    SystemStats, VersionInfo, VlanPage, VlanRecord, WanInterface,
};

/// Calls the exporter makes against the appliance.
///
/// A transport failure and a non-success application status both come back
/// as `Err`; implementations never hand out data from a failed call.
#[async_trait]
pub trait IkuaiApi: Send + Sync {
    /// Host-level figures (version, CPU, memory, traffic, uptime, online users).
    async fn fetch_system_stats(&self) -> Result<SystemStats, ApiError>;

    /// LAN device listing, possibly with the same IP more than once.
    async fn fetch_lan_devices(&self) -> Result<Vec<LanDevice>, ApiError>;

    /// Interface traffic and health-check lists.
    async fn fetch_interface_monitor(&self) -> Result<InterfaceMonitor, ApiError>;

    /// WAN interfaces whose VLANs make up the inventory.
    async fn fetch_wan_list(&self) -> Result<Vec<WanInterface>, ApiError>;

    /// One page of VLANs hosted on `wan`, starting at `offset`.
    async fn fetch_vlan_page(
        &self,
        wan: &str,
        offset: usize,
        page_size: usize,
    ) -> Result<VlanPage, ApiError>;
}
