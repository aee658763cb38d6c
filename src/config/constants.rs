//! Configuration constants.
//!
//! This module defines the constants shared by the upstream client, the VLAN
//! refresh loop and the metrics collector.

use std::time::Duration;

// Upstream API
/// Application-level status every successful upstream response carries in `ErrMsg`
pub const SUCCESS_SENTINEL: &str = "Success";
/// Login result code reported by the appliance on a successful login
pub const LOGIN_SUCCESS_CODE: i64 = 10000;
/// Salt prepended to the password before base64 encoding it for the login request
pub const LOGIN_PASS_SALT: &str = "salt_11";
/// Path of the login endpoint
pub const LOGIN_PATH: &str = "/Action/login";
/// Path of the generic call endpoint
pub const CALL_PATH: &str = "/Action/call";
/// Maximum number of LAN devices requested in one listing
pub const LAN_DEVICE_LIMIT: usize = 1000;

// VLAN refresh
/// Number of VLAN records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Upper bound accepted for `--page-size`
pub const MAX_PAGE_SIZE: usize = 1000;
/// Pause between two refresh passes, and after a failed pass
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
/// Delay before the first background pass, so the startup warm-up finishes first
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 60;

// Page retry strategy (`tokio_retry::strategy::ExponentialBackoff`)
/// Base of the exponential series; each retry doubles the delay
pub const PAGE_RETRY_BASE: u64 = 2;
/// Multiplier applied to the series so the first retry waits 500ms
pub const PAGE_RETRY_FACTOR: u64 = 250;
/// Maximum delay between two attempts at the same page
pub const PAGE_RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

// Metric label conventions
/// `id` label value of appliance-wide observations
pub const HOST_ID: &str = "host";
/// Prefix of the `id` label of per-device observations
pub const DEVICE_ID_PREFIX: &str = "device/";
/// Prefix of the `id` label of per-interface observations
pub const IFACE_ID_PREFIX: &str = "iface/";
/// Prefix of the VLAN name derived from a device's subnet
pub const DERIVED_VLAN_PREFIX: &str = "adsl";
/// Health-check result reported for a live interface
pub const IFACE_CHECK_SUCCESS: &str = "success";

// HTTP
/// Per-request timeout of the upstream client
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default listen address of the exporter
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9090";
/// Default appliance URL
pub const DEFAULT_IKUAI_URL: &str = "http://192.168.1.1";
