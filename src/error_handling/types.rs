//! Error type definitions.
//!
//! This module defines the error types used throughout the exporter and the
//! `ApiCall` enum naming every upstream call.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The appliance URL could not be joined with an API path.
    #[error("Invalid iKuai URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Upstream calls made to the appliance.
///
/// Used to label failures in logs and to key the per-call failure counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ApiCall {
    Login,
    SystemStats,
    LanDevices,
    InterfaceMonitor,
    WanList,
    VlanPage,
}

impl std::fmt::Display for ApiCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiCall::Login => "login",
            ApiCall::SystemStats => "system_stats",
            ApiCall::LanDevices => "lan_devices",
            ApiCall::InterfaceMonitor => "interface_monitor",
            ApiCall::WanList => "wan_list",
            ApiCall::VlanPage => "vlan_page",
        }
    }
}

/// Failure of a single upstream call.
///
/// A transport error and a non-success application status are handled the
/// same way by every caller; they stay distinct here for logging.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP request failed or its body could not be decoded.
    #[error("{call} request failed: {source}")]
    Transport {
        call: ApiCall,
        #[source]
        source: ReqwestError,
    },

    /// The appliance answered with something other than the success sentinel.
    #[error("{call} returned status {code}: {message}")]
    Status {
        call: ApiCall,
        code: i64,
        message: String,
    },

    /// The login request was answered but rejected.
    #[error("login rejected with code {code}: {message}")]
    LoginRejected { code: i64, message: String },
}

impl ApiError {
    /// The call that failed.
    pub fn call(&self) -> ApiCall {
        match self {
            ApiError::Transport { call, .. } | ApiError::Status { call, .. } => *call,
            ApiError::LoginRejected { .. } => ApiCall::Login,
        }
    }

    /// True when the appliance reports the session as missing or expired.
    pub fn is_session_expired(&self) -> bool {
        match self {
            ApiError::Status { message, .. } => {
                let message = message.to_lowercase();
                message.contains("login") || message.contains("session")
            }
            _ => false,
        }
    }
}

/// Failures that abort a whole scrape and turn it into a single down observation.
#[derive(Error, Debug)]
pub enum CollectError {
    /// The load-bearing system stats call failed.
    #[error("system stats unavailable: {0}")]
    SystemStats(#[source] ApiError),

    /// An observation was built with the wrong number of label values.
    #[error("metric {metric} expects {expected} label values, got {got}")]
    LabelMismatch {
        metric: &'static str,
        expected: usize,
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_api_call_names_are_unique() {
        let names: HashSet<&str> = ApiCall::iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), ApiCall::iter().count());
    }

    #[test]
    fn test_api_call_display_matches_as_str() {
        for call in ApiCall::iter() {
            assert_eq!(call.to_string(), call.as_str());
        }
    }

    #[test]
    fn test_status_error_reports_call() {
        let err = ApiError::Status {
            call: ApiCall::WanList,
            code: 30001,
            message: "boom".to_string(),
        };
        assert_eq!(err.call(), ApiCall::WanList);
        assert_eq!(err.to_string(), "wan_list returned status 30001: boom");
        assert!(!err.is_session_expired());
    }

    #[test]
    fn test_session_expiry_detection() {
        let err = ApiError::Status {
            call: ApiCall::SystemStats,
            code: 10014,
            message: "no login authentication".to_string(),
        };
        assert!(err.is_session_expired());

        let rejected = ApiError::LoginRejected {
            code: 10001,
            message: "bad password".to_string(),
        };
        assert_eq!(rejected.call(), ApiCall::Login);
        assert!(!rejected.is_session_expired());
    }

    #[test]
    fn test_collect_error_messages() {
        let err = CollectError::LabelMismatch {
            metric: "ikuai_up",
            expected: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "metric ikuai_up expects 2 label values, got 1"
        );

        let err = CollectError::SystemStats(ApiError::Status {
            call: ApiCall::SystemStats,
            code: 1,
            message: "down".to_string(),
        });
        assert!(err.to_string().starts_with("system stats unavailable"));
    }
}
