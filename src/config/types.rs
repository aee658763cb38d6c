//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line and environment
//! parsing, plus the validation applied before the exporter starts.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_IKUAI_URL, DEFAULT_LISTEN_ADDR, DEFAULT_PAGE_SIZE, DEFAULT_REFRESH_INTERVAL_SECS,
    DEFAULT_STARTUP_DELAY_SECS, DEFAULT_TIMEOUT_SECS, MAX_PAGE_SIZE,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Reasons a [`Config`] is rejected before startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The appliance URL does not parse.
    #[error("Invalid iKuai URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The appliance URL uses something other than http or https.
    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// No username was given.
    #[error("iKuai username must not be empty")]
    EmptyUsername,

    /// Page size outside `1..=MAX_PAGE_SIZE`.
    #[error("Page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: usize, max: usize },

    /// A duration that must be positive was zero.
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// The listen address does not parse as `ip:port`.
    #[error("Invalid listen address '{0}'")]
    InvalidListenAddr(String),
}

/// Exporter configuration.
///
/// Every option can be given as a flag or through the environment variable
/// named next to it, which is how container deployments usually set it.
///
/// # Examples
///
/// ```bash
/// # Credentials from the environment
/// IK_URL=https://10.0.0.1 IK_PWD=secret ikuai_exporter
///
/// # Everything on the command line
/// ikuai_exporter --ikuai-url http://10.0.0.1 --ikuai-password secret --listen-addr 127.0.0.1:9100
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ikuai_exporter",
    about = "Exports iKuai router metrics in Prometheus format."
)]
pub struct Config {
    /// iKuai management URL
    #[arg(long, env = "IK_URL", default_value = DEFAULT_IKUAI_URL)]
    pub ikuai_url: String,

    /// iKuai username
    #[arg(long, env = "IK_USER", default_value = "admin")]
    pub ikuai_username: String,

    /// iKuai password
    #[arg(long, env = "IK_PWD", hide_env_values = true)]
    pub ikuai_password: String,

    /// Log every upstream call (forces debug log level)
    #[arg(long, env = "DEBUG")]
    pub debug: bool,

    /// Accept invalid TLS certificates from the appliance
    #[arg(long, env = "SKIP_TLS_VERIFY", default_value_t = true, action = ArgAction::Set)]
    pub insecure_skip_verify: bool,

    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Per-request timeout for upstream calls, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Pause between VLAN refresh passes, in seconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL_SECS)]
    pub refresh_interval_secs: u64,

    /// Delay before the first background refresh pass, in seconds
    #[arg(long, default_value_t = DEFAULT_STARTUP_DELAY_SECS)]
    pub startup_delay_secs: u64,

    /// Number of VLAN records requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ikuai_url: DEFAULT_IKUAI_URL.to_string(),
            ikuai_username: "admin".to_string(),
            ikuai_password: String::new(),
            debug: false,
            insecure_skip_verify: true,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            startup_delay_secs: DEFAULT_STARTUP_DELAY_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the options that would otherwise only fail once the exporter is running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.ikuai_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.ikuai_url.clone(),
            source,
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        if self.ikuai_username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize {
                got: self.page_size,
                max: MAX_PAGE_SIZE,
            });
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroDuration("timeout_seconds"));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("refresh_interval_secs"));
        }

        self.socket_addr()?;
        Ok(())
    }

    /// The listen address as a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(self.listen_addr.clone()))
    }

    /// Log level after applying `--debug`.
    pub fn effective_log_level(&self) -> LogLevel {
        if self.debug && self.log_level != LogLevel::Trace {
            LogLevel::Debug
        } else {
            self.log_level.clone()
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
