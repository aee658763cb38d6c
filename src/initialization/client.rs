//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::ikuai::IkuaiClient;

/// Initializes the HTTP client used to talk to the appliance.
///
/// Creates a `reqwest::Client` configured with:
/// - A cookie store, which carries the login session
/// - Timeout from the config
/// - Certificate verification disabled when `insecure_skip_verify` is set,
///   since appliances usually serve a self-signed certificate
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_http_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    if config.insecure_skip_verify {
        log::debug!("TLS certificate verification disabled for {}", config.ikuai_url);
    }

    ClientBuilder::new()
        .cookie_store(true)
        .timeout(config.timeout())
        .danger_accept_invalid_certs(config.insecure_skip_verify)
        .build()
}

/// Initializes the iKuai API client for the configured appliance.
///
/// No request is made here; the client logs in on its first call.
pub fn init_ikuai_client(config: &Config) -> Result<Arc<IkuaiClient>, InitializationError> {
    let http = init_http_client(config)?;
    let client = IkuaiClient::new(
        http,
        &config.ikuai_url,
        config.ikuai_username.clone(),
        config.ikuai_password.clone(),
    )?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_http_client() {
        let config = Config::default();
        assert!(init_http_client(&config).is_ok());

        let config = Config {
            insecure_skip_verify: false,
            ..Default::default()
        };
        assert!(init_http_client(&config).is_ok());
    }

    #[test]
    fn test_init_ikuai_client_rejects_bad_url() {
        let config = Config {
            ikuai_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            init_ikuai_client(&config),
            Err(InitializationError::UrlError(_))
        ));
    }

    #[test]
    fn test_init_ikuai_client_default_url() {
        assert!(init_ikuai_client(&Config::default()).is_ok());
    }
}
