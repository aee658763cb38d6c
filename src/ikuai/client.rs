//! HTTP client for the appliance's JSON API.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use super::types::{
    ApiStatus, Envelope, InterfaceMonitor, LanDevice, LanDeviceData, SystemStats,
    SystemStatsData, VlanPage, VlanPageData, WanInterface, WanListData,
};
use super::IkuaiApi;
use crate::config::{CALL_PATH, LAN_DEVICE_LIMIT, LOGIN_PASS_SALT, LOGIN_PATH, LOGIN_SUCCESS_CODE};
use crate::error_handling::{ApiCall, ApiError, InitializationError};

/// Authenticated client for one appliance.
///
/// The session cookie lives in the underlying `reqwest` cookie store. The
/// first call logs in; a call rejected because the session expired logs in
/// again and is repeated once.
pub struct IkuaiClient {
    http: reqwest::Client,
    login_url: Url,
    call_url: Url,
    username: String,
    password: String,
    logged_in: AtomicBool,
}

impl IkuaiClient {
    /// Creates a client for the appliance at `base_url`.
    ///
    /// `http` must have its cookie store enabled, see
    /// [`crate::initialization::init_http_client`].
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, InitializationError> {
        let base = Url::parse(base_url)?;
        Ok(IkuaiClient {
            http,
            login_url: base.join(LOGIN_PATH)?,
            call_url: base.join(CALL_PATH)?,
            username: username.into(),
            password: password.into(),
            logged_in: AtomicBool::new(false),
        })
    }

    /// Logs in and stores the session cookie.
    pub async fn login(&self) -> Result<(), ApiError> {
        let body = login_body(&self.username, &self.password);
        log::debug!("Logging in to {} as {}", self.login_url, self.username);

        let status: ApiStatus = self
            .http
            .post(self.login_url.clone())
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ApiError::Transport {
                call: ApiCall::Login,
                source,
            })?
            .json()
            .await
            .map_err(|source| ApiError::Transport {
                call: ApiCall::Login,
                source,
            })?;

        if status.code != LOGIN_SUCCESS_CODE && !status.is_success() {
            self.logged_in.store(false, Ordering::SeqCst);
            return Err(ApiError::LoginRejected {
                code: status.code,
                message: status.message,
            });
        }

        self.logged_in.store(true, Ordering::SeqCst);
        log::info!("Logged in to iKuai at {}", self.login_url);
        Ok(())
    }

    async fn call<T>(&self, call: ApiCall, func_name: &str, param: Value) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        if !self.logged_in.load(Ordering::SeqCst) {
            self.login().await?;
        }

        match self.call_once(call, func_name, &param).await {
            Err(e) if e.is_session_expired() => {
                log::info!("iKuai session expired during {}, logging in again", call);
                self.logged_in.store(false, Ordering::SeqCst);
                self.login().await?;
                self.call_once(call, func_name, &param).await
            }
            other => other,
        }
    }

    async fn call_once<T>(&self, call: ApiCall, func_name: &str, param: &Value) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let body = json!({
            "func_name": func_name,
            "action": "show",
            "param": param,
        });
        log::debug!("iKuai call {} ({})", call, func_name);

        let text = self
            .http
            .post(self.call_url.clone())
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ApiError::Transport { call, source })?
            .text()
            .await
            .map_err(|source| ApiError::Transport { call, source })?;
        log::trace!("iKuai {} response: {}", call, text);

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| ApiError::Status {
                call,
                code: -1,
                message: format!("undecodable response: {}", e),
            })?;

        if !envelope.status.is_success() {
            return Err(ApiError::Status {
                call,
                code: envelope.status.code,
                message: envelope.status.message,
            });
        }

        Ok(envelope.data.unwrap_or_default())
    }
}

fn login_body(username: &str, password: &str) -> Value {
    let passwd = format!("{:x}", md5::compute(password.as_bytes()));
    let pass = STANDARD.encode(format!("{}{}", LOGIN_PASS_SALT, password));
    json!({
        "username": username,
        "passwd": passwd,
        "pass": pass,
        "remember_password": "",
    })
}

fn vlan_page_param(wan: &str, offset: usize, page_size: usize) -> Value {
    json!({
        "TYPE": "vlan_data,vlan_total",
        "interface": wan,
        "limit": format!("{},{}", offset, page_size),
    })
}

#[async_trait]
impl IkuaiApi for IkuaiClient {
    async fn fetch_system_stats(&self) -> Result<SystemStats, ApiError> {
        let data: SystemStatsData = self
            .call(
                ApiCall::SystemStats,
                "sysstat",
                json!({"TYPE": "verinfo,cpu,memory,stream,cputemp,online_user,uptime"}),
            )
            .await?;
        Ok(data.sysstat)
    }

    async fn fetch_lan_devices(&self) -> Result<Vec<LanDevice>, ApiError> {
        let data: LanDeviceData = self
            .call(
                ApiCall::LanDevices,
                "monitor_lanip",
                json!({
                    "TYPE": "data,total",
                    "ORDER_BY": "ip_addr_int",
                    "orderType": "IP",
                    "ORDER": "",
                    "limit": format!("0,{}", LAN_DEVICE_LIMIT),
                }),
            )
            .await?;
        Ok(data.data)
    }

    async fn fetch_interface_monitor(&self) -> Result<InterfaceMonitor, ApiError> {
        self.call(
            ApiCall::InterfaceMonitor,
            "monitor_iface",
            json!({"TYPE": "iface_check,iface_stream"}),
        )
        .await
    }

    async fn fetch_wan_list(&self) -> Result<Vec<WanInterface>, ApiError> {
        let data: WanListData = self
            .call(ApiCall::WanList, "wan", json!({"TYPE": "snapshoot"}))
            .await?;
        Ok(data.snapshoot_wan)
    }

    async fn fetch_vlan_page(
        &self,
        wan: &str,
        offset: usize,
        page_size: usize,
    ) -> Result<VlanPage, ApiError> {
        let data: VlanPageData = self
            .call(
                ApiCall::VlanPage,
                "wan",
                vlan_page_param(wan, offset, page_size),
            )
            .await?;
        Ok(data.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::net::SocketAddr;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, routing::post, Router};

    /// Local stand-in for the appliance: login always succeeds and calls are
    /// answered from a script, repeating the last entry once it runs out.
    #[derive(Default)]
    struct Appliance {
        logins: AtomicUsize,
        calls: AtomicUsize,
        replies: Mutex<VecDeque<&'static str>>,
    }

    async fn login_route(State(appliance): State<Arc<Appliance>>) -> &'static str {
        appliance.logins.fetch_add(1, Ordering::SeqCst);
        r#"{"Result":10000,"ErrMsg":"Success"}"#
    }

    async fn call_route(State(appliance): State<Arc<Appliance>>) -> &'static str {
        appliance.calls.fetch_add(1, Ordering::SeqCst);
        let mut replies = appliance.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().copied().unwrap_or("{}")
        }
    }

    async fn serve_appliance(replies: &[&'static str]) -> (Arc<Appliance>, SocketAddr) {
        let appliance = Arc::new(Appliance {
            replies: Mutex::new(replies.iter().copied().collect()),
            ..Appliance::default()
        });
        let router = Router::new()
            .route("/Action/login", post(login_route))
            .route("/Action/call", post(call_route))
            .with_state(Arc::clone(&appliance));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (appliance, addr)
    }

    fn client_for(addr: SocketAddr) -> IkuaiClient {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();
        IkuaiClient::new(http, &format!("http://{}", addr), "admin", "pw").unwrap()
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_api_error() {
        let (appliance, addr) = serve_appliance(&[r#"{"Result":30009,"ErrMsg":"x"}"#]).await;
        let client = client_for(addr);

        let result = client.fetch_wan_list().await;

        match result {
            Err(ApiError::Status {
                call,
                code,
                message,
            }) => {
                assert_eq!(call, ApiCall::WanList);
                assert_eq!(code, 30009);
                assert_eq!(message, "x");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
        // not a session error, so no second login and no retry
        assert_eq!(appliance.logins.load(Ordering::SeqCst), 1);
        assert_eq!(appliance.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_session_logs_in_again_once() {
        let (appliance, addr) = serve_appliance(&[
            r#"{"Result":10014,"ErrMsg":"no login authentication"}"#,
            r#"{"Result":30000,"ErrMsg":"Success","Data":{"snapshoot_wan":[{"interface":"wan1"}]}}"#,
        ])
        .await;
        let client = client_for(addr);

        let wans = client.fetch_wan_list().await.unwrap();

        assert_eq!(wans.len(), 1);
        assert_eq!(wans[0].interface, "wan1");
        // initial login plus exactly one re-login
        assert_eq!(appliance.logins.load(Ordering::SeqCst), 2);
        assert_eq!(appliance.calls.load(Ordering::SeqCst), 2);

        // the session is reused afterwards
        client.fetch_wan_list().await.unwrap();
        assert_eq!(appliance.logins.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_session_error_after_relogin_is_returned() {
        let (appliance, addr) =
            serve_appliance(&[r#"{"Result":10014,"ErrMsg":"no login authentication"}"#]).await;
        let client = client_for(addr);

        let result = client.fetch_interface_monitor().await;

        assert!(matches!(result, Err(ApiError::Status { code: 10014, .. })));
        assert_eq!(appliance.logins.load(Ordering::SeqCst), 2);
        assert_eq!(appliance.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_undecodable_response_is_an_api_error() {
        let (_appliance, addr) = serve_appliance(&["<html>busy</html>"]).await;
        let client = client_for(addr);

        let result = client.fetch_system_stats().await;
        assert!(matches!(result, Err(ApiError::Status { code: -1, .. })));
    }

    #[test]
    fn test_login_body_hashes_password() {
        let body = login_body("admin", "password");
        assert_eq!(body["username"], "admin");
        assert_eq!(body["passwd"], "5f4dcc3b5aa765d61d8327deb882cf99");
        // base64("salt_11password")
        assert_eq!(body["pass"], "c2FsdF8xMXBhc3N3b3Jk");
        assert_eq!(body["remember_password"], "");
    }

    #[test]
    fn test_vlan_page_param_limit() {
        let param = vlan_page_param("wan1", 200, 100);
        assert_eq!(param["interface"], "wan1");
        assert_eq!(param["limit"], "200,100");
        assert_eq!(param["TYPE"], "vlan_data,vlan_total");
    }

    #[test]
    fn test_client_urls() {
        let client = IkuaiClient::new(
            reqwest::Client::new(),
            "https://10.0.0.1:8443/",
            "admin",
            "pw",
        )
        .expect("valid url");
        assert_eq!(client.login_url.as_str(), "https://10.0.0.1:8443/Action/login");
        assert_eq!(client.call_url.as_str(), "https://10.0.0.1:8443/Action/call");
    }

    #[test]
    fn test_client_rejects_bad_url() {
        let result = IkuaiClient::new(reqwest::Client::new(), "::nope::", "admin", "pw");
        assert!(matches!(result, Err(InitializationError::UrlError(_))));
    }
}
