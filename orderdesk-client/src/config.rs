//! Client configuration
//!
//! # 环境变量
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | ORDERDESK_API_URL | http://localhost:8000/api/v1 | REST API base URL |
//! | ORDERDESK_WS_URL | derived from the API URL (`ws://localhost:8000/ws/orders/`) | push channel |
//! | ORDERDESK_ADMIN_URL | derived from the API URL (`http://localhost:8000/admin/`) | admin panel |
//! | ORDERDESK_REQUEST_TIMEOUT_SECS | 15 | per-request timeout |

use crate::{ApiClient, ClientResult, WsConnector};
use reqwest::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// Path of the order push channel on the backend host
pub const WS_ORDERS_PATH: &str = "/ws/orders/";
/// Path of the admin panel on the backend host
pub const ADMIN_PATH: &str = "/admin/";

/// Client configuration for connecting to the ordering backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST API base URL (e.g., "http://localhost:8000/api/v1")
    pub api_url: String,

    /// WebSocket URL of the order push channel
    pub ws_url: String,

    /// Admin panel URL (menu editing, cancellations)
    pub admin_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a configuration for the given API base URL.
    ///
    /// The push channel and admin URLs are derived from the API host.
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            ws_url: derive_ws_url(&api_url),
            admin_url: derive_admin_url(&api_url),
            api_url,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(get("ORDERDESK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()));
        if let Some(ws_url) = get("ORDERDESK_WS_URL") {
            config.ws_url = ws_url;
        }
        if let Some(admin_url) = get("ORDERDESK_ADMIN_URL") {
            config.admin_url = admin_url;
        }
        if let Some(timeout) = get("ORDERDESK_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.timeout = timeout;
        }
        config
    }

    /// Set the push channel URL
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    /// Set the admin panel URL
    pub fn with_admin_url(mut self, url: impl Into<String>) -> Self {
        self.admin_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<ApiClient> {
        ApiClient::new(self)
    }

    /// Create a push channel connector from this configuration
    pub fn feed_connector(&self) -> WsConnector {
        WsConnector::new(self.ws_url.clone())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Swap the scheme to ws/wss and point at the orders channel on the same host
fn derive_ws_url(api_url: &str) -> String {
    match Url::parse(api_url) {
        Ok(mut url) => {
            let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
            // http(s) → ws(s) is always an allowed scheme change
            let _ = url.set_scheme(scheme);
            url.set_path(WS_ORDERS_PATH);
            url.set_query(None);
            url.to_string()
        }
        Err(_) => {
            let ws = api_url
                .replace("https://", "wss://")
                .replace("http://", "ws://");
            format!("{}{WS_ORDERS_PATH}", ws.trim_end_matches('/'))
        }
    }
}

fn derive_admin_url(api_url: &str) -> String {
    match Url::parse(api_url) {
        Ok(mut url) => {
            url.set_path(ADMIN_PATH);
            url.set_query(None);
            url.to_string()
        }
        Err(_) => format!("{}{ADMIN_PATH}", api_url.trim_end_matches('/')),
    }
}
