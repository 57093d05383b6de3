//! Console configuration
//!
//! Every flag falls back to an environment variable (a `.env` file in the
//! working directory is loaded first), then to the built-in default.

use clap::Parser;
use orderdesk_client::{ClientConfig, ReconnectPolicy};
use orderdesk_client::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use shared::Locale;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "orderdesk", version, about = "Live order dashboard for the food ordering backend")]
pub struct Cli {
    /// REST API base URL
    #[arg(long, env = "ORDERDESK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Order push channel URL (derived from the API URL when omitted)
    #[arg(long, env = "ORDERDESK_WS_URL")]
    pub ws_url: Option<String>,

    /// Admin panel URL shown in the header (derived from the API URL when omitted)
    #[arg(long, env = "ORDERDESK_ADMIN_URL")]
    pub admin_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "ORDERDESK_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Display locale (id-ID or en-US)
    #[arg(long, env = "ORDERDESK_LOCALE", default_value = "id-ID")]
    pub locale: String,

    /// Directory for rotating log files
    #[arg(long, env = "ORDERDESK_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "ORDERDESK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Write JSON log lines
    #[arg(long, env = "ORDERDESK_LOG_JSON")]
    pub log_json: bool,

    /// First reconnect delay in seconds
    #[arg(long, env = "ORDERDESK_RECONNECT_DELAY_SECS", default_value_t = 3)]
    pub reconnect_delay: u64,

    /// Longest reconnect delay in seconds
    #[arg(long, env = "ORDERDESK_RECONNECT_MAX_DELAY_SECS", default_value_t = 60)]
    pub reconnect_max_delay: u64,

    /// Give up after this many consecutive failed connects (0 = never)
    #[arg(long, env = "ORDERDESK_RECONNECT_MAX_FAILURES", default_value_t = 20)]
    pub reconnect_max_failures: u32,

    /// Reconnect at a constant interval without backoff or jitter
    #[arg(long, env = "ORDERDESK_RECONNECT_FIXED")]
    pub reconnect_fixed: bool,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.api_url.clone()).with_timeout(self.timeout);
        if let Some(ws_url) = self.ws_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config = config.with_ws_url(ws_url);
        }
        if let Some(admin_url) = self.admin_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config = config.with_admin_url(admin_url);
        }
        config
    }

    /// Display locale; unknown tags fall back to id-ID
    pub fn locale(&self) -> Locale {
        Locale::from_tag(&self.locale).unwrap_or_else(|| {
            tracing::warn!(tag = %self.locale, "Unknown locale, using id-ID");
            Locale::id_id()
        })
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        let initial = Duration::from_secs(self.reconnect_delay.max(1));
        if self.reconnect_fixed {
            return ReconnectPolicy::fixed(initial);
        }
        ReconnectPolicy::default()
            .with_initial_delay(initial)
            .with_max_delay(Duration::from_secs(self.reconnect_max_delay))
            .with_max_consecutive_failures(self.reconnect_max_failures)
    }
}
