//! OrderDesk Client - data fetch layer and live-update channel
//!
//! Provides REST calls against the ordering backend's dashboard API and a
//! reconnecting WebSocket feed of order updates.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;

pub use api::{OrderQuery, OrdersApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use feed::{
    ConnectionState, FeedConnector, FeedEvent, FeedHandle, FeedSession, ReconnectPolicy,
    WsConnector,
};
pub use http::ApiClient;

// Re-export shared types for convenience
pub use shared::{OrderDetail, OrderStatus, OrderSummary, OrderUpdate, StatsSnapshot};
