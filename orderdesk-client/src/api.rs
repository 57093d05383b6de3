//! Dashboard API surface
//!
//! The dashboard talks to the backend through [`OrdersApi`] so that the view
//! layer can be driven by a stub in tests and by [`crate::ApiClient`] in
//! production.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{OrderDetail, OrderStatus, OrderSummary, StatsSnapshot};

use crate::ClientResult;

/// Filter for the order list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Only orders in this status; `None` means every status
    pub status: Option<OrderStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl OrderQuery {
    /// No filtering
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: Option<OrderStatus>) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Restrict to orders created within `[from, to]` (inclusive, backend dates)
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Query-string parameters; absent filters are omitted entirely
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.code().to_string()));
        }
        if let Some(from) = self.date_from {
            params.push(("date_from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            params.push(("date_to", to.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

/// Backend operations used by the dashboard
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Recent orders, newest first, optionally filtered
    async fn list_orders(&self, query: &OrderQuery) -> ClientResult<Vec<OrderSummary>>;

    /// Dashboard summary counters
    async fn fetch_stats(&self) -> ClientResult<StatsSnapshot>;

    /// Full order including line items
    async fn fetch_order_detail(&self, order_id: i64) -> ClientResult<OrderDetail>;

    /// Move an order to `status`. Any non-2xx answer is an error.
    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()>;
}

/// Order list payload: either a bare array or a paginated envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrderListResponse {
    Bare(Vec<OrderSummary>),
    Paged { results: Vec<OrderSummary> },
}

impl OrderListResponse {
    pub(crate) fn into_orders(self) -> Vec<OrderSummary> {
        match self {
            Self::Bare(orders) | Self::Paged { results: orders } => orders,
        }
    }
}

/// PATCH body for a status change
#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// Response to a status change
#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub new_status: Option<OrderStatus>,
}

fn default_success() -> bool {
    true
}
