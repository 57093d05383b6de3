//! Dashboard view state

use orderdesk_client::ConnectionState;
use shared::{OrderDetail, OrderStatus, OrderSummary, StatsSnapshot};

use crate::sequence::Versioned;

/// Load status of one resource
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last request failed; previous data is still shown
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Order detail popup
#[derive(Debug, Clone, PartialEq)]
pub struct DetailModal {
    pub order_id: i64,
    /// Ticket of the detail request this modal is waiting for
    pub request_seq: u64,
    /// List row shown until the detail arrives
    pub placeholder: Option<OrderSummary>,
    pub detail: Option<OrderDetail>,
    pub load: LoadState,
    /// A status change is in flight
    pub advancing: bool,
}

impl DetailModal {
    pub fn new(order_id: i64, request_seq: u64, placeholder: Option<OrderSummary>) -> Self {
        Self {
            order_id,
            request_seq,
            placeholder,
            detail: None,
            load: LoadState::Loading,
            advancing: false,
        }
    }

    pub fn status(&self) -> Option<OrderStatus> {
        self.detail
            .as_ref()
            .map(|d| d.status)
            .or_else(|| self.placeholder.as_ref().map(|p| p.status))
    }

    pub fn order_number(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .map(|d| d.order_number.as_str())
            .or_else(|| self.placeholder.as_ref().map(|p| p.order_number.as_str()))
    }

    pub fn patch_status(&mut self, status: OrderStatus) {
        if let Some(detail) = self.detail.as_mut() {
            detail.status = status;
            detail.status_display = None;
        }
        if let Some(placeholder) = self.placeholder.as_mut() {
            placeholder.status = status;
            placeholder.status_display = None;
        }
    }
}

/// Everything the console renders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    /// Active status filter; `None` shows every status
    pub filter: Option<OrderStatus>,
    pub orders: Versioned<Vec<OrderSummary>>,
    pub stats: Versioned<Option<StatsSnapshot>>,
    pub modal: Option<DetailModal>,
    pub connection: ConnectionState,
}

impl DashboardState {
    pub fn order(&self, order_id: i64) -> Option<&OrderSummary> {
        self.orders.value.iter().find(|o| o.id == order_id)
    }

    /// Status as currently displayed, preferring the open modal
    pub fn current_status(&self, order_id: i64) -> Option<OrderStatus> {
        self.modal
            .as_ref()
            .filter(|m| m.order_id == order_id)
            .and_then(DetailModal::status)
            .or_else(|| self.order(order_id).map(|o| o.status))
    }

    pub fn order_number(&self, order_id: i64) -> Option<String> {
        self.modal
            .as_ref()
            .filter(|m| m.order_id == order_id)
            .and_then(DetailModal::order_number)
            .or_else(|| self.order(order_id).map(|o| o.order_number.as_str()))
            .map(str::to_string)
    }

    /// Reflect an accepted status change locally until the refetch lands
    pub fn patch_order_status(&mut self, order_id: i64, status: OrderStatus) {
        if let Some(row) = self.orders.value.iter_mut().find(|o| o.id == order_id) {
            row.status = status;
            row.status_display = None;
        }
        if let Some(modal) = self.modal.as_mut().filter(|m| m.order_id == order_id) {
            modal.patch_status(status);
        }
    }

    /// First failure message across resources, for the retry banner
    pub fn error_banner(&self) -> Option<&str> {
        self.orders
            .load
            .error()
            .or_else(|| self.stats.load.error())
    }
}
