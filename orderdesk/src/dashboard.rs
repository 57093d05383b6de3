//! Dashboard store
//!
//! Owns the view state and runs every backend interaction the console
//! triggers: list and stats loads, the detail popup, the forward status
//! action and reactions to live order updates.
//!
//! All fetches race the dashboard's shutdown token and are written back
//! through the sequence guard, so after [`Dashboard::shutdown`] nothing
//! touches the state and an older response never replaces a newer one.

use orderdesk_client::{ConnectionState, FeedEvent, OrderQuery, OrdersApi};
use parking_lot::RwLock;
use shared::OrderStatus;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::sequence::RequestSeq;
use crate::state::{DashboardState, DetailModal, LoadState};
use crate::toast::Toaster;

/// Result of [`Dashboard::advance_order`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Backend accepted the move to this status
    Advanced(OrderStatus),
    /// Completed or cancelled; nothing to do
    AlreadyFinal,
    /// Order is neither in the list nor in the open modal
    NotFound,
    /// A change for this order is already in flight
    Busy,
    /// Backend rejected the change or was unreachable
    Failed(String),
    /// Dashboard shut down before the answer arrived
    Cancelled,
}

struct Inner {
    api: Arc<dyn OrdersApi>,
    state: RwLock<DashboardState>,
    toaster: Toaster,
    orders_seq: RequestSeq,
    stats_seq: RequestSeq,
    detail_seq: RequestSeq,
    shutdown: CancellationToken,
}

/// Cloneable handle to the dashboard store
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn OrdersApi>, toaster: Toaster) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: RwLock::new(DashboardState::default()),
                toaster,
                orders_seq: RequestSeq::new(),
                stats_seq: RequestSeq::new(),
                detail_seq: RequestSeq::new(),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Copy of the current view state
    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.read().clone()
    }

    pub fn toaster(&self) -> &Toaster {
        &self.inner.toaster
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Initial load
    pub async fn start(&self) {
        tracing::info!("Dashboard starting");
        self.refresh_all().await;
    }

    /// Change the status filter and reload the list
    pub async fn set_filter(&self, filter: Option<OrderStatus>) {
        self.inner.state.write().filter = filter;
        tracing::debug!(filter = ?filter.map(OrderStatus::code), "Order filter changed");
        self.refresh_orders().await;
    }

    pub async fn refresh_orders(&self) {
        let (seq, query) = {
            let mut state = self.inner.state.write();
            state.orders.begin();
            (
                self.inner.orders_seq.issue(),
                OrderQuery::with_status(state.filter),
            )
        };

        let Some(result) = self.guarded(self.inner.api.list_orders(&query)).await else {
            return;
        };

        let mut state = self.inner.state.write();
        if self.is_shut_down() {
            return;
        }
        match result {
            Ok(orders) => {
                let count = orders.len();
                if state.orders.apply(seq, orders) {
                    tracing::debug!(seq, count, "Order list updated");
                } else {
                    tracing::debug!(seq, "Discarding stale order list");
                }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "Failed to load orders");
                state.orders.fail(seq, e.to_string());
            }
        }
    }

    pub async fn refresh_stats(&self) {
        let seq = {
            let mut state = self.inner.state.write();
            state.stats.begin();
            self.inner.stats_seq.issue()
        };

        let Some(result) = self.guarded(self.inner.api.fetch_stats()).await else {
            return;
        };

        let mut state = self.inner.state.write();
        if self.is_shut_down() {
            return;
        }
        match result {
            Ok(stats) => {
                if !state.stats.apply(seq, Some(stats)) {
                    tracing::debug!(seq, "Discarding stale stats");
                }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "Failed to load stats");
                state.stats.fail(seq, e.to_string());
            }
        }
    }

    /// Reload the list (active filter) and the stats concurrently
    pub async fn refresh_all(&self) {
        tokio::join!(self.refresh_orders(), self.refresh_stats());
    }

    /// Open the detail popup; the list row is shown until the detail arrives
    pub async fn open_order(&self, order_id: i64) {
        let seq = self.inner.detail_seq.issue();
        {
            let mut state = self.inner.state.write();
            let placeholder = state.order(order_id).cloned();
            state.modal = Some(DetailModal::new(order_id, seq, placeholder));
        }

        let Some(result) = self
            .guarded(self.inner.api.fetch_order_detail(order_id))
            .await
        else {
            return;
        };

        let mut state = self.inner.state.write();
        if self.is_shut_down() {
            return;
        }
        let Some(modal) = state
            .modal
            .as_mut()
            .filter(|m| m.order_id == order_id && m.request_seq == seq)
        else {
            tracing::debug!(order_id, seq, "Discarding detail for a closed or replaced popup");
            return;
        };
        match result {
            Ok(detail) => {
                modal.detail = Some(detail);
                modal.load = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(order_id, error = %e, "Failed to load order detail");
                modal.load = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn close_order(&self) {
        self.inner.state.write().modal = None;
    }

    /// Move an order one step forward in the workflow
    pub async fn advance_order(&self, order_id: i64) -> AdvanceOutcome {
        let (current, number) = {
            let mut state = self.inner.state.write();
            let Some(current) = state.current_status(order_id) else {
                tracing::warn!(order_id, "Advance requested for unknown order");
                return AdvanceOutcome::NotFound;
            };
            let number = state
                .order_number(order_id)
                .unwrap_or_else(|| order_id.to_string());
            if let Some(modal) = state.modal.as_mut().filter(|m| m.order_id == order_id) {
                if modal.advancing {
                    return AdvanceOutcome::Busy;
                }
                modal.advancing = current.next().is_some();
            }
            (current, number)
        };

        let Some(next) = current.next() else {
            self.inner
                .toaster
                .warning(format!("Order #{number} is already {}", current.label()));
            return AdvanceOutcome::AlreadyFinal;
        };

        tracing::info!(order_id, order_number = %number, from = %current, to = %next, "Advancing order");
        let result = self
            .guarded(self.inner.api.update_order_status(order_id, next))
            .await;

        {
            let mut state = self.inner.state.write();
            if let Some(modal) = state.modal.as_mut().filter(|m| m.order_id == order_id) {
                modal.advancing = false;
            }
        }

        match result {
            None => AdvanceOutcome::Cancelled,
            Some(Ok(())) => {
                self.inner
                    .toaster
                    .success(format!("Order #{number} is now {}", next.label()));
                self.inner.state.write().patch_order_status(order_id, next);
                self.refresh_all().await;
                AdvanceOutcome::Advanced(next)
            }
            Some(Err(e)) => {
                tracing::warn!(order_id, order_number = %number, error = %e, "Failed to update order status");
                self.inner
                    .toaster
                    .error(format!("Failed to update order #{number}"));
                AdvanceOutcome::Failed(e.to_string())
            }
        }
    }

    /// React to one event from the live feed and wait for any refetch it
    /// triggers
    pub async fn handle_feed_event(&self, event: FeedEvent) {
        if self.apply_feed_event(event) {
            self.refresh_all().await;
        }
    }

    /// Apply feed events until the feed ends or the dashboard shuts down.
    ///
    /// Connection changes land in the state as soon as they are received;
    /// the refetch for an order update runs in its own task so it never
    /// holds up the events queued behind it.
    pub async fn pump_feed(&self, mut events: mpsc::UnboundedReceiver<FeedEvent>) {
        loop {
            let event = tokio::select! {
                _ = self.inner.shutdown.cancelled() => break,
                event = events.recv() => event,
            };
            let Some(event) = event else {
                break;
            };
            if self.apply_feed_event(event) {
                let dashboard = self.clone();
                tokio::spawn(async move { dashboard.refresh_all().await });
            }
        }
        tracing::debug!("Feed pump stopped");
    }

    /// Synchronous part of a feed event; returns true when list and stats
    /// must be reloaded
    fn apply_feed_event(&self, event: FeedEvent) -> bool {
        if self.is_shut_down() {
            return false;
        }
        match event {
            FeedEvent::Connected => {
                self.inner.state.write().connection = ConnectionState::Connected;
                false
            }
            FeedEvent::Disconnected { .. } => {
                self.inner.state.write().connection = ConnectionState::Disconnected;
                false
            }
            FeedEvent::Halted { failures } => {
                self.inner.state.write().connection = ConnectionState::Halted;
                self.inner.toaster.error(format!(
                    "Live updates stopped after {failures} failed attempts"
                ));
                false
            }
            FeedEvent::OrderUpdate(update) => {
                if update.is_new_order() {
                    let number = update
                        .order_number
                        .clone()
                        .or_else(|| update.order_id.map(|id| id.to_string()))
                        .unwrap_or_default();
                    self.inner.toaster.success(format!("New order #{number}"));
                }
                true
            }
        }
    }

    /// Stop writing state and tear down toast timers
    pub fn shutdown(&self) {
        tracing::info!("Dashboard shutting down");
        self.inner.shutdown.cancel();
        self.inner.toaster.shutdown();
    }

    async fn guarded<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            _ = self.inner.shutdown.cancelled() => None,
            result = fut => Some(result),
        }
    }
}
