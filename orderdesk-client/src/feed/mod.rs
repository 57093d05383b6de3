//! Live order feed
//!
//! A background task keeps one connection to the backend's order channel and
//! turns `order_update` frames into [`FeedEvent`]s. Connection state is
//! published through a `watch` channel for the live indicator.

mod policy;
mod transport;
mod worker;

pub use policy::ReconnectPolicy;
pub use transport::{FeedConnector, FeedSession, WsConnector};

use shared::OrderUpdate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use worker::FeedWorker;

/// Live indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    /// Failure ceiling reached, no further reconnects
    Halted,
}

impl ConnectionState {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Events emitted by the feed worker
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Connected,
    /// Connection closed or connect failed; one reconnect is pending
    Disconnected { retry_in: Duration, failures: u32 },
    /// Gave up after `failures` consecutive failed connects
    Halted { failures: u32 },
    OrderUpdate(OrderUpdate),
}

/// Handle to a running feed worker.
///
/// Dropping the handle cancels the worker; [`FeedHandle::shutdown`] also
/// waits for it to finish.
pub struct FeedHandle {
    shutdown: CancellationToken,
    state: watch::Receiver<ConnectionState>,
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    /// Spawn the worker on the current runtime
    pub fn spawn<C: FeedConnector>(
        connector: C,
        policy: ReconnectPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<FeedEvent>) {
        Self::spawn_with_shutdown(connector, policy, CancellationToken::new())
    }

    /// Spawn the worker bound to an existing shutdown token
    pub fn spawn_with_shutdown<C: FeedConnector>(
        connector: C,
        policy: ReconnectPolicy,
        shutdown: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<FeedEvent>) {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let worker = FeedWorker::new(
            Arc::new(connector),
            policy,
            state_tx,
            event_tx,
            shutdown.clone(),
        );
        let task = tokio::spawn(worker.run());

        let handle = Self {
            shutdown,
            state: state_rx,
            task: Some(task),
        };
        (handle, event_rx)
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Close the live connection, abort a pending reconnect and wait for the worker
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!("Order feed worker panicked: {e}");
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
