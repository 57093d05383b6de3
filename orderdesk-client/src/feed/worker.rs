//! FeedWorker — single-connection order channel with reconnect
//!
//! 1. Connect through the [`FeedConnector`]
//! 2. Route `order_update` frames to the event channel
//! 3. On close or failed connect, wait the policy delay and reconnect
//! 4. Give up once the consecutive failure ceiling is reached

use shared::PushEnvelope;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use super::{ConnectionState, FeedConnector, FeedEvent, FeedSession, ReconnectPolicy};

/// Upper bound for a polite close on shutdown
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    Shutdown,
}

pub(crate) struct FeedWorker {
    connector: Arc<dyn FeedConnector>,
    policy: ReconnectPolicy,
    state: watch::Sender<ConnectionState>,
    events: mpsc::UnboundedSender<FeedEvent>,
    shutdown: CancellationToken,
}

impl FeedWorker {
    pub(crate) fn new(
        connector: Arc<dyn FeedConnector>,
        policy: ReconnectPolicy,
        state: watch::Sender<ConnectionState>,
        events: mpsc::UnboundedSender<FeedEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            connector,
            policy,
            state,
            events,
            shutdown,
        }
    }

    /// Main run loop — connect, pump frames, reconnect on close
    pub(crate) async fn run(self) {
        tracing::info!("Order feed worker started");
        let mut failures: u32 = 0;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let connected = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = self.connector.connect() => result,
            };

            match connected {
                Ok(session) => {
                    failures = 0;
                    tracing::info!("Order feed connected");
                    self.set_state(ConnectionState::Connected);
                    self.emit(FeedEvent::Connected);
                    if self.run_session(session).await == SessionEnd::Shutdown {
                        break;
                    }
                }
                Err(e) => {
                    failures += 1;
                    if self.policy.exhausted(failures) {
                        tracing::error!(failures, "Order feed giving up: {e}");
                        self.set_state(ConnectionState::Halted);
                        self.emit(FeedEvent::Halted { failures });
                        tracing::info!("Order feed worker stopped");
                        return;
                    }
                    tracing::warn!(failures, "Order feed connection failed: {e}");
                }
            }

            // Exactly one pending reconnect at a time
            let delay = self.policy.delay_for(failures);
            tracing::info!(delay_ms = delay.as_millis() as u64, failures, "Order feed reconnect scheduled");
            self.set_state(ConnectionState::Disconnected);
            self.emit(FeedEvent::Disconnected {
                retry_in: delay,
                failures,
            });

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {},
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::info!("Order feed worker stopped");
    }

    /// Run a single session until the peer closes or shutdown
    async fn run_session(&self, mut session: Box<dyn FeedSession>) -> SessionEnd {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    if tokio::time::timeout(CLOSE_TIMEOUT, session.close()).await.is_err() {
                        tracing::debug!("Order channel close timed out");
                    }
                    return SessionEnd::Shutdown;
                }

                frame = session.next_text() => {
                    match frame {
                        Some(Ok(text)) => self.handle_text(&text),
                        Some(Err(e)) => {
                            tracing::warn!("Order channel error: {e}");
                            return SessionEnd::Closed;
                        }
                        None => {
                            tracing::info!("Order channel stream ended");
                            return SessionEnd::Closed;
                        }
                    }
                }
            }
        }
    }

    /// Handle an incoming text frame
    fn handle_text(&self, text: &str) {
        let Some(envelope) = PushEnvelope::parse(text) else {
            tracing::warn!(len = text.len(), "Ignoring malformed order channel frame");
            return;
        };

        let kind = envelope.kind.clone();
        match envelope.into_order_update() {
            Some(update) => {
                tracing::debug!(
                    action = ?update.action,
                    order_number = update.order_number.as_deref().unwrap_or("-"),
                    "Order update received"
                );
                self.emit(FeedEvent::OrderUpdate(update));
            }
            None => tracing::debug!(kind = %kind, "Ignoring non order frame"),
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }

    fn emit(&self, event: FeedEvent) {
        // Receiver dropped means nobody is listening; the loop still honours shutdown
        let _ = self.events.send(event);
    }
}
