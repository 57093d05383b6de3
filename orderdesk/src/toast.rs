//! Transient notifications
//!
//! Toasts stack in insertion order and each one removes itself after the
//! configured lifetime. The store is an explicit handle owned by the
//! dashboard; clones share the same stack.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::util::MillisIds;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default toast lifetime
pub const TOAST_TTL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

struct Inner {
    toasts: Mutex<Vec<Toast>>,
    ids: MillisIds,
    ttl: Duration,
    shutdown: CancellationToken,
}

/// Toast stack handle
#[derive(Clone)]
pub struct Toaster {
    inner: Arc<Inner>,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("visible", &self.len())
            .field("ttl", &self.inner.ttl)
            .finish()
    }
}

impl Toaster {
    pub fn new() -> Self {
        Self::with_ttl(TOAST_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                toasts: Mutex::new(Vec::new()),
                ids: MillisIds::new(),
                ttl,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Show a toast and schedule its removal
    pub fn push(&self, message: impl Into<String>, severity: Severity) -> ToastId {
        let toast = Toast {
            id: ToastId(self.inner.ids.next_id()),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        let id = toast.id;
        tracing::debug!(id = id.0, ?severity, message = %toast.message, "Toast shown");
        self.inner.toasts.lock().push(toast);

        if !self.inner.shutdown.is_cancelled() {
            let inner = Arc::downgrade(&self.inner);
            let shutdown = self.inner.shutdown.clone();
            let ttl = self.inner.ttl;
            tokio::spawn(async move {
                tokio::select! {
                    _ = shutdown.cancelled() => {}
                    _ = tokio::time::sleep(ttl) => {
                        if let Some(inner) = inner.upgrade() {
                            inner.toasts.lock().retain(|t| t.id != id);
                        }
                    }
                }
            });
        }
        id
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.push(message, Severity::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.push(message, Severity::Success)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.push(message, Severity::Warning)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.push(message, Severity::Error)
    }

    /// Remove a toast before it expires. Returns false if it is already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut toasts = self.inner.toasts.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Visible toasts, oldest first
    pub fn visible(&self) -> Vec<Toast> {
        self.inner.toasts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.toasts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cancel every pending expiry timer and clear the stack
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.toasts.lock().clear();
    }
}
