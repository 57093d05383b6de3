//! Stale-response guard
//!
//! Every fetch takes a ticket from a [`RequestSeq`] before it is sent. The
//! result is written into a [`Versioned`] slot only if its ticket is newer
//! than the last one written, so a slow response can never overwrite a newer
//! one.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::state::LoadState;

/// Monotonic ticket source for one resource
#[derive(Debug, Default)]
pub struct RequestSeq(AtomicU64);

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a new request (starts at 1)
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Most recently issued ticket
    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest() == seq
    }
}

/// A resource slot that only accepts newer results
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub load: LoadState,
    applied_seq: u64,
}

impl<T: Default> Default for Versioned<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Versioned<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            load: LoadState::Idle,
            applied_seq: 0,
        }
    }

    /// Mark a request as in flight. Previous data stays visible.
    pub fn begin(&mut self) {
        self.load = LoadState::Loading;
    }

    /// Store a successful result. Returns false if `seq` is stale.
    pub fn apply(&mut self, seq: u64, value: T) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        self.value = value;
        self.load = LoadState::Ready;
        true
    }

    /// Record a failure, keeping the previous value. Returns false if `seq` is stale.
    pub fn fail(&mut self, seq: u64, message: impl Into<String>) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        self.load = LoadState::Failed(message.into());
        true
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }
}
