//! Order status registry
//!
//! The workflow is a strict forward chain
//! `pending → confirmed → preparing → ready → completed`.
//! `cancelled` is terminal and is only ever reached out-of-band.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Order Status
// ============================================================================

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

/// Presentation category of a status (not an exact style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    /// Needs operator attention
    Warning,
    /// Acknowledged, not started
    Info,
    /// Work in progress
    Progress,
    /// Done or ready to hand over
    Success,
    /// Finished, nothing to do
    Neutral,
    /// Aborted
    Danger,
}

struct StatusEntry {
    status: OrderStatus,
    code: &'static str,
    label: &'static str,
    tone: StatusTone,
    next: Option<OrderStatus>,
}

/// Fixed lookup table, indexed by `OrderStatus as usize`
static REGISTRY: [StatusEntry; 6] = [
    StatusEntry {
        status: OrderStatus::Pending,
        code: "pending",
        label: "Pending",
        tone: StatusTone::Warning,
        next: Some(OrderStatus::Confirmed),
    },
    StatusEntry {
        status: OrderStatus::Confirmed,
        code: "confirmed",
        label: "Confirmed",
        tone: StatusTone::Info,
        next: Some(OrderStatus::Preparing),
    },
    StatusEntry {
        status: OrderStatus::Preparing,
        code: "preparing",
        label: "Preparing",
        tone: StatusTone::Progress,
        next: Some(OrderStatus::Ready),
    },
    StatusEntry {
        status: OrderStatus::Ready,
        code: "ready",
        label: "Ready for Pickup/Delivery",
        tone: StatusTone::Success,
        next: Some(OrderStatus::Completed),
    },
    StatusEntry {
        status: OrderStatus::Completed,
        code: "completed",
        label: "Completed",
        tone: StatusTone::Neutral,
        next: None,
    },
    StatusEntry {
        status: OrderStatus::Cancelled,
        code: "cancelled",
        label: "Cancelled",
        tone: StatusTone::Danger,
        next: None,
    },
];

impl OrderStatus {
    /// All statuses in workflow order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    fn entry(self) -> &'static StatusEntry {
        &REGISTRY[self as usize]
    }

    /// Wire code (`pending`, `confirmed`, ...)
    pub fn code(self) -> &'static str {
        self.entry().code
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn tone(self) -> StatusTone {
        self.entry().tone
    }

    /// The single permitted forward transition, if any
    pub fn next(self) -> Option<OrderStatus> {
        self.entry().next
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

/// Pure lookup of the next workflow status.
pub fn next_status(current: OrderStatus) -> Option<OrderStatus> {
    current.next()
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        REGISTRY
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.status)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

// ============================================================================
// Payment Status
// ============================================================================

/// 支付状态
///
/// The payment gateway reports `pending`, `settlement` and `expire`; every
/// other code (`deny`, `cancel`, missing payment) is folded into `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    #[serde(rename = "settlement", alias = "settled")]
    Settled,
    #[serde(rename = "expire", alias = "expired")]
    Expired,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Awaiting payment",
            Self::Settled => "Paid",
            Self::Expired => "Expired",
            Self::Unknown => "-",
        }
    }

    pub fn tone(self) -> StatusTone {
        match self {
            Self::Pending => StatusTone::Warning,
            Self::Settled => StatusTone::Success,
            Self::Expired => StatusTone::Danger,
            Self::Unknown => StatusTone::Neutral,
        }
    }
}

/// Deserialize a nullable payment status, mapping `null` to `Unknown`.
pub(crate) fn payment_status_or_unknown<'de, D>(deserializer: D) -> Result<PaymentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PaymentStatus>::deserialize(deserializer)?.unwrap_or_default())
}
