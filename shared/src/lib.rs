//! Shared types for OrderDesk
//!
//! Order, status and statistics models exchanged with the ordering backend,
//! the live-update envelope, and display formatting helpers used by both the
//! client crate and the console.

pub mod format;
pub mod order;
pub mod push;
pub mod stats;
pub mod status;
pub mod util;

// Re-exports
pub use chrono;
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use format::{HourCycle, Locale, format_currency, format_date, format_time};
pub use order::{Customer, OrderDetail, OrderItem, OrderSummary};
pub use push::{OrderUpdate, PushEnvelope, UpdateAction};
pub use stats::{PeriodStats, StatsSnapshot};
pub use status::{OrderStatus, PaymentStatus, StatusTone, next_status};
