//! Live-update envelope
//!
//! The push channel sends `{"type": "...", "data": {...}}` frames. Only
//! `order_update` frames are routed; everything else is dropped. The payload
//! is decoded leniently because consumers never merge it into state, they
//! only use it to decide whether to refetch and what to announce.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope type carrying order changes
pub const ORDER_UPDATE: &str = "order_update";

/// Outer `{type, data}` wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// What happened to the order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// Order created by the bot, awaiting payment
    NewOrder,
    /// Operator moved the order along the workflow
    StatusChanged,
    /// Payment gateway reported a new payment status
    PaymentUpdate,
    #[default]
    #[serde(other)]
    Other,
}

/// `data` of an `order_update` frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OrderUpdate {
    #[serde(default)]
    pub action: UpdateAction,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_number: Option<String>,
    /// Remaining fields (`status`, `new_status`, `payment_status`, `total`, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl OrderUpdate {
    pub fn is_new_order(&self) -> bool {
        self.action == UpdateAction::NewOrder
    }
}

impl PushEnvelope {
    /// Parse a text frame. Returns `None` for malformed JSON.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    pub fn is_order_update(&self) -> bool {
        self.kind == ORDER_UPDATE
    }

    /// Decode the order update carried by this envelope.
    ///
    /// Returns `None` unless the envelope is an `order_update`. A payload
    /// that does not decode still yields an update (with `Other` action) so
    /// the receiver refetches anyway.
    pub fn into_order_update(self) -> Option<OrderUpdate> {
        if !self.is_order_update() {
            return None;
        }
        Some(serde_json::from_value(self.data).unwrap_or_default())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
