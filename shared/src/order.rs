//! Order models as served by the dashboard REST API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::status::{OrderStatus, PaymentStatus, payment_status_or_unknown};

/// Customer who placed the order (a chat-bot user on the backend side)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Customer {
    pub id: i64,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,
}

impl Customer {
    /// `@username` when known, otherwise the full name, otherwise `#id`
    pub fn display_name(&self) -> String {
        if let Some(username) = &self.username {
            return format!("@{username}");
        }
        let full = match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        };
        let full = full.trim();
        if full.is_empty() {
            format!("#{}", self.id)
        } else {
            full.to_string()
        }
    }
}

/// Order row as returned by the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    pub id: i64,
    pub order_number: String,
    #[serde(rename = "user")]
    pub customer: Customer,
    pub status: OrderStatus,
    /// Backend-provided label, preferred over the local registry when present
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default, deserialize_with = "payment_status_or_unknown")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub item_count: u32,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    pub fn status_label(&self) -> &str {
        self.status_display
            .as_deref()
            .unwrap_or_else(|| self.status.label())
    }
}

/// Line item snapshot (name and price are frozen at order time)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub quantity: u32,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
}

impl OrderItem {
    /// Subtotal from the backend, or `unit_price * quantity`
    pub fn line_total(&self) -> Decimal {
        self.subtotal
            .unwrap_or_else(|| self.unit_price * Decimal::from(self.quantity))
    }
}

/// Full order as returned by the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetail {
    pub id: i64,
    pub order_number: String,
    #[serde(rename = "user")]
    pub customer: Customer,
    pub status: OrderStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default, deserialize_with = "payment_status_or_unknown")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub delivery_address: String,
    /// Contact phone given for this order (may differ from the profile phone)
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderDetail {
    pub fn status_label(&self) -> &str {
        self.status_display
            .as_deref()
            .unwrap_or_else(|| self.status.label())
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals; normally equal to `total`
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Contact phone, falling back to the customer profile
    pub fn contact_phone(&self) -> Option<&str> {
        if !self.phone.trim().is_empty() {
            Some(self.phone.as_str())
        } else {
            self.customer.phone.as_deref()
        }
    }
}

/// Treat `null` and blank strings as absent
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const SUMMARY_JSON: &str = r#"{
        "id": 42,
        "order_number": "BF-20240105-1007",
        "user": {"id": 7, "telegram_id": 99887766, "username": "", "first_name": "Budi", "last_name": "Santoso", "phone": ""},
        "status": "pending",
        "status_display": "Pending",
        "total": "45000.00",
        "item_count": 3,
        "payment_status": null,
        "created_at": "2024-01-05T10:30:00.123456+07:00"
    }"#;

    const DETAIL_JSON: &str = r#"{
        "id": 42,
        "order_number": "BF-20240105-1007",
        "user": {"id": 7, "first_name": "Budi", "username": "budi"},
        "status": "ready",
        "delivery_address": "Jl. Sudirman 1",
        "phone": "",
        "notes": "",
        "total": "45000.00",
        "items": [
            {"id": 1, "menu_item": {"id": 3, "name": "Nasi Goreng", "price": "15000.00"}, "name": "Nasi Goreng", "quantity": 2, "price": "15000.00", "subtotal": "30000.00"},
            {"id": 2, "name": "Es Teh", "quantity": 3, "price": "5000.00"}
        ],
        "created_at": "2024-01-05T03:30:00Z",
        "updated_at": "2024-01-05T03:45:00Z"
    }"#;

    #[test]
    fn test_summary_from_backend_payload() {
        let order: OrderSummary = serde_json::from_str(SUMMARY_JSON).unwrap();
        assert_eq!(order.id, 42);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Unknown);
        assert_eq!(order.total, Decimal::from_str("45000.00").unwrap());
        assert_eq!(order.customer.display_name(), "Budi Santoso");
        // +07:00 offset normalized to UTC
        assert_eq!(order.created_at.to_rfc3339(), "2024-01-05T03:30:00.123456+00:00");
    }

    #[test]
    fn test_summary_without_payment_field() {
        let json = SUMMARY_JSON.replace(r#""payment_status": null,"#, "");
        let order: OrderSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_detail_line_items() {
        let detail: OrderDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items[1].line_total(), Decimal::from(15000));
        assert_eq!(detail.items_total(), Decimal::from(45000));
        assert_eq!(detail.item_count(), 5);
        assert_eq!(detail.notes, None);
        assert_eq!(detail.contact_phone(), None);
        assert_eq!(detail.customer.display_name(), "@budi");
        assert_eq!(detail.status_label(), "Ready for Pickup/Delivery");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let customer = Customer {
            id: 12,
            ..Default::default()
        };
        assert_eq!(customer.display_name(), "#12");
    }
}
