//! Dashboard statistics snapshot

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::status::OrderStatus;

/// Order count and revenue over one period
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodStats {
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub revenue: Decimal,
}

/// Response of `GET /stats/`, replaced wholesale on every fetch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatsSnapshot {
    /// Orders still being worked on (pending, confirmed, preparing)
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub today: PeriodStats,
    #[serde(default)]
    pub weekly: Option<PeriodStats>,
    #[serde(default)]
    pub total_customers: u64,
    /// Per-status counts; keys outside the workflow are dropped
    #[serde(default, deserialize_with = "known_statuses")]
    pub status_breakdown: BTreeMap<OrderStatus, u64>,
}

impl StatsSnapshot {
    pub fn today_revenue(&self) -> Decimal {
        self.today.revenue
    }

    pub fn today_orders(&self) -> u64 {
        self.today.orders
    }

    pub fn count_for(&self, status: OrderStatus) -> u64 {
        self.status_breakdown.get(&status).copied().unwrap_or(0)
    }
}

fn known_statuses<'de, D>(deserializer: D) -> Result<BTreeMap<OrderStatus, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, u64>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(code, count)| Some((code.parse::<OrderStatus>().ok()?, count)))
        .collect())
}
