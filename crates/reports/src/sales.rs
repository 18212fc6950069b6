//! Daily sales summary over placed orders.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use emberpos_orders::{Order, OrderStatus};

/// One calendar day of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    pub day: NaiveDate,
    pub order_count: u64,
    pub revenue_cents: u64,
}

/// Group orders by calendar day (UTC), skipping cancelled ones.
///
/// Result is sorted ascending by day.
pub fn daily_sales(orders: &[Order]) -> Vec<DailySales> {
    let mut by_day: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for order in orders {
        if order.status() == OrderStatus::Cancelled {
            continue;
        }
        let entry = by_day.entry(order.created_at().date_naive()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += order.total_cents();
    }

    by_day
        .into_iter()
        .map(|(day, (order_count, revenue_cents))| DailySales {
            day,
            order_count,
            revenue_cents,
        })
        .collect()
}
