use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use emberpos_orders::OrderStatus;
use emberpos_reports::{daily_sales, inventory_to_csv, orders_to_csv};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/sales/daily", get(get_daily_sales))
        .route("/orders.csv", get(export_orders_csv))
        .route("/inventory.csv", get(export_inventory_csv))
}

#[derive(Debug, Deserialize)]
pub struct OrdersCsvQuery {
    pub status: Option<String>,
    /// Inclusive calendar-day bounds (UTC) on the order's creation date.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryCsvQuery {
    /// Case-insensitive substring match on the item name.
    pub name: Option<String>,
    pub below_zero: Option<bool>,
}

pub async fn get_daily_sales(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.orders.list_orders().await {
        Ok(orders) => Json(daily_sales(&orders)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn export_orders_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<OrdersCsvQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        Some(s) => match OrderStatus::parse(s) {
            Ok(v) => Some(v),
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => None,
    };

    match services.orders.list_orders().await {
        Ok(orders) => {
            let filtered: Vec<_> = orders
                .into_iter()
                .filter(|o| status.is_none_or(|s| o.status() == s))
                .filter(|o| {
                    let day = o.created_at().date_naive();
                    query.from.is_none_or(|from| day >= from)
                        && query.to.is_none_or(|to| day <= to)
                })
                .collect();
            csv_response(orders_to_csv(&filtered))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn export_inventory_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<InventoryCsvQuery>,
) -> axum::response::Response {
    let name = query.name.as_deref().map(str::to_lowercase);

    match services.inventory.list_items().await {
        Ok(items) => {
            let filtered: Vec<_> = items
                .into_iter()
                .filter(|i| {
                    name.as_deref()
                        .is_none_or(|n| i.name().to_lowercase().contains(n))
                })
                .filter(|i| query.below_zero.is_none_or(|b| i.is_below_zero() == b))
                .collect();
            csv_response(inventory_to_csv(&filtered))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

fn csv_response(body: String) -> axum::response::Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response()
}
