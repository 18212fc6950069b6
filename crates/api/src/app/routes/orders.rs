use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use emberpos_core::{NotificationId, OrderId};
use emberpos_notifications::{Notification, NotificationKind};
use emberpos_orders::OrderStatus;
use emberpos_store::CheckoutReceipt;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route("/preview", post(preview_order))
        .route("/:id", get(get_order))
        .route("/:id/status", post(update_status))
        .route("/:id/cancel", post(cancel_order))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let cart = match dto::build_cart(body.lines) {
        Ok(cart) => cart,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let receipt = match services.checkout.place_order(&cart).await {
        Ok(receipt) => receipt,
        Err(e) => return errors::checkout_error_to_response(e),
    };

    notify_order_placed(&services, &receipt).await;

    (StatusCode::CREATED, Json(dto::receipt_to_json(&receipt))).into_response()
}

/// Back-office notifications for a placed order. Failures here are logged
/// and dropped; the order is already persisted.
async fn notify_order_placed(services: &AppServices, receipt: &CheckoutReceipt) {
    let order = &receipt.order;
    match Notification::new(
        NotificationId::new(),
        NotificationKind::Order,
        format!("New order #{}", order.order_number()),
        order.instructions().to_string(),
        Utc::now(),
    ) {
        Ok(n) => {
            if let Err(e) = services.notifications.insert_notification(&n).await {
                tracing::warn!(error = %e, "failed to store order notification");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to build order notification"),
    }

    for warning in &receipt.warnings {
        match Notification::new(
            NotificationId::new(),
            NotificationKind::Inventory,
            format!("Low stock: {}", warning.item_name),
            format!("{} remaining after order #{}", warning.resulting_stock, order.order_number()),
            Utc::now(),
        ) {
            Ok(n) => {
                if let Err(e) = services.notifications.insert_notification(&n).await {
                    tracing::warn!(error = %e, "failed to store stock notification");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to build stock notification"),
        }
    }
}

/// Aggregate ingredient requirements for a cart without placing it.
pub async fn preview_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let cart = match dto::build_cart(body.lines) {
        Ok(cart) => cart,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.checkout.preview(&cart).await {
        Ok(reqs) => Json(
            reqs.iter()
                .map(|r| {
                    serde_json::json!({
                        "item_id": r.item_id.to_string(),
                        "required": r.required,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::checkout_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.orders.list_orders().await {
        Ok(orders) => Json(orders.iter().map(dto::order_to_json).collect::<Vec<_>>()).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.orders.get_order(id).await {
        Ok(Some(order)) => Json(dto::order_to_json(&order)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };
    let status = match OrderStatus::parse(&body.status) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut order = match services.orders.get_order(id).await {
        Ok(Some(order)) => order,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = order.transition_to(status) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.orders.update_order(&order).await {
        return errors::store_error_to_response(e);
    }

    Json(dto::order_to_json(&order)).into_response()
}

pub async fn cancel_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CancelOrderRequest>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    let mut order = match services.orders.get_order(id).await {
        Ok(Some(order)) => order,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = order.cancel(body.reason) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.orders.update_order(&order).await {
        return errors::store_error_to_response(e);
    }

    Json(dto::order_to_json(&order)).into_response()
}
