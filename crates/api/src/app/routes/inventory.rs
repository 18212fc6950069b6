use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use emberpos_core::InventoryItemId;
use emberpos_inventory::InventoryItem;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item))
        .route("/items/:id/stock", put(set_stock))
        .route("/items/:id/adjust", post(adjust_stock))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let item = match InventoryItem::new(
        InventoryItemId::new(),
        body.name,
        body.stock,
        body.unit,
        Utc::now(),
    ) {
        Ok(item) => item,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.inventory.insert_item(&item).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::item_to_json(&item))).into_response()
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.inventory.list_items().await {
        Ok(items) => Json(items.iter().map(dto::item_to_json).collect::<Vec<_>>()).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: InventoryItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services.inventory.get_item(id).await {
        Ok(Some(item)) => Json(dto::item_to_json(&item)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Absolute overwrite from the admin stock form. Last-write-wins.
pub async fn set_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetStockRequest>,
) -> axum::response::Response {
    let id: InventoryItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    if let Err(e) = services.inventory.set_stock(id, body.stock).await {
        return errors::store_error_to_response(e);
    }

    match services.inventory.get_item(id).await {
        Ok(Some(item)) => Json(dto::item_to_json(&item)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Relative adjustment (stock-add form). Read-then-write, no lock.
pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let id: InventoryItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    let mut item = match services.inventory.get_item(id).await {
        Ok(Some(item)) => item,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    item.add_stock(body.delta);

    if let Err(e) = services.inventory.set_stock(id, item.stock()).await {
        return errors::store_error_to_response(e);
    }

    Json(dto::item_to_json(&item)).into_response()
}
