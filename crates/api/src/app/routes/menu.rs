use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use emberpos_core::DealId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_deals).post(create_deal))
        .route("/:id", get(get_deal).put(update_deal).delete(delete_deal))
}

pub async fn create_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SaveDealRequest>,
) -> axum::response::Response {
    let deal = match dto::build_deal(body) {
        Ok(deal) => deal,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.menu.insert_deal(&deal).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::deal_to_json(&deal))).into_response()
}

pub async fn list_deals(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.menu.list_deals().await {
        Ok(deals) => Json(
            deals.iter().map(dto::deal_to_json).collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DealId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid deal id"),
    };

    match services.menu.get_deal(id).await {
        Ok(Some(deal)) => Json(dto::deal_to_json(&deal)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SaveDealRequest>,
) -> axum::response::Response {
    let id: DealId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid deal id"),
    };

    let mut deal = match services.menu.get_deal(id).await {
        Ok(Some(deal)) => deal,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    let products = match dto::build_deal_parts(body.products) {
        Ok(products) => products,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = deal.update(body.name, body.price_cents, body.image_url, products) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.menu.update_deal(&deal).await {
        return errors::store_error_to_response(e);
    }

    Json(dto::deal_to_json(&deal)).into_response()
}

pub async fn delete_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DealId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid deal id"),
    };

    match services.menu.delete_deal(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
