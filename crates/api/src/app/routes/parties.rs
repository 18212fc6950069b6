use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use emberpos_core::PartyId;
use emberpos_parties::{Party, PartyKind};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_parties).post(register_party))
        .route("/:id", get(get_party).put(update_party))
        .route("/:id/suspend", post(suspend_party))
        .route("/:id/reactivate", post(reactivate_party))
}

#[derive(Debug, Deserialize)]
pub struct ListPartiesQuery {
    pub kind: Option<String>,
}

pub async fn register_party(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterPartyRequest>,
) -> axum::response::Response {
    let kind = match PartyKind::parse(&body.kind) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let party = match Party::register(
        PartyId::new(),
        kind,
        body.name,
        body.contact.unwrap_or_default(),
        Utc::now(),
    ) {
        Ok(party) => party,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.parties.insert_party(&party).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::party_to_json(&party))).into_response()
}

pub async fn list_parties(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListPartiesQuery>,
) -> axum::response::Response {
    let kind = match query.kind.as_deref() {
        Some(s) => match PartyKind::parse(s) {
            Ok(v) => Some(v),
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => None,
    };

    match services.parties.list_parties(kind).await {
        Ok(parties) => {
            Json(parties.iter().map(dto::party_to_json).collect::<Vec<_>>()).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_party(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PartyId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid party id"),
    };

    match services.parties.get_party(id).await {
        Ok(Some(party)) => Json(dto::party_to_json(&party)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "party not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_party(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdatePartyRequest>,
) -> axum::response::Response {
    let id: PartyId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid party id"),
    };

    let mut party = match services.parties.get_party(id).await {
        Ok(Some(party)) => party,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "party not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = party.update_details(body.name, body.contact) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.parties.update_party(&party).await {
        return errors::store_error_to_response(e);
    }

    Json(dto::party_to_json(&party)).into_response()
}

pub async fn suspend_party(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    set_party_status(services, id, true).await
}

pub async fn reactivate_party(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    set_party_status(services, id, false).await
}

async fn set_party_status(
    services: Arc<AppServices>,
    id: String,
    suspend: bool,
) -> axum::response::Response {
    let id: PartyId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid party id"),
    };

    let mut party = match services.parties.get_party(id).await {
        Ok(Some(party)) => party,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "party not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    let result = if suspend {
        party.suspend()
    } else {
        party.reactivate()
    };
    if let Err(e) = result {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.parties.update_party(&party).await {
        return errors::store_error_to_response(e);
    }

    Json(dto::party_to_json(&party)).into_response()
}
