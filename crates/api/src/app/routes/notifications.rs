use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use emberpos_core::NotificationId;
use emberpos_notifications::{Notification, NotificationKind};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/:id/read", post(mark_read))
        .route("/:id/email", post(send_email))
}

pub async fn create_notification(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateNotificationRequest>,
) -> axum::response::Response {
    let kind = match NotificationKind::parse(&body.kind) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let notification = match Notification::new(
        NotificationId::new(),
        kind,
        body.title,
        body.body,
        Utc::now(),
    ) {
        Ok(n) => n,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.notifications.insert_notification(&notification).await {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(dto::notification_to_json(&notification)),
    )
        .into_response()
}

pub async fn list_notifications(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.notifications.list_notifications().await {
        Ok(notifications) => Json(
            notifications
                .iter()
                .map(dto::notification_to_json)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn mark_read(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: NotificationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid notification id")
        }
    };

    let mut notification = match services.notifications.get_notification(id).await {
        Ok(Some(n)) => n,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "notification not found")
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    notification.mark_read();
    if let Err(e) = services.notifications.update_notification(&notification).await {
        return errors::store_error_to_response(e);
    }

    Json(dto::notification_to_json(&notification)).into_response()
}

/// Fire the email trigger for one notification. Requires
/// `EMAIL_WEBHOOK_URL`; failure is reported, never retried.
pub async fn send_email(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SendEmailRequest>,
) -> axum::response::Response {
    let id: NotificationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid notification id")
        }
    };

    let Some(email) = services.email.as_ref() else {
        return errors::json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "email_disabled",
            "EMAIL_WEBHOOK_URL is not configured",
        );
    };

    let notification = match services.notifications.get_notification(id).await {
        Ok(Some(n)) => n,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "notification not found")
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    match email.send(&notification, &body.to).await {
        Ok(()) => Json(serde_json::json!({ "sent": true })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, notification_id = %id, "email trigger failed");
            errors::json_error(StatusCode::BAD_GATEWAY, "email_failed", e.to_string())
        }
    }
}
