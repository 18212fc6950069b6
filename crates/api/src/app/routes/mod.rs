use axum::Router;

pub mod inventory;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod parties;
pub mod reports;
pub mod system;

/// Router for all back-office endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/deals", menu::router())
        .nest("/inventory", inventory::router())
        .nest("/orders", orders::router())
        .nest("/parties", parties::router())
        .nest("/notifications", notifications::router())
        .nest("/reports", reports::router())
}
