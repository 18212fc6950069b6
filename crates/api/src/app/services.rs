use std::sync::Arc;

use anyhow::Context;

use emberpos_notifications::EmailTrigger;
use emberpos_store::postgres::{
    ensure_schema, PostgresInventoryStore, PostgresMenuStore, PostgresNotificationStore,
    PostgresOrderStore, PostgresPartyStore,
};
use emberpos_store::{
    Checkout, InMemoryInventoryStore, InMemoryMenuStore, InMemoryNotificationStore,
    InMemoryOrderStore, InMemoryPartyStore, InventoryStore, MenuStore, NotificationStore,
    OrderStore, PartyStore,
};

/// Stores and services shared by all handlers.
pub struct AppServices {
    pub menu: Arc<dyn MenuStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub orders: Arc<dyn OrderStore>,
    pub parties: Arc<dyn PartyStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub checkout: Checkout,
    pub email: Option<EmailTrigger>,
}

impl AppServices {
    fn assemble(
        menu: Arc<dyn MenuStore>,
        inventory: Arc<dyn InventoryStore>,
        orders: Arc<dyn OrderStore>,
        parties: Arc<dyn PartyStore>,
        notifications: Arc<dyn NotificationStore>,
        email: Option<EmailTrigger>,
    ) -> Self {
        let checkout = Checkout::new(menu.clone(), inventory.clone(), orders.clone());
        Self {
            menu,
            inventory,
            orders,
            parties,
            notifications,
            checkout,
            email,
        }
    }

    /// Fully in-memory wiring, used when `DATABASE_URL` is unset and by tests.
    pub fn in_memory(email: Option<EmailTrigger>) -> Self {
        Self::assemble(
            Arc::new(InMemoryMenuStore::new()),
            Arc::new(InMemoryInventoryStore::new()),
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(InMemoryPartyStore::new()),
            Arc::new(InMemoryNotificationStore::new()),
            email,
        )
    }
}

/// Build services from the environment: Postgres stores when `DATABASE_URL`
/// is set, in-memory otherwise. `EMAIL_WEBHOOK_URL` enables the email
/// trigger.
pub async fn build_services() -> anyhow::Result<AppServices> {
    let email = match std::env::var("EMAIL_WEBHOOK_URL") {
        Ok(url) => Some(EmailTrigger::new(url)),
        Err(_) => {
            tracing::warn!("EMAIL_WEBHOOK_URL not set; email notifications disabled");
            None
        }
    };

    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::PgPool::connect(&url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            ensure_schema(&pool)
                .await
                .context("failed to ensure schema")?;
            tracing::info!("using postgres stores");
            Ok(AppServices::assemble(
                Arc::new(PostgresMenuStore::new(pool.clone())),
                Arc::new(PostgresInventoryStore::new(pool.clone())),
                Arc::new(PostgresOrderStore::new(pool.clone())),
                Arc::new(PostgresPartyStore::new(pool.clone())),
                Arc::new(PostgresNotificationStore::new(pool)),
                email,
            ))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            Ok(AppServices::in_memory(email))
        }
    }
}
