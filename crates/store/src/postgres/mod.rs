//! Postgres store implementations (sqlx).
//!
//! Each trait method is one or more independent round trips, with no
//! cross-statement transactions, matching the behavior of the hosted store
//! the original system talked to. The only relational guarantee we lean on
//! is `ON DELETE CASCADE` for the deal subtree.

pub mod deals;
pub mod inventory;
pub mod notifications;
pub mod orders;
pub mod parties;

pub use deals::PostgresMenuStore;
pub use inventory::PostgresInventoryStore;
pub use notifications::PostgresNotificationStore;
pub use orders::PostgresOrderStore;
pub use parties::PostgresPartyStore;

use sqlx::PgPool;

use crate::repo::StoreResult;

/// Create the schema if it does not exist yet.
///
/// Deal products, flavors, and ingredient links hang off their parents with
/// `ON DELETE CASCADE`, so deleting a deal removes the whole subtree.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS deals (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            price_cents BIGINT NOT NULL,
            image_url TEXT,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS deal_products (
            id UUID PRIMARY KEY,
            deal_id UUID NOT NULL REFERENCES deals(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            quantity INT NOT NULL,
            position INT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS flavors (
            id UUID PRIMARY KEY,
            product_id UUID NOT NULL REFERENCES deal_products(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            position INT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS flavor_ingredients (
            flavor_id UUID NOT NULL REFERENCES flavors(id) ON DELETE CASCADE,
            item_id UUID NOT NULL,
            quantity_per_item NUMERIC NOT NULL,
            position INT NOT NULL,
            PRIMARY KEY (flavor_id, item_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS inventory_items (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            stock NUMERIC NOT NULL,
            unit TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            order_number BIGINT NOT NULL,
            total_cents BIGINT NOT NULL,
            instructions TEXT NOT NULL,
            status TEXT NOT NULL,
            cancel_reason TEXT,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS parties (
            id UUID PRIMARY KEY,
            kind TEXT NOT NULL,
            name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            address TEXT,
            status TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY,
            kind TEXT NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            read BOOLEAN NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
