use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use emberpos_core::InventoryItemId;
use emberpos_inventory::InventoryItem;

use crate::repo::{InventoryStore, StoreError, StoreResult};

pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn item_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<InventoryItem> {
    Ok(InventoryItem::from_parts(
        InventoryItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
        row.try_get("name")?,
        row.try_get::<Decimal, _>("stock")?,
        row.try_get("unit")?,
        row.try_get::<DateTime<Utc>, _>("created_at")?,
    ))
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn insert_item(&self, item: &InventoryItem) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items (id, name, stock, unit, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(item.id().as_uuid())
        .bind(item.name())
        .bind(item.stock())
        .bind(item.unit())
        .bind(item.created_at())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_item(&self, id: InventoryItemId) -> StoreResult<Option<InventoryItem>> {
        let row = sqlx::query(
            "SELECT id, name, stock, unit, created_at FROM inventory_items WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(item_from_row).transpose()
    }

    async fn list_items(&self) -> StoreResult<Vec<InventoryItem>> {
        let rows = sqlx::query(
            "SELECT id, name, stock, unit, created_at FROM inventory_items ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(item_from_row).collect()
    }

    async fn set_stock(&self, id: InventoryItemId, stock: Decimal) -> StoreResult<()> {
        let result = sqlx::query("UPDATE inventory_items SET stock = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(stock)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
