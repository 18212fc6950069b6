use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use emberpos_core::OrderId;
use emberpos_orders::{Order, OrderStatus};

use crate::repo::{OrderStore, StoreError, StoreResult};

pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<Order> {
    let status: String = row.try_get("status")?;
    let status = OrderStatus::parse(&status).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    Ok(Order::from_parts(
        OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
        row.try_get::<i64, _>("order_number")? as u64,
        row.try_get::<i64, _>("total_cents")? as u64,
        row.try_get("instructions")?,
        status,
        row.try_get("cancel_reason")?,
        row.try_get::<DateTime<Utc>, _>("created_at")?,
    ))
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, total_cents, instructions, status, cancel_reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.order_number() as i64)
        .bind(order.total_cents() as i64)
        .bind(order.instructions())
        .bind(order.status().as_str())
        .bind(order.cancel_reason())
        .bind(order.created_at())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, order_number, total_cents, instructions, status, cancel_reason, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_number, total_cents, instructions, status, cancel_reason, created_at
            FROM orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    async fn update_order(&self, order: &Order) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET order_number = $2, total_cents = $3, instructions = $4,
                status = $5, cancel_reason = $6
            WHERE id = $1
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.order_number() as i64)
        .bind(order.total_cents() as i64)
        .bind(order.instructions())
        .bind(order.status().as_str())
        .bind(order.cancel_reason())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn next_order_number(&self) -> StoreResult<u64> {
        // Read-then-write without a lock; concurrent placements can race,
        // which matches the original numbering scheme.
        let row = sqlx::query("SELECT COALESCE(MAX(order_number), 0) + 1 AS next FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("next")? as u64)
    }
}
