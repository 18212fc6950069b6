use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use emberpos_core::NotificationId;
use emberpos_notifications::{Notification, NotificationKind};

use crate::repo::{NotificationStore, StoreError, StoreResult};

pub struct PostgresNotificationStore {
    pool: PgPool,
}

impl PostgresNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn notification_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<Notification> {
    let kind: String = row.try_get("kind")?;
    let kind = NotificationKind::parse(&kind).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    Ok(Notification::from_parts(
        NotificationId::from_uuid(row.try_get::<Uuid, _>("id")?),
        kind,
        row.try_get("title")?,
        row.try_get("body")?,
        row.try_get("read")?,
        row.try_get::<DateTime<Utc>, _>("created_at")?,
    ))
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, kind, title, body, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(notification.id().as_uuid())
        .bind(notification.kind().as_str())
        .bind(notification.title())
        .bind(notification.body())
        .bind(notification.is_read())
        .bind(notification.created_at())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>> {
        let row = sqlx::query(
            "SELECT id, kind, title, body, read, created_at FROM notifications WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(notification_from_row).transpose()
    }

    async fn list_notifications(&self) -> StoreResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, kind, title, body, read, created_at FROM notifications ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(notification_from_row).collect()
    }

    async fn update_notification(&self, notification: &Notification) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET kind = $2, title = $3, body = $4, read = $5
            WHERE id = $1
            "#,
        )
        .bind(notification.id().as_uuid())
        .bind(notification.kind().as_str())
        .bind(notification.title())
        .bind(notification.body())
        .bind(notification.is_read())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
