use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use emberpos_core::PartyId;
use emberpos_parties::{ContactInfo, Party, PartyKind, PartyStatus};

use crate::repo::{PartyStore, StoreError, StoreResult};

pub struct PostgresPartyStore {
    pool: PgPool,
}

impl PostgresPartyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn status_as_str(status: PartyStatus) -> &'static str {
    match status {
        PartyStatus::Active => "active",
        PartyStatus::Suspended => "suspended",
    }
}

fn party_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<Party> {
    let kind: String = row.try_get("kind")?;
    let kind = PartyKind::parse(&kind).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let status = match row.try_get::<String, _>("status")?.as_str() {
        "active" => PartyStatus::Active,
        "suspended" => PartyStatus::Suspended,
        other => return Err(StoreError::Corrupt(format!("unknown party status '{other}'"))),
    };

    Ok(Party::from_parts(
        PartyId::from_uuid(row.try_get::<Uuid, _>("id")?),
        kind,
        row.try_get("name")?,
        ContactInfo {
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
        },
        status,
        row.try_get::<DateTime<Utc>, _>("created_at")?,
    ))
}

#[async_trait]
impl PartyStore for PostgresPartyStore {
    async fn insert_party(&self, party: &Party) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO parties (id, kind, name, email, phone, address, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(party.id().as_uuid())
        .bind(party.kind().as_str())
        .bind(party.name())
        .bind(party.contact().email.as_deref())
        .bind(party.contact().phone.as_deref())
        .bind(party.contact().address.as_deref())
        .bind(status_as_str(party.status()))
        .bind(party.created_at())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_party(&self, id: PartyId) -> StoreResult<Option<Party>> {
        let row = sqlx::query(
            r#"
            SELECT id, kind, name, email, phone, address, status, created_at
            FROM parties
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(party_from_row).transpose()
    }

    async fn list_parties(&self, kind: Option<PartyKind>) -> StoreResult<Vec<Party>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query(
                    r#"
                    SELECT id, kind, name, email, phone, address, status, created_at
                    FROM parties
                    WHERE kind = $1
                    ORDER BY created_at
                    "#,
                )
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, kind, name, email, phone, address, status, created_at
                    FROM parties
                    ORDER BY created_at
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(party_from_row).collect()
    }

    async fn update_party(&self, party: &Party) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE parties
            SET name = $2, email = $3, phone = $4, address = $5, status = $6
            WHERE id = $1
            "#,
        )
        .bind(party.id().as_uuid())
        .bind(party.name())
        .bind(party.contact().email.as_deref())
        .bind(party.contact().phone.as_deref())
        .bind(party.contact().address.as_deref())
        .bind(status_as_str(party.status()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
