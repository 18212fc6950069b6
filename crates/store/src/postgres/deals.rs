use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use emberpos_core::{DealId, DealProductId, FlavorId, InventoryItemId};
use emberpos_menu::{Deal, DealProduct, Flavor, IngredientLink};

use crate::repo::{MenuStore, StoreError, StoreResult};

/// Deal configuration backed by the `deals` / `deal_products` / `flavors` /
/// `flavor_ingredients` tables.
pub struct PostgresMenuStore {
    pool: PgPool,
}

impl PostgresMenuStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_children(&self, deal: &Deal) -> StoreResult<()> {
        for (product_pos, product) in deal.products().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO deal_products (id, deal_id, name, quantity, position)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(product.id().as_uuid())
            .bind(deal.id().as_uuid())
            .bind(product.name())
            .bind(product.quantity() as i32)
            .bind(product_pos as i32)
            .execute(&self.pool)
            .await?;

            for (flavor_pos, flavor) in product.flavors().iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO flavors (id, product_id, name, position)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(flavor.id().as_uuid())
                .bind(product.id().as_uuid())
                .bind(flavor.name())
                .bind(flavor_pos as i32)
                .execute(&self.pool)
                .await?;

                for (link_pos, link) in flavor.ingredients().iter().enumerate() {
                    sqlx::query(
                        r#"
                        INSERT INTO flavor_ingredients (flavor_id, item_id, quantity_per_item, position)
                        VALUES ($1, $2, $3, $4)
                        "#,
                    )
                    .bind(flavor.id().as_uuid())
                    .bind(link.item_id.as_uuid())
                    .bind(link.quantity_per_item)
                    .bind(link_pos as i32)
                    .execute(&self.pool)
                    .await?;
                }
            }
        }
        Ok(())
    }

    async fn load_flavors(&self, product_id: DealProductId) -> StoreResult<Vec<Flavor>> {
        let flavor_rows = sqlx::query(
            r#"
            SELECT id, name
            FROM flavors
            WHERE product_id = $1
            ORDER BY position
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut flavors = Vec::with_capacity(flavor_rows.len());
        for row in flavor_rows {
            let flavor_id = FlavorId::from_uuid(row.try_get::<Uuid, _>("id")?);
            let name: String = row.try_get("name")?;

            let link_rows = sqlx::query(
                r#"
                SELECT item_id, quantity_per_item
                FROM flavor_ingredients
                WHERE flavor_id = $1
                ORDER BY position
                "#,
            )
            .bind(flavor_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

            let mut ingredients = Vec::with_capacity(link_rows.len());
            for link in link_rows {
                ingredients.push(IngredientLink {
                    item_id: InventoryItemId::from_uuid(link.try_get::<Uuid, _>("item_id")?),
                    quantity_per_item: link.try_get::<Decimal, _>("quantity_per_item")?,
                });
            }

            flavors.push(Flavor::from_parts(flavor_id, name, ingredients));
        }
        Ok(flavors)
    }

    async fn load_deal(&self, row: sqlx::postgres::PgRow) -> StoreResult<Deal> {
        let deal_id = DealId::from_uuid(row.try_get::<Uuid, _>("id")?);
        let name: String = row.try_get("name")?;
        let price_cents: i64 = row.try_get("price_cents")?;
        let image_url: Option<String> = row.try_get("image_url")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        let product_rows = sqlx::query(
            r#"
            SELECT id, name, quantity
            FROM deal_products
            WHERE deal_id = $1
            ORDER BY position
            "#,
        )
        .bind(deal_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut products = Vec::with_capacity(product_rows.len());
        for product_row in product_rows {
            let product_id = DealProductId::from_uuid(product_row.try_get::<Uuid, _>("id")?);
            let product_name: String = product_row.try_get("name")?;
            let quantity: i32 = product_row.try_get("quantity")?;
            let flavors = self.load_flavors(product_id).await?;
            products.push(DealProduct::from_parts(
                product_id,
                product_name,
                quantity as u32,
                flavors,
            ));
        }

        Ok(Deal::from_parts(
            deal_id,
            name,
            price_cents as u64,
            image_url,
            products,
            created_at,
        ))
    }
}

#[async_trait]
impl MenuStore for PostgresMenuStore {
    async fn insert_deal(&self, deal: &Deal) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO deals (id, name, price_cents, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(deal.id().as_uuid())
        .bind(deal.name())
        .bind(deal.price_cents() as i64)
        .bind(deal.image_url())
        .bind(deal.created_at())
        .execute(&self.pool)
        .await?;

        self.insert_children(deal).await
    }

    async fn update_deal(&self, deal: &Deal) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE deals
            SET name = $2, price_cents = $3, image_url = $4
            WHERE id = $1
            "#,
        )
        .bind(deal.id().as_uuid())
        .bind(deal.name())
        .bind(deal.price_cents() as i64)
        .bind(deal.image_url())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        // Children are replaced wholesale (edit-form save semantics); the
        // cascade clears flavors and ingredient links with the products.
        sqlx::query("DELETE FROM deal_products WHERE deal_id = $1")
            .bind(deal.id().as_uuid())
            .execute(&self.pool)
            .await?;

        self.insert_children(deal).await
    }

    async fn get_deal(&self, id: DealId) -> StoreResult<Option<Deal>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price_cents, image_url, created_at
            FROM deals
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_deal(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_deals(&self) -> StoreResult<Vec<Deal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price_cents, image_url, created_at
            FROM deals
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut deals = Vec::with_capacity(rows.len());
        for row in rows {
            deals.push(self.load_deal(row).await?);
        }
        Ok(deals)
    }

    async fn delete_deal(&self, id: DealId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
