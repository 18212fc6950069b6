//! Store traits and the store error type.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use emberpos_core::{DealId, InventoryItemId, NotificationId, OrderId, PartyId};
use emberpos_inventory::InventoryItem;
use emberpos_menu::Deal;
use emberpos_notifications::Notification;
use emberpos_orders::Order;
use emberpos_parties::{Party, PartyKind};

pub type StoreResult<T> = Result<T, StoreError>;

/// Infrastructure-level persistence error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row failed to rehydrate (e.g. an unknown status string).
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Deal (bundle) configuration storage.
///
/// `delete_deal` cascades: the deal's products, flavors, and ingredient
/// links go with it.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn insert_deal(&self, deal: &Deal) -> StoreResult<()>;
    async fn update_deal(&self, deal: &Deal) -> StoreResult<()>;
    async fn get_deal(&self, id: DealId) -> StoreResult<Option<Deal>>;
    async fn list_deals(&self) -> StoreResult<Vec<Deal>>;
    async fn delete_deal(&self, id: DealId) -> StoreResult<()>;
}

/// Inventory item storage. `set_stock` is an unconditional overwrite
/// (last-write-wins); concurrent writers race.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn insert_item(&self, item: &InventoryItem) -> StoreResult<()>;
    async fn get_item(&self, id: InventoryItemId) -> StoreResult<Option<InventoryItem>>;
    async fn list_items(&self) -> StoreResult<Vec<InventoryItem>>;
    async fn set_stock(&self, id: InventoryItemId, stock: Decimal) -> StoreResult<()>;
}

/// Order storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: &Order) -> StoreResult<()>;
    async fn get_order(&self, id: OrderId) -> StoreResult<Option<Order>>;
    /// Newest first.
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    /// Full-row overwrite, used for status transitions.
    async fn update_order(&self, order: &Order) -> StoreResult<()>;
    /// Next sequential order number (`max + 1`, starting at 1).
    async fn next_order_number(&self) -> StoreResult<u64>;
}

/// Supplier / delivery-staff directory storage.
#[async_trait]
pub trait PartyStore: Send + Sync {
    async fn insert_party(&self, party: &Party) -> StoreResult<()>;
    async fn get_party(&self, id: PartyId) -> StoreResult<Option<Party>>;
    async fn list_parties(&self, kind: Option<PartyKind>) -> StoreResult<Vec<Party>>;
    async fn update_party(&self, party: &Party) -> StoreResult<()>;
}

/// Notification storage.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()>;
    async fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>>;
    /// Newest first.
    async fn list_notifications(&self) -> StoreResult<Vec<Notification>>;
    async fn update_notification(&self, notification: &Notification) -> StoreResult<()>;
}
