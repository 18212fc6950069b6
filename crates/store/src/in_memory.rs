//! In-memory store implementations for dev and tests.
//!
//! `RwLock<HashMap>` behind the store traits. Kept deliberately dumb: the
//! Postgres implementations are the reference behavior, these only have to
//! agree with them.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;

use emberpos_core::{DealId, InventoryItemId, NotificationId, OrderId, PartyId};
use emberpos_inventory::InventoryItem;
use emberpos_menu::Deal;
use emberpos_notifications::Notification;
use emberpos_orders::Order;
use emberpos_parties::{Party, PartyKind};

use crate::repo::{
    InventoryStore, MenuStore, NotificationStore, OrderStore, PartyStore, StoreError, StoreResult,
};

/// A poisoned lock means a writer panicked mid-update; report the store as
/// unusable instead of propagating the panic.
fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Corrupt("store lock poisoned".to_string())
}

#[derive(Debug, Default)]
pub struct InMemoryMenuStore {
    deals: RwLock<HashMap<DealId, Deal>>,
}

impl InMemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuStore for InMemoryMenuStore {
    async fn insert_deal(&self, deal: &Deal) -> StoreResult<()> {
        self.deals
            .write()
            .map_err(poisoned)?
            .insert(deal.id(), deal.clone());
        Ok(())
    }

    async fn update_deal(&self, deal: &Deal) -> StoreResult<()> {
        let mut deals = self.deals.write().map_err(poisoned)?;
        if !deals.contains_key(&deal.id()) {
            return Err(StoreError::NotFound);
        }
        deals.insert(deal.id(), deal.clone());
        Ok(())
    }

    async fn get_deal(&self, id: DealId) -> StoreResult<Option<Deal>> {
        Ok(self
            .deals
            .read()
            .map_err(poisoned)?
            .get(&id)
            .cloned())
    }

    async fn list_deals(&self) -> StoreResult<Vec<Deal>> {
        let mut deals: Vec<Deal> = self
            .deals
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        deals.sort_by_key(|d| d.created_at());
        Ok(deals)
    }

    async fn delete_deal(&self, id: DealId) -> StoreResult<()> {
        // The deal owns its products/flavors/links, so dropping the deal
        // drops the whole subtree, the same cascade the Postgres schema
        // does with foreign keys.
        match self
            .deals
            .write()
            .map_err(poisoned)?
            .remove(&id)
        {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    items: RwLock<HashMap<InventoryItemId, InventoryItem>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn insert_item(&self, item: &InventoryItem) -> StoreResult<()> {
        self.items
            .write()
            .map_err(poisoned)?
            .insert(item.id(), item.clone());
        Ok(())
    }

    async fn get_item(&self, id: InventoryItemId) -> StoreResult<Option<InventoryItem>> {
        Ok(self
            .items
            .read()
            .map_err(poisoned)?
            .get(&id)
            .cloned())
    }

    async fn list_items(&self) -> StoreResult<Vec<InventoryItem>> {
        let mut items: Vec<InventoryItem> = self
            .items
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(items)
    }

    async fn set_stock(&self, id: InventoryItemId, stock: Decimal) -> StoreResult<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        match items.get_mut(&id) {
            Some(item) => {
                item.set_stock(stock);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        self.orders
            .write()
            .map_err(poisoned)?
            .insert(order.id(), order.clone());
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        Ok(self
            .orders
            .read()
            .map_err(poisoned)?
            .get(&id)
            .cloned())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_number().cmp(&a.order_number()));
        Ok(orders)
    }

    async fn update_order(&self, order: &Order) -> StoreResult<()> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        if !orders.contains_key(&order.id()) {
            return Err(StoreError::NotFound);
        }
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn next_order_number(&self) -> StoreResult<u64> {
        let max = self
            .orders
            .read()
            .map_err(poisoned)?
            .values()
            .map(|o| o.order_number())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPartyStore {
    parties: RwLock<HashMap<PartyId, Party>>,
}

impl InMemoryPartyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PartyStore for InMemoryPartyStore {
    async fn insert_party(&self, party: &Party) -> StoreResult<()> {
        self.parties
            .write()
            .map_err(poisoned)?
            .insert(party.id(), party.clone());
        Ok(())
    }

    async fn get_party(&self, id: PartyId) -> StoreResult<Option<Party>> {
        Ok(self
            .parties
            .read()
            .map_err(poisoned)?
            .get(&id)
            .cloned())
    }

    async fn list_parties(&self, kind: Option<PartyKind>) -> StoreResult<Vec<Party>> {
        let mut parties: Vec<Party> = self
            .parties
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|p| kind.is_none_or(|k| p.kind() == k))
            .cloned()
            .collect();
        parties.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(parties)
    }

    async fn update_party(&self, party: &Party) -> StoreResult<()> {
        let mut parties = self.parties.write().map_err(poisoned)?;
        if !parties.contains_key(&party.id()) {
            return Err(StoreError::NotFound);
        }
        parties.insert(party.id(), party.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<HashMap<NotificationId, Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        self.notifications
            .write()
            .map_err(poisoned)?
            .insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>> {
        Ok(self
            .notifications
            .read()
            .map_err(poisoned)?
            .get(&id)
            .cloned())
    }

    async fn list_notifications(&self) -> StoreResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(notifications)
    }

    async fn update_notification(&self, notification: &Notification) -> StoreResult<()> {
        let mut notifications = self
            .notifications
            .write()
            .map_err(poisoned)?;
        if !notifications.contains_key(&notification.id()) {
            return Err(StoreError::NotFound);
        }
        notifications.insert(notification.id(), notification.clone());
        Ok(())
    }
}
