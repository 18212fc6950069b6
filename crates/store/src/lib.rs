//! `emberpos-store` — persistence and the checkout service.
//!
//! Store traits with two implementations: in-memory (dev/test) and Postgres
//! via sqlx. Every operation is an independent round trip with
//! last-write-wins semantics with no cross-call transactions, matching the
//! behavior of the system this replaces.

pub mod checkout;
pub mod in_memory;
pub mod postgres;
pub mod repo;

pub use checkout::{Checkout, CheckoutError, CheckoutReceipt, SkippedIngredient};
pub use in_memory::{
    InMemoryInventoryStore, InMemoryMenuStore, InMemoryNotificationStore, InMemoryOrderStore,
    InMemoryPartyStore,
};
pub use repo::{
    InventoryStore, MenuStore, NotificationStore, OrderStore, PartyStore, StoreError, StoreResult,
};
