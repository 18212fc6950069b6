//! `emberpos-inventory`: stocked ingredients/supplies with mutable decimal
//! quantities.

pub mod item;

pub use item::{InventoryItem, StockWarning};
