//! `emberpos-orders`: carts, ingredient requirement calculation, and the
//! order record with its status workflow.

pub mod cart;
pub mod order;

pub use cart::{
    aggregate_requirements, line_requirements, line_summary, Cart, CartLine,
    IngredientRequirement,
};
pub use order::{Order, OrderStatus};
