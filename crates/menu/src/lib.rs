//! `emberpos-menu`: deal (bundle) configuration. Deals, their products,
//! flavors, and the ingredient consumption attached to each flavor.

pub mod deal;

pub use deal::{Deal, DealProduct, Flavor, IngredientLink};
