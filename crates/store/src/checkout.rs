//! Checkout: order placement with ingredient stock deduction.
//!
//! The deduction policy is deliberately soft, preserved from the system this
//! replaces: every write goes through even when it drives stock negative
//! (that produces a warning, not an error), and a failing read or write for
//! one ingredient is logged and skipped without aborting the rest. There is
//! no transaction around the loop, so a failure partway leaves earlier
//! deductions in place.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use emberpos_core::{DealId, DomainError, InventoryItemId, OrderId};
use emberpos_inventory::StockWarning;
use emberpos_menu::Deal;
use emberpos_orders::{
    aggregate_requirements, line_requirements, line_summary, Cart, IngredientRequirement, Order,
};

use crate::repo::{InventoryStore, MenuStore, OrderStore, StoreError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("deal {0} not found")]
    UnknownDeal(DealId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An ingredient whose deduction could not be applied. The checkout carries
/// on; this is reported back so the operator can fix stock by hand.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SkippedIngredient {
    pub item_id: InventoryItemId,
    pub reason: String,
}

/// Outcome of a successful checkout: the persisted order plus everything the
/// operator should be warned about.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub warnings: Vec<StockWarning>,
    pub skipped: Vec<SkippedIngredient>,
}

/// Order placement service over the menu, inventory, and order stores.
#[derive(Clone)]
pub struct Checkout {
    menu: Arc<dyn MenuStore>,
    inventory: Arc<dyn InventoryStore>,
    orders: Arc<dyn OrderStore>,
}

impl Checkout {
    pub fn new(
        menu: Arc<dyn MenuStore>,
        inventory: Arc<dyn InventoryStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            menu,
            inventory,
            orders,
        }
    }

    /// Aggregate ingredient requirements for the whole cart, for display
    /// before placing the order. The placement path does not use this
    /// aggregate; it deducts per line.
    pub async fn preview(&self, cart: &Cart) -> Result<Vec<IngredientRequirement>, CheckoutError> {
        let resolved = self.resolve(cart).await?;
        let mut all = Vec::new();
        for (line_reqs, _) in &resolved.lines {
            all.extend(line_reqs.iter().cloned());
        }
        Ok(aggregate_requirements(all.iter()))
    }

    /// Place the order: deduct stock per cart line, then persist one order
    /// row with status `Pending`.
    pub async fn place_order(&self, cart: &Cart) -> Result<CheckoutReceipt, CheckoutError> {
        let resolved = self.resolve(cart).await?;

        let mut warnings = Vec::new();
        let mut skipped = Vec::new();
        for (line_reqs, _) in &resolved.lines {
            for req in line_reqs {
                self.apply_deduction(req, &mut warnings, &mut skipped).await;
            }
        }

        let order_number = self.orders.next_order_number().await?;
        let order = Order::new_pending(
            OrderId::new(),
            order_number,
            resolved.total_cents,
            resolved.instructions,
            Utc::now(),
        );
        self.orders.insert_order(&order).await?;

        tracing::info!(
            order_number,
            warnings = warnings.len(),
            skipped = skipped.len(),
            "order placed"
        );

        Ok(CheckoutReceipt {
            order,
            warnings,
            skipped,
        })
    }

    /// One ingredient: read, subtract, write back. Never fails the checkout.
    async fn apply_deduction(
        &self,
        req: &IngredientRequirement,
        warnings: &mut Vec<StockWarning>,
        skipped: &mut Vec<SkippedIngredient>,
    ) {
        let mut item = match self.inventory.get_item(req.item_id).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                tracing::warn!(item_id = %req.item_id, "ingredient missing from inventory, skipping deduction");
                skipped.push(SkippedIngredient {
                    item_id: req.item_id,
                    reason: "item not found in inventory".to_string(),
                });
                return;
            }
            Err(e) => {
                tracing::warn!(item_id = %req.item_id, error = %e, "ingredient read failed, skipping deduction");
                skipped.push(SkippedIngredient {
                    item_id: req.item_id,
                    reason: e.to_string(),
                });
                return;
            }
        };

        let warning = item.deduct(req.required);

        if let Err(e) = self.inventory.set_stock(item.id(), item.stock()).await {
            tracing::warn!(item_id = %item.id(), error = %e, "stock write failed, skipping deduction");
            skipped.push(SkippedIngredient {
                item_id: item.id(),
                reason: e.to_string(),
            });
            return;
        }

        if let Some(warning) = warning {
            tracing::warn!(
                item = %warning.item_name,
                required = %warning.required,
                resulting_stock = %warning.resulting_stock,
                "stock driven below zero"
            );
            warnings.push(warning);
        }
    }

    async fn resolve(&self, cart: &Cart) -> Result<ResolvedCart, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(cart.lines().len());
        let mut total_cents: u64 = 0;
        let mut summaries = Vec::with_capacity(cart.lines().len());

        for line in cart.lines() {
            let deal = self
                .menu
                .get_deal(line.deal_id())
                .await?
                .ok_or(CheckoutError::UnknownDeal(line.deal_id()))?;

            let reqs = line_requirements(line, &deal)?;
            total_cents += deal.price_cents() * u64::from(line.quantity());
            summaries.push(line_summary(line, &deal));
            lines.push((reqs, deal));
        }

        Ok(ResolvedCart {
            lines,
            total_cents,
            instructions: summaries.join("; "),
        })
    }
}

struct ResolvedCart {
    lines: Vec<(Vec<IngredientRequirement>, Deal)>,
    total_cents: u64,
    instructions: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use emberpos_core::{DealProductId, FlavorId};
    use emberpos_inventory::InventoryItem;
    use emberpos_menu::{DealProduct, Flavor, IngredientLink};
    use emberpos_orders::{CartLine, OrderStatus};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::in_memory::{InMemoryInventoryStore, InMemoryMenuStore, InMemoryOrderStore};

    struct Fixture {
        checkout: Checkout,
        inventory: Arc<InMemoryInventoryStore>,
        orders: Arc<InMemoryOrderStore>,
        deal: Deal,
        product_id: DealProductId,
        flavor_id: FlavorId,
        item_id: InventoryItemId,
    }

    /// One deal, one product (qty 2), one flavor with a single ingredient at
    /// quantity_per_item 3, backed by `initial_stock` units.
    async fn fixture(initial_stock: Decimal, seed_item: bool) -> Fixture {
        let menu = Arc::new(InMemoryMenuStore::new());
        let inventory = Arc::new(InMemoryInventoryStore::new());
        let orders = Arc::new(InMemoryOrderStore::new());

        let item = InventoryItem::new(
            InventoryItemId::new(),
            "Mozzarella",
            initial_stock,
            "kg",
            Utc::now(),
        )
        .unwrap();
        let item_id = item.id();
        if seed_item {
            inventory.insert_item(&item).await.unwrap();
        }

        let flavor = Flavor::new(
            FlavorId::new(),
            "Pepperoni",
            vec![IngredientLink::new(item_id, dec!(3)).unwrap()],
        )
        .unwrap();
        let flavor_id = flavor.id();
        let product = DealProduct::new(DealProductId::new(), "Pizza", 2, vec![flavor]).unwrap();
        let product_id = product.id();
        let deal = Deal::new(
            DealId::new(),
            "Family Feast",
            1999,
            None,
            vec![product],
            Utc::now(),
        )
        .unwrap();
        menu.insert_deal(&deal).await.unwrap();

        let checkout = Checkout::new(menu, inventory.clone(), orders.clone());
        Fixture {
            checkout,
            inventory,
            orders,
            deal,
            product_id,
            flavor_id,
            item_id,
        }
    }

    fn one_line_cart(fx: &Fixture, quantity: u32) -> Cart {
        let line = CartLine::new(
            fx.deal.id(),
            quantity,
            HashMap::from([(fx.product_id, fx.flavor_id)]),
        )
        .unwrap();
        Cart::new(vec![line])
    }

    #[tokio::test]
    async fn placing_one_unit_deducts_exactly_six() {
        let fx = fixture(dec!(10), true).await;
        let receipt = fx.checkout.place_order(&one_line_cart(&fx, 1)).await.unwrap();

        let stock = fx.inventory.get_item(fx.item_id).await.unwrap().unwrap().stock();
        assert_eq!(stock, dec!(4));
        assert!(receipt.warnings.is_empty());
        assert!(receipt.skipped.is_empty());
        assert_eq!(receipt.order.status(), OrderStatus::Pending);
        assert_eq!(receipt.order.order_number(), 1);
        assert_eq!(receipt.order.total_cents(), 1999);
        assert_eq!(
            receipt.order.instructions(),
            "1x Family Feast [Pizza: Pepperoni]"
        );
    }

    #[tokio::test]
    async fn deduction_proceeds_into_negative_stock_with_warning_only() {
        let fx = fixture(dec!(4), true).await;
        let receipt = fx.checkout.place_order(&one_line_cart(&fx, 1)).await.unwrap();

        // The write happened; the warning is the only side effect.
        let stock = fx.inventory.get_item(fx.item_id).await.unwrap().unwrap().stock();
        assert_eq!(stock, dec!(-2));
        assert_eq!(receipt.warnings.len(), 1);
        assert_eq!(receipt.warnings[0].resulting_stock, dec!(-2));
        assert_eq!(receipt.warnings[0].required, dec!(6));
        assert!(receipt.skipped.is_empty());
    }

    #[tokio::test]
    async fn missing_ingredient_is_skipped_and_the_order_still_lands() {
        let fx = fixture(dec!(10), false).await;
        let receipt = fx.checkout.place_order(&one_line_cart(&fx, 1)).await.unwrap();

        assert_eq!(receipt.skipped.len(), 1);
        assert_eq!(receipt.skipped[0].item_id, fx.item_id);
        assert_eq!(fx.orders.list_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn two_line_carts_deduct_per_line() {
        let fx = fixture(dec!(20), true).await;
        let line = CartLine::new(
            fx.deal.id(),
            1,
            HashMap::from([(fx.product_id, fx.flavor_id)]),
        )
        .unwrap();
        let cart = Cart::new(vec![line.clone(), line]);

        let receipt = fx.checkout.place_order(&cart).await.unwrap();

        let stock = fx.inventory.get_item(fx.item_id).await.unwrap().unwrap().stock();
        assert_eq!(stock, dec!(8));
        assert_eq!(receipt.order.total_cents(), 3998);
        assert_eq!(
            receipt.order.instructions(),
            "1x Family Feast [Pizza: Pepperoni]; 1x Family Feast [Pizza: Pepperoni]"
        );
    }

    #[tokio::test]
    async fn preview_aggregates_without_touching_stock() {
        let fx = fixture(dec!(10), true).await;
        let cart = one_line_cart(&fx, 2);

        let reqs = fx.checkout.preview(&cart).await.unwrap();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].required, dec!(12));

        let stock = fx.inventory.get_item(fx.item_id).await.unwrap().unwrap().stock();
        assert_eq!(stock, dec!(10));
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let fx = fixture(dec!(10), true).await;
        let err = fx.checkout.place_order(&Cart::default()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn unknown_deal_is_rejected_before_any_deduction() {
        let fx = fixture(dec!(10), true).await;
        let line = CartLine::new(DealId::new(), 1, HashMap::new()).unwrap();
        let err = fx
            .checkout
            .place_order(&Cart::new(vec![line]))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownDeal(_)));

        let stock = fx.inventory.get_item(fx.item_id).await.unwrap().unwrap().stock();
        assert_eq!(stock, dec!(10));
    }

    #[tokio::test]
    async fn order_numbers_increment_across_checkouts() {
        let fx = fixture(dec!(100), true).await;
        let first = fx.checkout.place_order(&one_line_cart(&fx, 1)).await.unwrap();
        let second = fx.checkout.place_order(&one_line_cart(&fx, 1)).await.unwrap();
        assert_eq!(first.order.order_number(), 1);
        assert_eq!(second.order.order_number(), 2);
    }
}
