use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use emberpos_core::{DealId, DealProductId, DomainError, DomainResult, FlavorId, InventoryItemId};
use emberpos_menu::Deal;

/// One line of a cart: a deal, how many of it, and the chosen flavor per
/// deal product. Ephemeral; never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    deal_id: DealId,
    quantity: u32,
    flavor_selection: HashMap<DealProductId, FlavorId>,
}

impl CartLine {
    pub fn new(
        deal_id: DealId,
        quantity: u32,
        flavor_selection: HashMap<DealProductId, FlavorId>,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("cart quantity must be at least 1"));
        }
        Ok(Self {
            deal_id,
            quantity,
            flavor_selection,
        })
    }

    pub fn deal_id(&self) -> DealId {
        self.deal_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn selected_flavor(&self, product_id: DealProductId) -> Option<FlavorId> {
        self.flavor_selection.get(&product_id).copied()
    }
}

/// In-memory accumulator of selected deals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }
}

/// Total quantity of one inventory item needed by some slice of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRequirement {
    pub item_id: InventoryItemId,
    pub required: Decimal,
}

/// Resolve one cart line against its deal into per-ingredient requirements.
///
/// `required = quantity_per_item × product.quantity × line.quantity` for each
/// ingredient of the selected flavor, in deal-product order. Products without
/// flavors consume nothing. Selecting a flavor the product does not offer, or
/// skipping a product that requires a choice, is a validation error.
pub fn line_requirements(line: &CartLine, deal: &Deal) -> DomainResult<Vec<IngredientRequirement>> {
    if deal.id() != line.deal_id() {
        return Err(DomainError::validation("cart line references a different deal"));
    }

    for product_id in line.flavor_selection.keys() {
        if deal.product(*product_id).is_none() {
            return Err(DomainError::validation(format!(
                "flavor selected for unknown product {product_id}"
            )));
        }
    }

    let line_qty = Decimal::from(line.quantity());
    let mut requirements = Vec::new();

    for product in deal.products() {
        if !product.requires_flavor_choice() {
            continue;
        }

        let flavor_id = line.selected_flavor(product.id()).ok_or_else(|| {
            DomainError::validation(format!("no flavor selected for product '{}'", product.name()))
        })?;
        let flavor = product.flavor(flavor_id).ok_or_else(|| {
            DomainError::validation(format!(
                "flavor {flavor_id} does not belong to product '{}'",
                product.name()
            ))
        })?;

        let product_qty = Decimal::from(product.quantity());
        for link in flavor.ingredients() {
            requirements.push(IngredientRequirement {
                item_id: link.item_id,
                required: link.quantity_per_item * product_qty * line_qty,
            });
        }
    }

    Ok(requirements)
}

/// Sum requirements per distinct inventory item across the cart.
///
/// Display/preview only: the deduction applier walks the per-line lists
/// sequentially instead of this aggregate. Output is sorted by item id for a
/// stable rendering.
pub fn aggregate_requirements<'a, I>(per_line: I) -> Vec<IngredientRequirement>
where
    I: IntoIterator<Item = &'a IngredientRequirement>,
{
    let mut totals: HashMap<InventoryItemId, Decimal> = HashMap::new();
    for req in per_line {
        *totals.entry(req.item_id).or_insert(Decimal::ZERO) += req.required;
    }

    let mut aggregated: Vec<IngredientRequirement> = totals
        .into_iter()
        .map(|(item_id, required)| IngredientRequirement { item_id, required })
        .collect();
    aggregated.sort_by_key(|r| *r.item_id.as_uuid());
    aggregated
}

/// Human-readable summary of one cart line, used for the order's free-text
/// instructions: `2x Family Feast [Pizza: Pepperoni, Wings: BBQ]`.
pub fn line_summary(line: &CartLine, deal: &Deal) -> String {
    let mut choices = Vec::new();
    for product in deal.products() {
        match line
            .selected_flavor(product.id())
            .and_then(|fid| product.flavor(fid))
        {
            Some(flavor) => choices.push(format!("{}: {}", product.name(), flavor.name())),
            None => choices.push(product.name().to_string()),
        }
    }

    if choices.is_empty() {
        format!("{}x {}", line.quantity(), deal.name())
    } else {
        format!("{}x {} [{}]", line.quantity(), deal.name(), choices.join(", "))
    }
}
