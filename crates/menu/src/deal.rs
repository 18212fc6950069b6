use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use emberpos_core::{DealId, DealProductId, DomainError, DomainResult, FlavorId, InventoryItemId};

/// Ingredient consumption attached to a flavor.
///
/// Pure association: (inventory item, quantity consumed per single product
/// unit). It has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLink {
    pub item_id: InventoryItemId,
    pub quantity_per_item: Decimal,
}

impl IngredientLink {
    pub fn new(item_id: InventoryItemId, quantity_per_item: Decimal) -> DomainResult<Self> {
        if quantity_per_item < Decimal::ZERO {
            return Err(DomainError::validation(
                "quantity_per_item cannot be negative",
            ));
        }
        Ok(Self {
            item_id,
            quantity_per_item,
        })
    }
}

/// Named variant of a deal product, carrying its own ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    id: FlavorId,
    name: String,
    ingredients: Vec<IngredientLink>,
}

impl Flavor {
    pub fn new(
        id: FlavorId,
        name: impl Into<String>,
        ingredients: Vec<IngredientLink>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("flavor name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            ingredients,
        })
    }

    /// Rehydrate a stored row without re-validating.
    pub fn from_parts(id: FlavorId, name: String, ingredients: Vec<IngredientLink>) -> Self {
        Self {
            id,
            name,
            ingredients,
        }
    }

    pub fn id(&self) -> FlavorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ingredients(&self) -> &[IngredientLink] {
        &self.ingredients
    }
}

/// A product inside a deal bundle: a name, how many units the bundle
/// includes, and the flavors a customer can choose from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealProduct {
    id: DealProductId,
    name: String,
    quantity: u32,
    flavors: Vec<Flavor>,
}

impl DealProduct {
    pub fn new(
        id: DealProductId,
        name: impl Into<String>,
        quantity: u32,
        flavors: Vec<Flavor>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if quantity == 0 {
            return Err(DomainError::validation(
                "bundle quantity must be at least 1",
            ));
        }
        Ok(Self {
            id,
            name,
            quantity,
            flavors,
        })
    }

    /// Rehydrate a stored row without re-validating.
    pub fn from_parts(
        id: DealProductId,
        name: String,
        quantity: u32,
        flavors: Vec<Flavor>,
    ) -> Self {
        Self {
            id,
            name,
            quantity,
            flavors,
        }
    }

    pub fn id(&self) -> DealProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    pub fn flavor(&self, flavor_id: FlavorId) -> Option<&Flavor> {
        self.flavors.iter().find(|f| f.id() == flavor_id)
    }

    /// Whether a flavor choice is required when ordering this product.
    pub fn requires_flavor_choice(&self) -> bool {
        !self.flavors.is_empty()
    }
}

/// A bundled/discounted offering composed of sub-products.
///
/// Deleting a deal cascades to its products, flavors, and ingredient links;
/// that cascade lives in the store layer, this type only owns the nested
/// structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    id: DealId,
    name: String,
    /// Price in smallest currency unit (e.g., cents).
    price_cents: u64,
    image_url: Option<String>,
    products: Vec<DealProduct>,
    created_at: DateTime<Utc>,
}

impl Deal {
    pub fn new(
        id: DealId,
        name: impl Into<String>,
        price_cents: u64,
        image_url: Option<String>,
        products: Vec<DealProduct>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("deal name cannot be empty"));
        }
        if price_cents == 0 {
            return Err(DomainError::validation("deal price must be positive"));
        }
        if products.is_empty() {
            return Err(DomainError::validation(
                "a deal must contain at least one product",
            ));
        }
        Ok(Self {
            id,
            name,
            price_cents,
            image_url,
            products,
            created_at,
        })
    }

    /// Rehydrate a stored row without re-validating.
    pub fn from_parts(
        id: DealId,
        name: String,
        price_cents: u64,
        image_url: Option<String>,
        products: Vec<DealProduct>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            price_cents,
            image_url,
            products,
            created_at,
        }
    }

    pub fn id(&self) -> DealId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn products(&self) -> &[DealProduct] {
        &self.products
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn product(&self, product_id: DealProductId) -> Option<&DealProduct> {
        self.products.iter().find(|p| p.id() == product_id)
    }

    /// Replace editable fields (admin edit form). Products are replaced
    /// wholesale, matching the original form's save semantics.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        price_cents: u64,
        image_url: Option<String>,
        products: Vec<DealProduct>,
    ) -> DomainResult<()> {
        let updated = Deal::new(
            self.id,
            name,
            price_cents,
            image_url,
            products,
            self.created_at,
        )?;
        *self = updated;
        Ok(())
    }
}
