use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use emberpos_core::{DomainError, DomainResult, InventoryItemId};

/// A stocked ingredient or supply unit.
///
/// Stock is a decimal (flour in kilograms, sauce in litres) and is allowed to
/// go negative: order deduction is a soft-validation policy, the write always
/// happens. Updates are last-write-wins, matching the original system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: InventoryItemId,
    name: String,
    stock: Decimal,
    /// Unit of measure, free text ("kg", "pcs", "litre").
    unit: String,
    created_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(
        id: InventoryItemId,
        name: impl Into<String>,
        stock: Decimal,
        unit: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        let unit = unit.into();
        if unit.trim().is_empty() {
            return Err(DomainError::validation("unit of measure cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            stock,
            unit,
            created_at,
        })
    }

    /// Rehydrate a stored row without re-validating.
    pub fn from_parts(
        id: InventoryItemId,
        name: String,
        stock: Decimal,
        unit: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            stock,
            unit,
            created_at,
        }
    }

    pub fn id(&self) -> InventoryItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stock(&self) -> Decimal {
        self.stock
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_below_zero(&self) -> bool {
        self.stock < Decimal::ZERO
    }

    /// Absolute overwrite (admin stock form). Last-write-wins.
    pub fn set_stock(&mut self, stock: Decimal) {
        self.stock = stock;
    }

    /// Relative adjustment (stock-add form). Negative deltas are allowed for
    /// manual corrections.
    pub fn add_stock(&mut self, delta: Decimal) {
        self.stock += delta;
    }

    /// Deduct `required` units for an order.
    ///
    /// The deduction always applies, even when the result is negative; in
    /// that case a [`StockWarning`] is returned so the caller can surface it.
    pub fn deduct(&mut self, required: Decimal) -> Option<StockWarning> {
        self.stock -= required;
        if self.stock < Decimal::ZERO {
            Some(StockWarning {
                item_id: self.id,
                item_name: self.name.clone(),
                required,
                resulting_stock: self.stock,
            })
        } else {
            None
        }
    }
}

/// Raised when a deduction drives (or would leave) stock below zero.
///
/// A warning, not an error: the write has already happened when this is
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockWarning {
    pub item_id: InventoryItemId,
    pub item_name: String,
    pub required: Decimal,
    pub resulting_stock: Decimal,
}
