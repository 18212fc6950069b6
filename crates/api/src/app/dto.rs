use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use emberpos_core::{
    DealId, DealProductId, DomainResult, FlavorId, InventoryItemId,
};
use emberpos_inventory::InventoryItem;
use emberpos_menu::{Deal, DealProduct, Flavor, IngredientLink};
use emberpos_notifications::Notification;
use emberpos_orders::{Cart, CartLine, Order};
use emberpos_parties::{ContactInfo, Party, PartyStatus};
use emberpos_store::CheckoutReceipt;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct IngredientLinkRequest {
    pub item_id: InventoryItemId,
    pub quantity_per_item: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct FlavorRequest {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientLinkRequest>,
}

#[derive(Debug, Deserialize)]
pub struct DealProductRequest {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub flavors: Vec<FlavorRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SaveDealRequest {
    pub name: String,
    pub price_cents: u64,
    pub image_url: Option<String>,
    pub products: Vec<DealProductRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub stock: Decimal,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub stock: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub deal_id: DealId,
    pub quantity: u32,
    /// Chosen flavor per deal product.
    #[serde(default)]
    pub flavors: HashMap<DealProductId, FlavorId>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub lines: Vec<CartLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelOrderRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPartyRequest {
    pub kind: String,
    pub name: String,
    pub contact: Option<ContactInfo>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartyRequest {
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
}

// -------------------------
// Request -> domain
// -------------------------

/// Build a fresh deal subtree from the save form; every nested record gets a
/// new id (the edit form replaces products wholesale).
pub fn build_deal_parts(products: Vec<DealProductRequest>) -> DomainResult<Vec<DealProduct>> {
    let mut out = Vec::with_capacity(products.len());
    for product in products {
        let mut flavors = Vec::with_capacity(product.flavors.len());
        for flavor in product.flavors {
            let mut ingredients = Vec::with_capacity(flavor.ingredients.len());
            for link in flavor.ingredients {
                ingredients.push(IngredientLink::new(link.item_id, link.quantity_per_item)?);
            }
            flavors.push(Flavor::new(FlavorId::new(), flavor.name, ingredients)?);
        }
        out.push(DealProduct::new(
            DealProductId::new(),
            product.name,
            product.quantity,
            flavors,
        )?);
    }
    Ok(out)
}

pub fn build_deal(req: SaveDealRequest) -> DomainResult<Deal> {
    let products = build_deal_parts(req.products)?;
    Deal::new(
        DealId::new(),
        req.name,
        req.price_cents,
        req.image_url,
        products,
        Utc::now(),
    )
}

pub fn build_cart(lines: Vec<CartLineRequest>) -> DomainResult<Cart> {
    let mut cart = Cart::default();
    for line in lines {
        cart.push(CartLine::new(line.deal_id, line.quantity, line.flavors)?);
    }
    Ok(cart)
}

// -------------------------
// Domain -> response JSON
// -------------------------

pub fn deal_to_json(deal: &Deal) -> serde_json::Value {
    json!({
        "id": deal.id().to_string(),
        "name": deal.name(),
        "price_cents": deal.price_cents(),
        "image_url": deal.image_url(),
        "created_at": deal.created_at(),
        "products": deal.products().iter().map(|p| json!({
            "id": p.id().to_string(),
            "name": p.name(),
            "quantity": p.quantity(),
            "flavors": p.flavors().iter().map(|f| json!({
                "id": f.id().to_string(),
                "name": f.name(),
                "ingredients": f.ingredients().iter().map(|l| json!({
                    "item_id": l.item_id.to_string(),
                    "quantity_per_item": l.quantity_per_item,
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}

pub fn item_to_json(item: &InventoryItem) -> serde_json::Value {
    json!({
        "id": item.id().to_string(),
        "name": item.name(),
        "stock": item.stock(),
        "unit": item.unit(),
        "below_zero": item.is_below_zero(),
        "created_at": item.created_at(),
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    json!({
        "id": order.id().to_string(),
        "order_number": order.order_number(),
        "total_cents": order.total_cents(),
        "instructions": order.instructions(),
        "status": order.status().as_str(),
        "cancel_reason": order.cancel_reason(),
        "created_at": order.created_at(),
    })
}

pub fn receipt_to_json(receipt: &CheckoutReceipt) -> serde_json::Value {
    json!({
        "order": order_to_json(&receipt.order),
        "warnings": receipt.warnings.iter().map(|w| json!({
            "item_id": w.item_id.to_string(),
            "item_name": w.item_name,
            "required": w.required,
            "resulting_stock": w.resulting_stock,
        })).collect::<Vec<_>>(),
        "skipped": receipt.skipped,
    })
}

pub fn party_to_json(party: &Party) -> serde_json::Value {
    let status = match party.status() {
        PartyStatus::Active => "active",
        PartyStatus::Suspended => "suspended",
    };
    json!({
        "id": party.id().to_string(),
        "kind": party.kind().as_str(),
        "name": party.name(),
        "contact": party.contact(),
        "status": status,
        "created_at": party.created_at(),
    })
}

pub fn notification_to_json(notification: &Notification) -> serde_json::Value {
    json!({
        "id": notification.id().to_string(),
        "kind": notification.kind().as_str(),
        "title": notification.title(),
        "body": notification.body(),
        "read": notification.is_read(),
        "created_at": notification.created_at(),
    })
}
