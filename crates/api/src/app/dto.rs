use rust_decimal::Decimal;
use serde::Deserialize;

use stockroom_auth::User;
use stockroom_catalog::{Location, Product, Supplier};
use stockroom_inventory::{Direction, LedgerEntry};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub zone_name: String,
    pub shelf_number: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i32,
    pub supplier_id: Option<i64>,
    pub location_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub supplier_id: Option<i64>,
    pub location_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub amount: i32,
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub login: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn supplier_to_json(supplier: &Supplier) -> serde_json::Value {
    serde_json::json!({
        "id": supplier.id().as_i64(),
        "name": supplier.name(),
        "contact_email": supplier.contact_email(),
    })
}

pub fn location_to_json(location: &Location) -> serde_json::Value {
    serde_json::json!({
        "id": location.id().as_i64(),
        "zone_name": location.zone_name(),
        "shelf_number": location.shelf_number(),
    })
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id().as_i64(),
        "name": product.name(),
        "sku": product.sku(),
        "price": product.price(),
        "stock_quantity": product.stock_quantity(),
        "supplier_id": product.supplier_id().map(|id| id.as_i64()),
        "location_id": product.location_id().map(|id| id.as_i64()),
    })
}

pub fn entry_to_json(entry: &LedgerEntry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id().as_i64(),
        "action_type": entry.action(),
        "quantity_change": entry.quantity_change(),
        "created_at": entry.created_at(),
        "user_id": entry.user_id().as_i64(),
        "product_id": entry.product_id().as_i64(),
    })
}

pub fn user_to_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id().as_i64(),
        "login": user.login(),
        "is_admin": user.is_admin(),
    })
}
