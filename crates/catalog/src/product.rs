use rust_decimal::Decimal;

use stockroom_core::{DomainError, DomainResult, LocationId, ProductId, SupplierId};

/// A product on record.
///
/// `stock_quantity` is never written through this crate; the transaction
/// engine is the only mutation path for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    sku: String,
    price: Decimal,
    stock_quantity: i32,
    supplier_id: Option<SupplierId>,
    location_id: Option<LocationId>,
}

impl Product {
    /// Rehydrate a product from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_record(
        id: ProductId,
        name: String,
        sku: String,
        price: Decimal,
        stock_quantity: i32,
        supplier_id: Option<SupplierId>,
        location_id: Option<LocationId>,
    ) -> Self {
        Self {
            id,
            name,
            sku,
            price,
            stock_quantity,
            supplier_id,
            location_id,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock_quantity(&self) -> i32 {
        self.stock_quantity
    }

    pub fn supplier_id(&self) -> Option<SupplierId> {
        self.supplier_id
    }

    pub fn location_id(&self) -> Option<LocationId> {
        self.location_id
    }
}

/// Validated input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    name: String,
    sku: String,
    price: Decimal,
    stock_quantity: i32,
    supplier_id: Option<SupplierId>,
    location_id: Option<LocationId>,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: Decimal,
        stock_quantity: i32,
        supplier_id: Option<SupplierId>,
        location_id: Option<LocationId>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        let sku = sku.into().trim().to_string();
        if sku.chars().count() < 3 {
            return Err(DomainError::validation("SKU must be at least 3 characters"));
        }
        if price < Decimal::ZERO {
            return Err(DomainError::validation("price cannot be negative"));
        }
        if stock_quantity < 0 {
            return Err(DomainError::validation("stock quantity cannot be negative"));
        }
        Ok(Self {
            name,
            sku,
            price,
            stock_quantity,
            supplier_id,
            location_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock_quantity(&self) -> i32 {
        self.stock_quantity
    }

    pub fn supplier_id(&self) -> Option<SupplierId> {
        self.supplier_id
    }

    pub fn location_id(&self) -> Option<LocationId> {
        self.location_id
    }
}

/// Partial update for a product.
///
/// SKU is immutable after creation and quantity is reserved for the
/// transaction engine, so neither appears here. `None` leaves a field
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    name: Option<String>,
    price: Option<Decimal>,
    supplier_id: Option<SupplierId>,
    location_id: Option<LocationId>,
}

impl ProductUpdate {
    pub fn new(
        name: Option<String>,
        price: Option<Decimal>,
        supplier_id: Option<SupplierId>,
        location_id: Option<LocationId>,
    ) -> DomainResult<Self> {
        let name = match name {
            Some(raw) => {
                let trimmed = raw.trim().to_string();
                if trimmed.is_empty() {
                    return Err(DomainError::validation("product name cannot be empty"));
                }
                Some(trimmed)
            }
            None => None,
        };
        if let Some(price) = price {
            if price < Decimal::ZERO {
                return Err(DomainError::validation("price cannot be negative"));
            }
        }
        Ok(Self {
            name,
            price,
            supplier_id,
            location_id,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn supplier_id(&self) -> Option<SupplierId> {
        self.supplier_id
    }

    pub fn location_id(&self) -> Option<LocationId> {
        self.location_id
    }
}
