//! Postgres-backed catalog store for suppliers, locations, and products.
//!
//! Mutations pre-check uniqueness and referential integrity so the common
//! failure paths surface as typed [`DomainError`]s with business-level
//! messages. The named database constraints remain as a backstop for races
//! between the pre-check and the write; when one fires it is mapped to the
//! same error the pre-check would have produced.

use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use stockroom_catalog::{
    Location, NewLocation, NewProduct, NewSupplier, Product, ProductUpdate, Supplier,
};
use stockroom_core::{DomainError, LocationId, ProductId, SupplierId};

use crate::error::{
    is_foreign_key_violation, is_unique_violation, violated_constraint, StoreError, StoreResult,
};

/// CRUD access to the catalog tables.
///
/// Stock quantities are read through this store but never written; the
/// transaction engine owns every mutation of `stock_quantity`.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pool: PgPool,
}

impl CatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Suppliers ---

    #[instrument(skip(self, supplier), fields(name = %supplier.name()), err)]
    pub async fn create_supplier(&self, supplier: &NewSupplier) -> StoreResult<Supplier> {
        let taken: bool =
            sqlx::query_scalar(r"SELECT EXISTS (SELECT 1 FROM suppliers WHERE name = $1)")
                .bind(supplier.name())
                .fetch_one(&self.pool)
                .await?;
        if taken {
            return Err(DomainError::conflict("supplier name already exists").into());
        }

        let row = sqlx::query(
            r"
            INSERT INTO suppliers (name, contact_email)
            VALUES ($1, $2)
            RETURNING id, name, contact_email
            ",
        )
        .bind(supplier.name())
        .bind(supplier.contact_email())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Domain(DomainError::conflict("supplier name already exists"))
            } else {
                StoreError::Storage(e)
            }
        })?;

        Ok(SupplierRow::from_row(&row)?.into())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_supplier(&self, id: SupplierId) -> StoreResult<Option<Supplier>> {
        let row = sqlx::query(r"SELECT id, name, contact_email FROM suppliers WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(SupplierRow::from_row(&row)?.into())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn list_suppliers(&self) -> StoreResult<Vec<Supplier>> {
        let rows = sqlx::query(r"SELECT id, name, contact_email FROM suppliers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Ok(SupplierRow::from_row(row)?.into()))
            .collect()
    }

    /// Delete a supplier. Products that referenced it are detached, not
    /// deleted.
    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_supplier(&self, id: SupplierId) -> StoreResult<()> {
        let result = sqlx::query(r"DELETE FROM suppliers WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("supplier").into());
        }
        Ok(())
    }

    // --- Locations ---

    #[instrument(
        skip(self, location),
        fields(zone = %location.zone_name(), shelf = location.shelf_number()),
        err
    )]
    pub async fn create_location(&self, location: &NewLocation) -> StoreResult<Location> {
        let taken: bool = sqlx::query_scalar(
            r"SELECT EXISTS (SELECT 1 FROM locations WHERE zone_name = $1 AND shelf_number = $2)",
        )
        .bind(location.zone_name())
        .bind(location.shelf_number())
        .fetch_one(&self.pool)
        .await?;
        if taken {
            return Err(DomainError::conflict("location already exists").into());
        }

        let row = sqlx::query(
            r"
            INSERT INTO locations (zone_name, shelf_number)
            VALUES ($1, $2)
            RETURNING id, zone_name, shelf_number
            ",
        )
        .bind(location.zone_name())
        .bind(location.shelf_number())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Domain(DomainError::conflict("location already exists"))
            } else {
                StoreError::Storage(e)
            }
        })?;

        Ok(LocationRow::from_row(&row)?.into())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_location(&self, id: LocationId) -> StoreResult<Option<Location>> {
        let row = sqlx::query(r"SELECT id, zone_name, shelf_number FROM locations WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(LocationRow::from_row(&row)?.into())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        let rows = sqlx::query(
            r"SELECT id, zone_name, shelf_number FROM locations ORDER BY zone_name, shelf_number",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(LocationRow::from_row(row)?.into()))
            .collect()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_location(&self, id: LocationId) -> StoreResult<()> {
        let result = sqlx::query(r"DELETE FROM locations WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("location").into());
        }
        Ok(())
    }

    // --- Products ---

    #[instrument(skip(self, product), fields(sku = %product.sku()), err)]
    pub async fn create_product(&self, product: &NewProduct) -> StoreResult<Product> {
        let taken: bool =
            sqlx::query_scalar(r"SELECT EXISTS (SELECT 1 FROM products WHERE sku = $1)")
                .bind(product.sku())
                .fetch_one(&self.pool)
                .await?;
        if taken {
            return Err(DomainError::conflict("product SKU already exists").into());
        }

        if let Some(supplier_id) = product.supplier_id() {
            if !self.supplier_exists(supplier_id).await? {
                return Err(DomainError::not_found("supplier").into());
            }
        }
        if let Some(location_id) = product.location_id() {
            if !self.location_exists(location_id).await? {
                return Err(DomainError::not_found("location").into());
            }
        }

        let row = sqlx::query(
            r"
            INSERT INTO products (name, sku, price, stock_quantity, supplier_id, location_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, sku, price, stock_quantity, supplier_id, location_id
            ",
        )
        .bind(product.name())
        .bind(product.sku())
        .bind(product.price())
        .bind(product.stock_quantity())
        .bind(product.supplier_id().map(|id| id.as_i64()))
        .bind(product.location_id().map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_product_write_error)?;

        Ok(ProductRow::from_row(&row)?.into())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            r"
            SELECT id, name, sku, price, stock_quantity, supplier_id, location_id
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(ProductRow::from_row(&row)?.into())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, sku), fields(sku = %sku), err)]
    pub async fn get_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            r"
            SELECT id, name, sku, price, stock_quantity, supplier_id, location_id
            FROM products
            WHERE sku = $1
            ",
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(ProductRow::from_row(&row)?.into())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, sku, price, stock_quantity, supplier_id, location_id
            FROM products
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(ProductRow::from_row(row)?.into()))
            .collect()
    }

    /// Partially update a product. Fields left unset keep their stored
    /// value; SKU and stock quantity cannot be changed through this path.
    #[instrument(skip(self, update), fields(id = %id), err)]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> StoreResult<Product> {
        if let Some(supplier_id) = update.supplier_id() {
            if !self.supplier_exists(supplier_id).await? {
                return Err(DomainError::not_found("supplier").into());
            }
        }
        if let Some(location_id) = update.location_id() {
            if !self.location_exists(location_id).await? {
                return Err(DomainError::not_found("location").into());
            }
        }

        let row = sqlx::query(
            r"
            UPDATE products
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                supplier_id = COALESCE($4, supplier_id),
                location_id = COALESCE($5, location_id)
            WHERE id = $1
            RETURNING id, name, sku, price, stock_quantity, supplier_id, location_id
            ",
        )
        .bind(id.as_i64())
        .bind(update.name())
        .bind(update.price())
        .bind(update.supplier_id().map(|id| id.as_i64()))
        .bind(update.location_id().map(|id| id.as_i64()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_product_write_error)?;

        match row {
            Some(row) => Ok(ProductRow::from_row(&row)?.into()),
            None => Err(DomainError::not_found("product").into()),
        }
    }

    /// Delete a product together with its ledger entries.
    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        let result = sqlx::query(r"DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("product").into());
        }
        Ok(())
    }

    async fn supplier_exists(&self, id: SupplierId) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar(r"SELECT EXISTS (SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(id.as_i64())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn location_exists(&self, id: LocationId) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar(r"SELECT EXISTS (SELECT 1 FROM locations WHERE id = $1)")
                .bind(id.as_i64())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

/// Map constraint violations on product writes back to the error the
/// pre-checks would have raised if the race had not happened.
fn map_product_write_error(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        return StoreError::Domain(DomainError::conflict("product SKU already exists"));
    }
    if is_foreign_key_violation(&err) {
        return match violated_constraint(&err).as_deref() {
            Some("products_supplier_id_fkey") => {
                StoreError::Domain(DomainError::not_found("supplier"))
            }
            Some("products_location_id_fkey") => {
                StoreError::Domain(DomainError::not_found("location"))
            }
            _ => StoreError::Storage(err),
        };
    }
    StoreError::Storage(err)
}

struct SupplierRow {
    id: i64,
    name: String,
    contact_email: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for SupplierRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(SupplierRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            contact_email: row.try_get("contact_email")?,
        })
    }
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier::from_record(SupplierId::new(row.id), row.name, row.contact_email)
    }
}

struct LocationRow {
    id: i64,
    zone_name: String,
    shelf_number: i32,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for LocationRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(LocationRow {
            id: row.try_get("id")?,
            zone_name: row.try_get("zone_name")?,
            shelf_number: row.try_get("shelf_number")?,
        })
    }
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location::from_record(LocationId::new(row.id), row.zone_name, row.shelf_number)
    }
}

pub(crate) struct ProductRow {
    id: i64,
    name: String,
    sku: String,
    price: rust_decimal::Decimal,
    stock_quantity: i32,
    supplier_id: Option<i64>,
    location_id: Option<i64>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            price: row.try_get("price")?,
            stock_quantity: row.try_get("stock_quantity")?,
            supplier_id: row.try_get("supplier_id")?,
            location_id: row.try_get("location_id")?,
        })
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::from_record(
            ProductId::new(row.id),
            row.name,
            row.sku,
            row.price,
            row.stock_quantity,
            row.supplier_id.map(SupplierId::new),
            row.location_id.map(LocationId::new),
        )
    }
}
