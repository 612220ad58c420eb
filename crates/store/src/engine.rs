//! Stock transaction engine.
//!
//! [`InventoryEngine::adjust_stock`] is the only write path for
//! `stock_quantity` and the only producer of ledger entries. A single
//! transaction locks the product row, applies the movement, writes the new
//! quantity, and appends the matching ledger entry; it commits only if
//! every step succeeded, so stock level and ledger never diverge.

use sqlx::{FromRow, PgPool};
use tracing::instrument;

use stockroom_catalog::Product;
use stockroom_core::{DomainError, ProductId, UserId};
use stockroom_inventory::{LedgerEntry, Movement};

use crate::catalog::ProductRow;
use crate::error::StoreResult;
use crate::ledger::MovementLedger;

/// Outcome of a committed adjustment: the product with its new quantity,
/// and the ledger entry recording the movement.
#[derive(Debug, Clone)]
pub struct Adjusted {
    pub product: Product,
    pub entry: LedgerEntry,
}

/// Serialized read-modify-write path for stock quantities.
#[derive(Debug, Clone)]
pub struct InventoryEngine {
    pool: PgPool,
}

impl InventoryEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically move stock in or out of a product.
    ///
    /// `SELECT ... FOR UPDATE` serializes concurrent adjustments of the
    /// same product; adjustments of different products proceed
    /// independently. Insufficient stock, an unknown product, or an unknown
    /// user roll the transaction back with no partial effect.
    #[instrument(
        skip(self),
        fields(
            product_id = %product_id,
            user_id = %user_id,
            direction = %movement.direction(),
            amount = movement.amount(),
        ),
        err
    )]
    pub async fn adjust_stock(
        &self,
        product_id: ProductId,
        user_id: UserId,
        movement: Movement,
    ) -> StoreResult<Adjusted> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r"
            SELECT id, name, sku, price, stock_quantity, supplier_id, location_id
            FROM products
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(product_id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(DomainError::not_found("product").into());
        };
        let current: Product = ProductRow::from_row(&row)?.into();

        let new_quantity = match movement.apply_to(current.stock_quantity()) {
            Ok(quantity) => quantity,
            Err(err) => {
                tx.rollback().await?;
                return Err(err.into());
            }
        };

        let updated = sqlx::query(
            r"
            UPDATE products
            SET stock_quantity = $2
            WHERE id = $1
            RETURNING id, name, sku, price, stock_quantity, supplier_id, location_id
            ",
        )
        .bind(product_id.as_i64())
        .bind(new_quantity)
        .fetch_one(&mut *tx)
        .await?;
        let product: Product = ProductRow::from_row(&updated)?.into();

        let entry = MovementLedger::append(&mut tx, product_id, user_id, movement).await?;

        tx.commit().await?;

        Ok(Adjusted { product, entry })
    }
}
