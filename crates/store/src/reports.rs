//! Read-only reports over the catalog and the ledger.

use std::pin::Pin;

use chrono::{DateTime, Utc};
use futures_core::Stream;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Row};
use tokio_stream::StreamExt;
use tracing::instrument;

use stockroom_inventory::Direction;

use crate::error::StoreResult;
use crate::ledger::MovementLedger;

/// One line of the inventory report: a ledger entry projected to the
/// fields a reader needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub product: String,
    pub quantity_change: i32,
    pub action_type: Direction,
}

/// One-shot pull stream over the inventory report, oldest entry first.
pub type ReportStream = Pin<Box<dyn Stream<Item = StoreResult<ReportRow>> + Send>>;

/// Stock valuation for one supplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierValuation {
    pub supplier_name: String,
    pub unique_products: i64,
    pub total_units: i64,
    pub total_valuation: Decimal,
}

#[derive(Debug, Clone)]
pub struct ReportGenerator {
    pool: PgPool,
}

impl ReportGenerator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The full movement ledger in insertion order, one row per entry.
    ///
    /// Carries the laziness and read consistency of
    /// [`MovementLedger::stream_all`]: memory stays bounded, the stream
    /// never blocks concurrent adjustments, and a partially committed
    /// adjustment is never visible.
    pub fn inventory_report(&self) -> ReportStream {
        let ledger = MovementLedger::new(self.pool.clone());

        Box::pin(async_stream::stream! {
            let mut records = ledger.stream_all();
            while let Some(result) = records.next().await {
                match result {
                    Ok(record) => {
                        yield Ok(ReportRow {
                            timestamp: record.entry.created_at(),
                            user: record.user_login,
                            product: record.product_name,
                            quantity_change: record.entry.quantity_change(),
                            action_type: record.entry.action(),
                        });
                    }
                    Err(error) => {
                        yield Err(error);
                        return;
                    }
                }
            }
        })
    }

    /// Stock valuation per supplier, most valuable first.
    ///
    /// One aggregate query, so every row reflects the same snapshot.
    /// Suppliers with no stock on hand are left out entirely.
    #[instrument(skip(self), err)]
    pub async fn supplier_valuation(&self) -> StoreResult<Vec<SupplierValuation>> {
        let rows = sqlx::query(
            r"
            SELECT s.name AS supplier_name,
                   COUNT(p.id) AS unique_products,
                   SUM(p.stock_quantity) AS total_units,
                   SUM(p.price * p.stock_quantity) AS total_valuation
            FROM suppliers s
            LEFT JOIN products p ON s.id = p.supplier_id
            GROUP BY s.name
            HAVING SUM(p.stock_quantity) > 0
            ORDER BY total_valuation DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(SupplierValuation {
                    supplier_name: row.try_get("supplier_name")?,
                    unique_products: row.try_get("unique_products")?,
                    total_units: row.try_get("total_units")?,
                    total_valuation: row.try_get("total_valuation")?,
                })
            })
            .collect()
    }
}
