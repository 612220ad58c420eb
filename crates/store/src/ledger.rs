//! Append-only movement ledger.

use std::pin::Pin;

use chrono::{DateTime, Utc};
use futures_core::Stream;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tokio_stream::StreamExt;

use stockroom_core::{DomainError, EntryId, ProductId, UserId};
use stockroom_inventory::{Direction, LedgerEntry, Movement};

use crate::error::{is_foreign_key_violation, violated_constraint, StoreError, StoreResult};

/// One ledger entry joined with the names of the user and product it
/// references.
#[derive(Debug, Clone)]
pub struct LedgerRecord {
    pub entry: LedgerEntry,
    pub user_login: String,
    pub product_name: String,
}

/// One-shot pull stream over the full ledger in insertion order.
pub type LedgerStream = Pin<Box<dyn Stream<Item = StoreResult<LedgerRecord>> + Send>>;

/// The audit trail behind every stock mutation.
///
/// `warehouse_logs` is append-only: the single writer is
/// [`MovementLedger::append`], which requires an open transaction so an
/// entry can only be committed together with the stock mutation it records.
/// Nothing updates or deletes entries; rows disappear only when their
/// product is deleted and the cascade takes them along.
#[derive(Debug, Clone)]
pub struct MovementLedger {
    pool: PgPool,
}

impl MovementLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one entry inside the caller's transaction.
    ///
    /// `quantity_change` is stored signed, positive for IN and negative for
    /// OUT, so the net sum over a product's entries tracks its stock level.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        product_id: ProductId,
        user_id: UserId,
        movement: Movement,
    ) -> StoreResult<LedgerEntry> {
        let row = sqlx::query(
            r"
            INSERT INTO warehouse_logs (action_type, quantity_change, user_id, product_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, action_type, quantity_change, created_at, user_id, product_id
            ",
        )
        .bind(movement.direction().as_str())
        .bind(movement.signed_change())
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_append_error)?;

        EntryRow::from_row(&row)?.into_entry()
    }

    /// Stream every ledger entry, oldest first, joined with product and
    /// user identity.
    ///
    /// The stream is lazy: rows come off a server-side cursor as the caller
    /// pulls, so memory stays bounded regardless of ledger size. One pooled
    /// connection is held for the duration and released when the stream is
    /// dropped, consumed or not. Entries committed after the read starts
    /// may or may not appear, but a partially committed adjustment never
    /// does.
    pub fn stream_all(&self) -> LedgerStream {
        let pool = self.pool.clone();

        Box::pin(async_stream::stream! {
            let mut conn = match pool.acquire().await {
                Ok(conn) => conn,
                Err(error) => {
                    yield Err(StoreError::Storage(error));
                    return;
                }
            };

            let mut rows = sqlx::query(
                r"
                SELECT w.id, w.action_type, w.quantity_change, w.created_at,
                       w.user_id, w.product_id,
                       u.login AS user_login, p.name AS product_name
                FROM warehouse_logs w
                JOIN users u ON u.id = w.user_id
                JOIN products p ON p.id = w.product_id
                ORDER BY w.id
                ",
            )
            .fetch(&mut *conn);

            while let Some(result) = rows.next().await {
                let row = match result {
                    Ok(row) => row,
                    Err(error) => {
                        yield Err(StoreError::Storage(error));
                        return;
                    }
                };
                yield record_from_row(&row);
            }
        })
    }
}

fn record_from_row(row: &PgRow) -> StoreResult<LedgerRecord> {
    let entry = EntryRow::from_row(row)?.into_entry()?;
    let user_login: String = row.try_get("user_login")?;
    let product_name: String = row.try_get("product_name")?;
    Ok(LedgerRecord {
        entry,
        user_login,
        product_name,
    })
}

fn map_append_error(err: sqlx::Error) -> StoreError {
    if is_foreign_key_violation(&err) {
        return match violated_constraint(&err).as_deref() {
            Some("warehouse_logs_user_id_fkey") => StoreError::Domain(DomainError::not_found("user")),
            Some("warehouse_logs_product_id_fkey") => {
                StoreError::Domain(DomainError::not_found("product"))
            }
            _ => StoreError::Storage(err),
        };
    }
    StoreError::Storage(err)
}

struct EntryRow {
    id: i64,
    action_type: String,
    quantity_change: i32,
    created_at: DateTime<Utc>,
    user_id: i64,
    product_id: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for EntryRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(EntryRow {
            id: row.try_get("id")?,
            action_type: row.try_get("action_type")?,
            quantity_change: row.try_get("quantity_change")?,
            created_at: row.try_get("created_at")?,
            user_id: row.try_get("user_id")?,
            product_id: row.try_get("product_id")?,
        })
    }
}

impl EntryRow {
    fn into_entry(self) -> StoreResult<LedgerEntry> {
        let action: Direction = self.action_type.parse()?;
        Ok(LedgerEntry::from_record(
            EntryId::new(self.id),
            action,
            self.quantity_change,
            self.created_at,
            UserId::new(self.user_id),
            ProductId::new(self.product_id),
        ))
    }
}
