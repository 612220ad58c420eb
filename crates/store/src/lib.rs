//! `stockroom-store` — Postgres persistence for the warehouse.
//!
//! Everything that touches the database lives here: schema provisioning,
//! the catalog and user stores, the append-only movement ledger, the
//! transaction engine that keeps `stock_quantity` and the ledger in step,
//! and the report queries.
//!
//! There is no global connection state. Each store is constructed from a
//! [`sqlx::PgPool`] built in `main` and dropped at shutdown; sharing the
//! pool between stores is a cheap clone.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod reports;
pub mod schema;
pub mod users;

pub use catalog::CatalogStore;
pub use engine::{Adjusted, InventoryEngine};
pub use error::{StoreError, StoreResult};
pub use ledger::{LedgerRecord, LedgerStream, MovementLedger};
pub use reports::{ReportGenerator, ReportRow, ReportStream, SupplierValuation};
pub use users::UserStore;
