//! Inventory movement domain module.
//!
//! This crate contains the business rules for stock movements, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage). The
//! transaction engine in the store crate drives these rules inside a
//! database transaction.

pub mod entry;
pub mod movement;

pub use entry::LedgerEntry;
pub use movement::{Direction, Movement};
