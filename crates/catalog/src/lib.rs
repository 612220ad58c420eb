//! `stockroom-catalog` — catalog domain types.
//!
//! Suppliers, storage locations, and products as durable records, plus the
//! validated input types the stores accept. Quantity mutation is *not* part
//! of this crate; stock moves only through the transaction engine.

pub mod location;
pub mod product;
pub mod supplier;

pub use location::{Location, NewLocation};
pub use product::{NewProduct, Product, ProductUpdate};
pub use supplier::{NewSupplier, Supplier};
