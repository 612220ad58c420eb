//! Store error model.
//!
//! Two layers: business failures surfaced by the stores (missing reference,
//! duplicate key, insufficient stock) stay typed as
//! [`DomainError`](stockroom_core::DomainError); everything else from the
//! persistence layer is a storage fault.
//!
//! ## Error Mapping
//!
//! The stores pre-check uniqueness and foreign keys so business failures
//! carry business-level messages. Database constraint violations remain as a
//! backstop for races between the pre-check and the write:
//!
//! | PostgreSQL Error Code | Meaning | Mapped at call site to |
//! |-----------------------|---------|------------------------|
//! | `23505` | Unique violation | `DomainError::Conflict` |
//! | `23503` | Foreign key violation | `NotFound` (missing parent on insert) or `Conflict` (children block a delete) |
//! | other | Transport, syntax, pool | `StoreError::Storage` |

use thiserror::Error;

use stockroom_core::DomainError;

/// Result type used across the store layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A business rule failed; the caller can act on this.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The persistence layer itself failed.
    #[error("storage fault: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    /// The business-level error, if this is one.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(err) => Some(err),
            StoreError::Storage(_) => None,
        }
    }
}

/// Check if an error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

/// Check if an error is a foreign key violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23503";
        }
    }
    false
}

/// Name of the constraint a database error violated, if any.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.constraint().map(str::to_string);
    }
    None
}
