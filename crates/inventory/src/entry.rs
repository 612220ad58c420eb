use chrono::{DateTime, Utc};

use stockroom_core::{EntryId, ProductId, UserId};

use crate::movement::Direction;

/// One immutable ledger record: who moved how much of what, and when.
///
/// Entries are never updated or deleted; the only removal path is the
/// cascade when their product is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    id: EntryId,
    action: Direction,
    quantity_change: i32,
    created_at: DateTime<Utc>,
    user_id: UserId,
    product_id: ProductId,
}

impl LedgerEntry {
    /// Rehydrate an entry from stored fields.
    pub fn from_record(
        id: EntryId,
        action: Direction,
        quantity_change: i32,
        created_at: DateTime<Utc>,
        user_id: UserId,
        product_id: ProductId,
    ) -> Self {
        Self {
            id,
            action,
            quantity_change,
            created_at,
            user_id,
            product_id,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn action(&self) -> Direction {
        self.action
    }

    pub fn quantity_change(&self) -> i32 {
        self.quantity_change
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }
}
