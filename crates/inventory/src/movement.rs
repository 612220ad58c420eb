use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult};

/// Direction of a stock movement. Determines the sign of the recorded
/// quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(Direction::In),
            "OUT" => Ok(Direction::Out),
            other => Err(DomainError::validation(format!(
                "direction must be IN or OUT, got {other:?}"
            ))),
        }
    }
}

/// A validated stock adjustment request: a strictly positive amount moved
/// in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    direction: Direction,
    amount: i32,
}

impl Movement {
    pub fn new(direction: Direction, amount: i32) -> DomainResult<Self> {
        if amount < 1 {
            return Err(DomainError::validation("amount must be at least 1"));
        }
        Ok(Self { direction, amount })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    /// Signed change recorded on the ledger: `+amount` for IN, `-amount`
    /// for OUT. Net-sum queries over the ledger rely on this sign.
    pub fn signed_change(&self) -> i32 {
        match self.direction {
            Direction::In => self.amount,
            Direction::Out => -self.amount,
        }
    }

    /// Compute the quantity after applying this movement to `current`.
    ///
    /// An OUT movement larger than `current` fails with
    /// [`DomainError::InsufficientStock`] and must leave state untouched;
    /// the caller decides what "state" means (the engine runs this inside
    /// its transaction before writing anything).
    pub fn apply_to(&self, current: i32) -> DomainResult<i32> {
        match self.direction {
            Direction::In => current
                .checked_add(self.amount)
                .ok_or_else(|| DomainError::validation("stock quantity overflow")),
            Direction::Out => {
                if self.amount > current {
                    Err(DomainError::insufficient_stock(self.amount, current))
                } else {
                    Ok(current - self.amount)
                }
            }
        }
    }
}
