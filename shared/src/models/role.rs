//! Operator role model

use serde::{Deserialize, Serialize};

/// Ordered operator role used for permission checks
///
/// Higher ranks include the permissions of lower ones. Discount edits and
/// voids require `Cashier` or above; reopening a settled order requires
/// `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    Waiter,
    Cashier,
    Manager,
    Admin,
}

impl Role {
    /// Numeric rank, higher means more privileged
    pub fn rank(&self) -> u8 {
        match self {
            Self::Waiter => 0,
            Self::Cashier => 1,
            Self::Manager => 2,
            Self::Admin => 3,
        }
    }

    /// Whether this role meets or exceeds `required`
    pub fn at_least(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}
