//! Ledger account models

use serde::{Deserialize, Serialize};

use super::order::PaymentMethod;

/// Account scope
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AccountScope {
    /// User-created account, freely editable
    #[default]
    Custom,
    /// Engine-provisioned account (shift cash drawers, base templates)
    System,
}

/// Ledger entry direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// The matching opposite leg direction
    pub fn opposite(&self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

/// Account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Account {
    pub id: i64,
    pub name: String,
    /// Free-form type label ("CASH", "BANK", ...)
    pub account_type: String,
    pub currency: String,
    pub is_active: bool,
    pub scope: AccountScope,
    /// Stable key for system accounts (e.g. "vault:cash")
    pub account_key: Option<String>,
    /// Locked accounts reject manual edits
    pub is_locked: bool,
    /// Owning shift for shift-scoped system accounts
    pub shift_id: Option<i64>,
    /// Base template this shift account was instantiated from
    pub base_account_id: Option<i64>,
    pub parent_account_id: Option<i64>,
}

impl Account {
    /// Shift-managed accounts are only written by the shift lifecycle
    pub fn is_shift_managed(&self) -> bool {
        self.shift_id.is_some()
    }
}

/// Percentage routing rule between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AccountRelation {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// 0 < percentage <= 100; sums per (from, kind) stay <= 100
    pub percentage: f64,
    /// Relation kind label ("tax", "royalty", ...)
    pub kind: String,
}

/// Append-only ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AccountTransaction {
    pub id: i64,
    pub account_id: i64,
    pub direction: Direction,
    pub amount: f64,
    /// Origin tag: "manual", "transfer", "payment", "expense",
    /// "shift_open", "allocation", "reversal"
    pub source_type: String,
    /// Row id of the originating record, when one exists
    pub source_id: Option<i64>,
    pub note: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
}

/// Transfer audit row; always paired with a matched out/in entry pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AccountTransfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: f64,
    pub note: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
}

/// Payment-method routing row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentMethodAccount {
    pub method: PaymentMethod,
    pub account_id: i64,
}

// ==================== Operation inputs ====================

/// Create account payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub parent_account_id: Option<i64>,
}

/// Update account payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub account_type: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default, with = "crate::models::double_option")]
    pub parent_account_id: Option<Option<i64>>,
}

/// One entry of a batch relation replace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEntry {
    pub to_account_id: i64,
    pub percentage: f64,
    pub kind: String,
}

/// Single-leg deposit/withdraw payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryCreate {
    pub account_id: i64,
    pub amount: f64,
    pub note: Option<String>,
}

/// Transfer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCreate {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: f64,
    pub note: Option<String>,
}

// ==================== Snapshots ====================

/// Account with its computed balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    #[serde(flatten)]
    pub account: Account,
    /// Sum of IN entries minus sum of OUT entries
    pub balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::In.opposite(), Direction::Out);
        assert_eq!(Direction::Out.opposite(), Direction::In);
    }

    #[test]
    fn test_direction_serde() {
        assert_eq!(serde_json::to_string(&Direction::In).unwrap(), "\"IN\"");
        let d: Direction = serde_json::from_str("\"OUT\"").unwrap();
        assert_eq!(d, Direction::Out);
    }

    #[test]
    fn test_shift_managed() {
        let mut account = Account {
            id: 1,
            name: "Drawer".into(),
            account_type: "CASH".into(),
            currency: "EUR".into(),
            is_active: true,
            scope: AccountScope::System,
            account_key: Some("shift:cash".into()),
            is_locked: true,
            shift_id: Some(7),
            base_account_id: Some(2),
            parent_account_id: None,
        };
        assert!(account.is_shift_managed());
        account.shift_id = None;
        assert!(!account.is_shift_managed());
    }
}
