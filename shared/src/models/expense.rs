//! Expense and linkage models

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Expense kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ExpenseKind {
    /// Money leaving an account
    Expense,
    /// Money entering an account
    Receipt,
    /// Petty cash taken from the open shift's drawer
    Cashier,
}

/// Expense record; ledger effect lives in `account_transaction` rows
/// back-referencing this row via source_type/source_id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub kind: ExpenseKind,
    pub amount: f64,
    /// Account the money moved out of (or into, for receipts)
    pub account_id: i64,
    pub supplier_id: Option<i64>,
    pub employee_id: Option<i64>,
    /// Owning shift, set for CASHIER expenses
    pub shift_id: Option<i64>,
    pub note: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
}

/// Supplier linkage row for expense account resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    /// Default account for this supplier's expenses
    pub account_id: Option<i64>,
    pub is_active: bool,
}

/// Employee row; carries the ordered role for permission checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub role: Role,
    /// Default account for this employee's expenses (advances, payouts)
    pub account_id: Option<i64>,
    pub is_active: bool,
}

// ==================== Operation inputs ====================

/// Create expense/receipt payload
///
/// Exactly one of `account_id`, `supplier_id`, `employee_id` must be set;
/// supplier and employee resolve to their linked account.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExpenseCreate {
    pub amount: f64,
    pub account_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub note: Option<String>,
}

/// Create cashier expense payload (drawn from the open shift's cash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashierExpenseCreate {
    pub amount: f64,
    pub note: Option<String>,
}

/// Update cashier expense payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CashierExpensePatch {
    pub amount: Option<f64>,
    #[serde(default, with = "crate::models::double_option")]
    pub note: Option<Option<String>>,
}
