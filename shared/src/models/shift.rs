//! Shift model

use serde::{Deserialize, Serialize};

/// Shift record; at most one row with `closed_at IS NULL` at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub opened_by: i64,
    pub opened_at: i64,
    /// Cash counted into the drawer at open
    pub opening_cash: f64,
    pub closed_by: Option<i64>,
    pub closed_at: Option<i64>,
    /// Cash counted at close
    pub closing_cash: Option<f64>,
    pub note: Option<String>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Open shift payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShiftOpen {
    #[serde(default)]
    pub opening_cash: f64,
    pub note: Option<String>,
}

/// Close shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftClose {
    /// Actual cash counted
    pub closing_cash: f64,
    pub note: Option<String>,
}

/// Shift with computed cash reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSnapshot {
    #[serde(flatten)]
    pub shift: Shift,
    /// opening cash + cash payments - cashier cash expenses
    pub expected_cash: f64,
    /// closing_cash - expected_cash, present once closed
    pub variance: Option<f64>,
}
