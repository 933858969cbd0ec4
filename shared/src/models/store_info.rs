//! Store info model

use serde::{Deserialize, Serialize};

/// Store configuration (singleton row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StoreInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// IANA timezone name (e.g. "Europe/Madrid")
    pub timezone: String,
    /// Business day cutoff (HH:MM); orders before this roll to the
    /// previous business date
    #[serde(default = "default_cutoff")]
    pub business_day_cutoff: String,
    /// Ledger currency code
    pub currency: String,
    pub cashier_expenses_enabled: bool,
    /// Per-shift cap on cashier expenses; None means uncapped
    pub cashier_expense_cap: Option<f64>,
}

fn default_cutoff() -> String {
    "06:00".to_string()
}

/// Update store info payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreInfoPatch {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub business_day_cutoff: Option<String>,
    pub currency: Option<String>,
    pub cashier_expenses_enabled: Option<bool>,
    #[serde(default, with = "crate::models::double_option")]
    pub cashier_expense_cap: Option<Option<f64>>,
}
