//! Menu lookup models (read-only for the engine)

use serde::{Deserialize, Serialize};

/// Menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
    /// Kitchen printer the item routes to
    pub printer_id: Option<i64>,
}

/// Customization group attached to a menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuOptionGroup {
    pub id: i64,
    pub menu_item_id: i64,
    pub name: String,
}

/// Selectable option inside a group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuOption {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub price_delta: f64,
}
