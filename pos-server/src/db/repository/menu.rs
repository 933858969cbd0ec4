//! Menu lookup repository (read-only for the engine)

use super::db_err;
use shared::error::AppResult;
use shared::models::{MenuItem, MenuOption, MenuOptionGroup};
use sqlx::SqliteConnection;

pub async fn find_item(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<MenuItem>> {
    sqlx::query_as::<_, MenuItem>(
        "SELECT id, name, price, is_active, printer_id FROM menu_item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn find_group(
    conn: &mut SqliteConnection,
    group_id: i64,
) -> AppResult<Option<MenuOptionGroup>> {
    sqlx::query_as::<_, MenuOptionGroup>(
        "SELECT id, menu_item_id, name FROM menu_option_group WHERE id = ?",
    )
    .bind(group_id)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn find_option(
    conn: &mut SqliteConnection,
    group_id: i64,
    option_id: i64,
) -> AppResult<Option<MenuOption>> {
    sqlx::query_as::<_, MenuOption>(
        "SELECT id, group_id, name, price_delta FROM menu_option WHERE id = ? AND group_id = ?",
    )
    .bind(option_id)
    .bind(group_id)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}
