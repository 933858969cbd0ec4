//! Store info repository (singleton row)

use super::db_err;
use shared::error::{AppError, AppResult};
use shared::models::StoreInfo;
use sqlx::SqliteConnection;

pub async fn get(conn: &mut SqliteConnection) -> AppResult<StoreInfo> {
    sqlx::query_as::<_, StoreInfo>(
        "SELECT id, name, timezone, business_day_cutoff, currency, cashier_expenses_enabled, cashier_expense_cap \
         FROM store_info WHERE id = 1",
    )
    .fetch_optional(conn)
    .await
    .map_err(db_err)?
    .ok_or_else(|| AppError::internal("store_info row missing"))
}

pub async fn update(conn: &mut SqliteConnection, info: &StoreInfo) -> AppResult<()> {
    sqlx::query(
        "UPDATE store_info SET name = ?, timezone = ?, business_day_cutoff = ?, currency = ?, cashier_expenses_enabled = ?, cashier_expense_cap = ? WHERE id = 1",
    )
    .bind(&info.name)
    .bind(&info.timezone)
    .bind(&info.business_day_cutoff)
    .bind(&info.currency)
    .bind(info.cashier_expenses_enabled)
    .bind(info.cashier_expense_cap)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}
