//! Shift repository

use super::db_err;
use shared::error::AppResult;
use shared::models::Shift;
use sqlx::SqliteConnection;

const SHIFT_COLS: &str =
    "id, opened_by, opened_at, opening_cash, closed_by, closed_at, closing_cash, note";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Shift>> {
    sqlx::query_as::<_, Shift>(&format!("SELECT {SHIFT_COLS} FROM shift WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_err)
}

/// The single open shift, if any
pub async fn find_open(conn: &mut SqliteConnection) -> AppResult<Option<Shift>> {
    sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLS} FROM shift WHERE closed_at IS NULL LIMIT 1"
    ))
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn insert(conn: &mut SqliteConnection, shift: &Shift) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO shift (id, opened_by, opened_at, opening_cash, closed_by, closed_at, closing_cash, note) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(shift.id)
    .bind(shift.opened_by)
    .bind(shift.opened_at)
    .bind(shift.opening_cash)
    .bind(shift.closed_by)
    .bind(shift.closed_at)
    .bind(shift.closing_cash)
    .bind(&shift.note)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn close(
    conn: &mut SqliteConnection,
    id: i64,
    closed_by: i64,
    closed_at: i64,
    closing_cash: f64,
    note: Option<&str>,
) -> AppResult<u64> {
    let result = sqlx::query(
        "UPDATE shift SET closed_by = ?, closed_at = ?, closing_cash = ?, note = COALESCE(?, note) \
         WHERE id = ? AND closed_at IS NULL",
    )
    .bind(closed_by)
    .bind(closed_at)
    .bind(closing_cash)
    .bind(note)
    .bind(id)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(result.rows_affected())
}

/// Sum of cash payments taken against the shift's orders
pub async fn sum_cash_payments(conn: &mut SqliteConnection, shift_id: i64) -> AppResult<f64> {
    sqlx::query_scalar(
        "SELECT COALESCE(SUM(p.amount), 0.0) FROM payment p \
         JOIN orders o ON o.id = p.order_id \
         WHERE o.shift_id = ? AND p.method = 'CASH'",
    )
    .bind(shift_id)
    .fetch_one(conn)
    .await
    .map_err(db_err)
}

/// Sum of the shift's cashier expenses
pub async fn sum_cashier_expenses(conn: &mut SqliteConnection, shift_id: i64) -> AppResult<f64> {
    sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0.0) FROM expense WHERE shift_id = ? AND kind = 'CASHIER'",
    )
    .bind(shift_id)
    .fetch_one(conn)
    .await
    .map_err(db_err)
}
