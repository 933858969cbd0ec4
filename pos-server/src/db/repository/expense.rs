//! Expense repository

use super::db_err;
use shared::error::AppResult;
use shared::models::{Employee, Expense, Supplier};
use sqlx::SqliteConnection;

const EXPENSE_COLS: &str =
    "id, kind, amount, account_id, supplier_id, employee_id, shift_id, note, created_by, created_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Expense>> {
    sqlx::query_as::<_, Expense>(&format!("SELECT {EXPENSE_COLS} FROM expense WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_err)
}

pub async fn insert(conn: &mut SqliteConnection, expense: &Expense) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO expense (id, kind, amount, account_id, supplier_id, employee_id, shift_id, note, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(expense.id)
    .bind(expense.kind)
    .bind(expense.amount)
    .bind(expense.account_id)
    .bind(expense.supplier_id)
    .bind(expense.employee_id)
    .bind(expense.shift_id)
    .bind(&expense.note)
    .bind(expense.created_by)
    .bind(expense.created_at)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn update_amount_note(
    conn: &mut SqliteConnection,
    id: i64,
    amount: f64,
    note: &Option<String>,
) -> AppResult<()> {
    sqlx::query("UPDATE expense SET amount = ?, note = ? WHERE id = ?")
        .bind(amount)
        .bind(note)
        .bind(id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM expense WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub async fn find_supplier(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Supplier>> {
    sqlx::query_as::<_, Supplier>(
        "SELECT id, name, account_id, is_active FROM supplier WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn find_employee(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Employee>> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, name, role, account_id, is_active FROM employee WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}
