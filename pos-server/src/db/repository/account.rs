//! Account / ledger repository

use super::db_err;
use shared::error::AppResult;
use shared::models::{
    Account, AccountRelation, AccountTransaction, AccountTransfer, PaymentMethod,
    PaymentMethodAccount,
};
use sqlx::SqliteConnection;

const ACCOUNT_COLS: &str = "id, name, account_type, currency, is_active, scope, account_key, is_locked, shift_id, base_account_id, parent_account_id";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Account>> {
    sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLS} FROM account WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_err)
}

/// Template account (shift_id NULL) by its stable key
pub async fn find_template_by_key(
    conn: &mut SqliteConnection,
    account_key: &str,
) -> AppResult<Option<Account>> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLS} FROM account WHERE account_key = ? AND shift_id IS NULL"
    ))
    .bind(account_key)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

/// Shift-scoped instance of a keyed system account
pub async fn find_shift_account(
    conn: &mut SqliteConnection,
    account_key: &str,
    shift_id: i64,
) -> AppResult<Option<Account>> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLS} FROM account WHERE account_key = ? AND shift_id = ?"
    ))
    .bind(account_key)
    .bind(shift_id)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn insert(conn: &mut SqliteConnection, account: &Account) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO account (id, name, account_type, currency, is_active, scope, account_key, is_locked, shift_id, base_account_id, parent_account_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(account.id)
    .bind(&account.name)
    .bind(&account.account_type)
    .bind(&account.currency)
    .bind(account.is_active)
    .bind(account.scope)
    .bind(&account.account_key)
    .bind(account.is_locked)
    .bind(account.shift_id)
    .bind(account.base_account_id)
    .bind(account.parent_account_id)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, account: &Account) -> AppResult<()> {
    sqlx::query(
        "UPDATE account SET name = ?, account_type = ?, is_active = ?, parent_account_id = ? WHERE id = ?",
    )
    .bind(&account.name)
    .bind(&account.account_type)
    .bind(account.is_active)
    .bind(account.parent_account_id)
    .bind(account.id)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

// ==================== Relations ====================

pub async fn list_relations_from(
    conn: &mut SqliteConnection,
    from_account_id: i64,
) -> AppResult<Vec<AccountRelation>> {
    sqlx::query_as::<_, AccountRelation>(
        "SELECT id, from_account_id, to_account_id, percentage, kind \
         FROM account_relation WHERE from_account_id = ? ORDER BY id",
    )
    .bind(from_account_id)
    .fetch_all(conn)
    .await
    .map_err(db_err)
}

pub async fn delete_relations_from(
    conn: &mut SqliteConnection,
    from_account_id: i64,
) -> AppResult<()> {
    sqlx::query("DELETE FROM account_relation WHERE from_account_id = ?")
        .bind(from_account_id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub async fn insert_relation(
    conn: &mut SqliteConnection,
    relation: &AccountRelation,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO account_relation (id, from_account_id, to_account_id, percentage, kind) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(relation.id)
    .bind(relation.from_account_id)
    .bind(relation.to_account_id)
    .bind(relation.percentage)
    .bind(&relation.kind)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

// ==================== Transactions / transfers ====================

pub async fn insert_transaction(
    conn: &mut SqliteConnection,
    tx: &AccountTransaction,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO account_transaction (id, account_id, direction, amount, source_type, source_id, note, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(tx.id)
    .bind(tx.account_id)
    .bind(tx.direction)
    .bind(tx.amount)
    .bind(&tx.source_type)
    .bind(tx.source_id)
    .bind(&tx.note)
    .bind(tx.created_by)
    .bind(tx.created_at)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn list_transactions_by_source(
    conn: &mut SqliteConnection,
    source_type: &str,
    source_id: i64,
) -> AppResult<Vec<AccountTransaction>> {
    sqlx::query_as::<_, AccountTransaction>(
        "SELECT id, account_id, direction, amount, source_type, source_id, note, created_by, created_at \
         FROM account_transaction WHERE source_type = ? AND source_id = ? ORDER BY id",
    )
    .bind(source_type)
    .bind(source_id)
    .fetch_all(conn)
    .await
    .map_err(db_err)
}

/// Raw directional sums; callers combine them with Decimal arithmetic
pub async fn direction_sums(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> AppResult<(f64, f64)> {
    let row: (f64, f64) = sqlx::query_as(
        "SELECT \
           COALESCE(SUM(CASE WHEN direction = 'IN' THEN amount ELSE 0.0 END), 0.0), \
           COALESCE(SUM(CASE WHEN direction = 'OUT' THEN amount ELSE 0.0 END), 0.0) \
         FROM account_transaction WHERE account_id = ?",
    )
    .bind(account_id)
    .fetch_one(conn)
    .await
    .map_err(db_err)?;
    Ok(row)
}

pub async fn insert_transfer(
    conn: &mut SqliteConnection,
    transfer: &AccountTransfer,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO account_transfer (id, from_account_id, to_account_id, amount, note, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(transfer.id)
    .bind(transfer.from_account_id)
    .bind(transfer.to_account_id)
    .bind(transfer.amount)
    .bind(&transfer.note)
    .bind(transfer.created_by)
    .bind(transfer.created_at)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

// ==================== Payment method routing ====================

pub async fn find_method_account(
    conn: &mut SqliteConnection,
    method: PaymentMethod,
) -> AppResult<Option<PaymentMethodAccount>> {
    sqlx::query_as::<_, PaymentMethodAccount>(
        "SELECT method, account_id FROM payment_method_account WHERE method = ?",
    )
    .bind(method)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn upsert_method_account(
    conn: &mut SqliteConnection,
    method: PaymentMethod,
    account_id: i64,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO payment_method_account (method, account_id) VALUES (?, ?) \
         ON CONFLICT(method) DO UPDATE SET account_id = excluded.account_id",
    )
    .bind(method)
    .bind(account_id)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}
