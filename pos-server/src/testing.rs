//! Shared test fixtures
//!
//! In-memory database plus minimal seed rows the operation tests lean on.

use crate::core::{OpContext, Operator};
use crate::db::DbService;
use shared::models::{Role, ShiftOpen};
use sqlx::SqliteConnection;

pub async fn test_db() -> DbService {
    DbService::open_in_memory().await.expect("in-memory db")
}

pub fn test_ctx(role: Role) -> OpContext {
    OpContext::now(Operator { id: 1, role })
}

/// Open a shift with zero opening cash, returning its id
pub async fn open_test_shift(conn: &mut SqliteConnection) -> i64 {
    open_test_shift_with(conn, 0.0).await
}

/// Open a shift with the given opening cash, returning its id
pub async fn open_test_shift_with(conn: &mut SqliteConnection, opening_cash: f64) -> i64 {
    let ctx = test_ctx(Role::Manager);
    let snap = crate::shifts::open_shift(
        conn,
        &ctx,
        ShiftOpen {
            opening_cash,
            note: None,
        },
    )
    .await
    .expect("open shift");
    snap.shift.id
}

/// Seed a menu item
pub async fn seed_menu_item(conn: &mut SqliteConnection, id: i64, name: &str, price: f64) {
    sqlx::query(
        "INSERT INTO menu_item (id, name, price, is_active, printer_id) VALUES (?, ?, ?, 1, NULL)",
    )
    .bind(id)
    .bind(name)
    .bind(price)
    .execute(&mut *conn)
    .await
    .expect("seed menu item");
}

/// Seed an option group and one option under a menu item
pub async fn seed_menu_option(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    group_id: i64,
    option_id: i64,
    price_delta: f64,
) {
    sqlx::query("INSERT OR IGNORE INTO menu_option_group (id, menu_item_id, name) VALUES (?, ?, 'Extras')")
        .bind(group_id)
        .bind(menu_item_id)
        .execute(&mut *conn)
        .await
        .expect("seed option group");
    sqlx::query("INSERT INTO menu_option (id, group_id, name, price_delta) VALUES (?, ?, 'Option', ?)")
        .bind(option_id)
        .bind(group_id)
        .bind(price_delta)
        .execute(&mut *conn)
        .await
        .expect("seed option");
}

/// Seed a custom ledger account, returning its id
pub async fn seed_account(conn: &mut SqliteConnection, id: i64, name: &str) -> i64 {
    sqlx::query(
        "INSERT INTO account (id, name, account_type, currency, is_active, scope, account_key, is_locked, shift_id, base_account_id, parent_account_id) \
         VALUES (?, ?, 'BANK', 'EUR', 1, 'CUSTOM', NULL, 0, NULL, NULL, NULL)",
    )
    .bind(id)
    .bind(name)
    .execute(&mut *conn)
    .await
    .expect("seed account");
    id
}
