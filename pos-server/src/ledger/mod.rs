//! Double-entry ledger
//!
//! Accounts hold no balance column; a balance is always the sum of IN
//! entries minus OUT entries over the append-only `account_transaction`
//! log. Transfers and expenses write matched entry pairs so the books stay
//! balanced by construction.

pub mod accounts;
pub mod expenses;
pub mod relations;
pub mod routing;
pub mod transactions;

pub use accounts::{create_account, update_account};
pub use expenses::{create_expense, create_receipt};
pub use relations::set_relations;
pub use routing::{resolve_method_account, set_payment_method_account};
pub use transactions::{account_snapshot, balance_of, deposit, transfer, withdraw};

use crate::db::repository::account as account_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Account;
use sqlx::SqliteConnection;

/// Load an account or fail with the account-not-found code
pub(crate) async fn load_account(conn: &mut SqliteConnection, id: i64) -> AppResult<Account> {
    account_repo::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound).with_detail("account_id", id))
}

/// Load an account that must accept new entries
pub(crate) async fn load_active_account(
    conn: &mut SqliteConnection,
    id: i64,
) -> AppResult<Account> {
    let account = load_account(conn, id).await?;
    if !account.is_active {
        return Err(AppError::new(ErrorCode::AccountInactive).with_detail("account_id", id));
    }
    Ok(account)
}
