//! Repository layer
//!
//! Free async functions over `&mut SqliteConnection` so every operation
//! composes into the caller's transaction. Rule checks live in the
//! operation modules; this layer only moves rows.

pub mod account;
pub mod expense;
pub mod menu;
pub mod order;
pub mod shift;
pub mod store_info;

use shared::error::AppError;

/// Map an sqlx error into the system error family
pub(crate) fn db_err(e: sqlx::Error) -> AppError {
    AppError::database(e.to_string())
}
