//! Account management
//!
//! Locked and shift-managed accounts belong to the engine; manual edits
//! stop at the door. Parent links form a tree, never a cycle.

use crate::core::OpContext;
use crate::db::repository::account as account_repo;
use crate::utils::validation::validate_name;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Account, AccountCreate, AccountPatch, AccountScope, Role};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::load_account;

pub async fn create_account(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: AccountCreate,
) -> AppResult<Account> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Manager)?;
    validate_name(&input.name, "name")?;
    validate_name(&input.account_type, "account_type")?;

    if let Some(parent_id) = input.parent_account_id {
        account_repo::find_by_id(conn, parent_id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::ParentAccountNotFound).with_detail("parent_account_id", parent_id)
        })?;
    }

    let account = Account {
        id: snowflake_id(),
        name: input.name.trim().to_string(),
        account_type: input.account_type,
        currency: input.currency,
        is_active: true,
        scope: AccountScope::Custom,
        account_key: None,
        is_locked: false,
        shift_id: None,
        base_account_id: None,
        parent_account_id: input.parent_account_id,
    };
    account_repo::insert(conn, &account).await?;
    tracing::info!(account_id = account.id, name = %account.name, "account created");
    Ok(account)
}

pub async fn update_account(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    account_id: i64,
    patch: AccountPatch,
) -> AppResult<Account> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Manager)?;

    let mut account = load_account(conn, account_id).await?;
    ensure_editable(&account)?;

    if let Some(name) = patch.name {
        validate_name(&name, "name")?;
        account.name = name.trim().to_string();
    }
    if let Some(account_type) = patch.account_type {
        validate_name(&account_type, "account_type")?;
        account.account_type = account_type;
    }
    if let Some(is_active) = patch.is_active {
        account.is_active = is_active;
    }
    if let Some(parent) = patch.parent_account_id {
        if let Some(parent_id) = parent {
            ensure_valid_parent(conn, account.id, parent_id).await?;
        }
        account.parent_account_id = parent;
    }

    account_repo::update(conn, &account).await?;
    Ok(account)
}

/// Reject edits to engine-owned accounts
pub(crate) fn ensure_editable(account: &Account) -> AppResult<()> {
    if account.is_shift_managed() {
        return Err(
            AppError::new(ErrorCode::AccountManagedByShift).with_detail("account_id", account.id)
        );
    }
    if account.is_locked || account.scope == AccountScope::System {
        return Err(AppError::new(ErrorCode::AccountLocked).with_detail("account_id", account.id));
    }
    Ok(())
}

/// Parent must exist and the link must not create a cycle
async fn ensure_valid_parent(
    conn: &mut SqliteConnection,
    account_id: i64,
    parent_id: i64,
) -> AppResult<()> {
    if parent_id == account_id {
        return Err(AppError::new(ErrorCode::AccountParentSelf));
    }

    let mut cursor = Some(parent_id);
    while let Some(id) = cursor {
        if id == account_id {
            return Err(
                AppError::new(ErrorCode::AccountParentCycle).with_detail("parent_account_id", parent_id)
            );
        }
        let node = account_repo::find_by_id(conn, id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::ParentAccountNotFound).with_detail("parent_account_id", id)
        })?;
        cursor = node.parent_account_id;
    }
    Ok(())
}
