//! Manual ledger entries and transfers

use crate::core::OpContext;
use crate::db::repository::account as account_repo;
use crate::money::{self, to_decimal, to_f64};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AccountSnapshot, AccountTransaction, AccountTransfer, Direction, LedgerEntryCreate, Role,
    TransferCreate,
};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::accounts::ensure_editable;
use super::{load_account, load_active_account};

/// Account balance: IN sum minus OUT sum
pub async fn balance_of(conn: &mut SqliteConnection, account_id: i64) -> AppResult<f64> {
    let (inflow, outflow) = account_repo::direction_sums(conn, account_id).await?;
    Ok(to_f64(to_decimal(inflow) - to_decimal(outflow)))
}

/// Account with its computed balance
pub async fn account_snapshot(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> AppResult<AccountSnapshot> {
    let account = load_account(conn, account_id).await?;
    let balance = balance_of(conn, account_id).await?;
    Ok(AccountSnapshot { account, balance })
}

/// Manual deposit; never fans out over relations
pub async fn deposit(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: LedgerEntryCreate,
) -> AppResult<AccountSnapshot> {
    manual_entry(conn, ctx, input, Direction::In).await
}

/// Manual withdrawal
pub async fn withdraw(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: LedgerEntryCreate,
) -> AppResult<AccountSnapshot> {
    manual_entry(conn, ctx, input, Direction::Out).await
}

async fn manual_entry(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: LedgerEntryCreate,
    direction: Direction,
) -> AppResult<AccountSnapshot> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Manager)?;
    money::validate_amount(input.amount, "amount")?;

    let account = load_active_account(conn, input.account_id).await?;
    ensure_editable(&account)?;

    account_repo::insert_transaction(
        conn,
        &AccountTransaction {
            id: snowflake_id(),
            account_id: account.id,
            direction,
            amount: money::round2(input.amount),
            source_type: "manual".into(),
            source_id: None,
            note: input.note,
            created_by: ctx.operator.id,
            created_at: ctx.now,
        },
    )
    .await?;
    account_snapshot(conn, account.id).await
}

/// Move money between two accounts: one OUT leg, one IN leg, one audit row
pub async fn transfer(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: TransferCreate,
) -> AppResult<AccountTransfer> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Manager)?;
    money::validate_amount(input.amount, "amount")?;

    if input.from_account_id == input.to_account_id {
        return Err(AppError::new(ErrorCode::TransferSameAccount));
    }
    let from = load_active_account(conn, input.from_account_id).await?;
    let to = load_active_account(conn, input.to_account_id).await?;
    if from.currency != to.currency {
        return Err(AppError::new(ErrorCode::TransferCurrencyMismatch)
            .with_detail("from_currency", from.currency.clone())
            .with_detail("to_currency", to.currency.clone()));
    }

    let amount = money::round2(input.amount);
    let record = AccountTransfer {
        id: snowflake_id(),
        from_account_id: from.id,
        to_account_id: to.id,
        amount,
        note: input.note,
        created_by: ctx.operator.id,
        created_at: ctx.now,
    };
    account_repo::insert_transfer(conn, &record).await?;

    for (account_id, direction) in [(from.id, Direction::Out), (to.id, Direction::In)] {
        account_repo::insert_transaction(
            conn,
            &AccountTransaction {
                id: snowflake_id(),
                account_id,
                direction,
                amount,
                source_type: "transfer".into(),
                source_id: Some(record.id),
                note: record.note.clone(),
                created_by: ctx.operator.id,
                created_at: ctx.now,
            },
        )
        .await?;
    }

    tracing::info!(
        transfer_id = record.id,
        from = from.id,
        to = to.id,
        amount,
        "transfer recorded"
    );
    Ok(record)
}
