//! Cashier expenses — petty cash from the open shift's drawer
//!
//! Each one moves cash from the shift's drawer into its expense pot, so
//! drawer reconciliation sees the outflow. The feature is gated by store
//! settings and optionally capped per shift. Updates reverse the original
//! entry pair and write a fresh one at the new amount.

use crate::core::OpContext;
use crate::db::repository::{
    account as account_repo, expense as expense_repo, shift as shift_repo,
    store_info as store_repo,
};
use crate::money::{self, to_decimal};
use crate::utils::validation::{validate_optional_text, MAX_NOTE_LEN};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Account, AccountTransaction, CashierExpenseCreate, CashierExpensePatch, Direction, Expense,
    ExpenseKind, Role, Shift,
};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::{CASH_DRAWER_KEY, EXPENSE_POT_KEY};

pub async fn create_cashier_expense(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: CashierExpenseCreate,
) -> AppResult<Expense> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;
    money::validate_amount(input.amount, "amount")?;
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;

    let shift = require_open_shift(conn).await?;
    let amount = money::round2(input.amount);
    check_gate_and_cap(conn, shift.id, amount).await?;

    let (drawer, pot) = shift_accounts(conn, shift.id).await?;
    let expense = Expense {
        id: snowflake_id(),
        kind: ExpenseKind::Cashier,
        amount,
        account_id: drawer.id,
        supplier_id: None,
        employee_id: None,
        shift_id: Some(shift.id),
        note: input.note,
        created_by: ctx.operator.id,
        created_at: ctx.now,
    };
    expense_repo::insert(conn, &expense).await?;
    write_legs(conn, ctx, &expense, &drawer, &pot, false).await?;

    tracing::info!(
        expense_id = expense.id,
        shift_id = shift.id,
        amount,
        "cashier expense recorded"
    );
    Ok(expense)
}

pub async fn update_cashier_expense(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    expense_id: i64,
    patch: CashierExpensePatch,
) -> AppResult<Expense> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;

    let shift = require_open_shift(conn).await?;
    let mut expense = load_owned(conn, expense_id, shift.id).await?;

    let old_amount = expense.amount;
    if let Some(amount) = patch.amount {
        money::validate_amount(amount, "amount")?;
        expense.amount = money::round2(amount);
    }
    if let Some(note) = patch.note {
        validate_optional_text(&note, "note", MAX_NOTE_LEN)?;
        expense.note = note;
    }

    if expense.amount != old_amount {
        // Cap applies to the shift total at the new amount
        let headroom = to_decimal(expense.amount) - to_decimal(old_amount);
        if headroom > rust_decimal::Decimal::ZERO {
            check_gate_and_cap(conn, shift.id, money::to_f64(headroom)).await?;
        }
        let (drawer, pot) = shift_accounts(conn, shift.id).await?;
        let reversal = Expense {
            amount: old_amount,
            ..expense.clone()
        };
        write_legs(conn, ctx, &reversal, &drawer, &pot, true).await?;
        write_legs(conn, ctx, &expense, &drawer, &pot, false).await?;
    }

    expense_repo::update_amount_note(conn, expense.id, expense.amount, &expense.note).await?;
    Ok(expense)
}

pub async fn delete_cashier_expense(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    expense_id: i64,
) -> AppResult<()> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;

    let shift = require_open_shift(conn).await?;
    let expense = load_owned(conn, expense_id, shift.id).await?;

    let (drawer, pot) = shift_accounts(conn, shift.id).await?;
    write_legs(conn, ctx, &expense, &drawer, &pot, true).await?;
    expense_repo::delete(conn, expense.id).await?;

    tracing::info!(expense_id, shift_id = shift.id, "cashier expense removed");
    Ok(())
}

async fn require_open_shift(conn: &mut SqliteConnection) -> AppResult<Shift> {
    shift_repo::find_open(conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftRequired))
}

/// The expense must belong to the currently open shift
async fn load_owned(
    conn: &mut SqliteConnection,
    expense_id: i64,
    shift_id: i64,
) -> AppResult<Expense> {
    expense_repo::find_by_id(conn, expense_id)
        .await?
        .filter(|e| e.kind == ExpenseKind::Cashier && e.shift_id == Some(shift_id))
        .ok_or_else(|| {
            AppError::new(ErrorCode::CashierExpenseNotFound).with_detail("expense_id", expense_id)
        })
}

/// Feature gate plus the optional per-shift cap, checked against the
/// amount about to be added on top of the shift's existing total
async fn check_gate_and_cap(
    conn: &mut SqliteConnection,
    shift_id: i64,
    additional: f64,
) -> AppResult<()> {
    let info = store_repo::get(conn).await?;
    if !info.cashier_expenses_enabled {
        return Err(AppError::new(ErrorCode::CashierExpensesDisabled));
    }
    if let Some(cap) = info.cashier_expense_cap {
        let spent = shift_repo::sum_cashier_expenses(conn, shift_id).await?;
        if to_decimal(spent) + to_decimal(additional) > to_decimal(cap) {
            return Err(AppError::new(ErrorCode::CashierExpenseCapExceeded)
                .with_detail("cap", cap)
                .with_detail("spent", spent));
        }
    }
    Ok(())
}

async fn shift_accounts(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> AppResult<(Account, Account)> {
    let drawer = account_repo::find_shift_account(conn, CASH_DRAWER_KEY, shift_id)
        .await?
        .ok_or_else(|| AppError::internal("shift cash account missing"))?;
    let pot = account_repo::find_shift_account(conn, EXPENSE_POT_KEY, shift_id)
        .await?
        .ok_or_else(|| AppError::internal("shift expense account missing"))?;
    Ok((drawer, pot))
}

/// Drawer OUT + pot IN pair; `reverse` flips both legs
async fn write_legs(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    expense: &Expense,
    drawer: &Account,
    pot: &Account,
    reverse: bool,
) -> AppResult<()> {
    let source_type = if reverse { "reversal" } else { "expense" };
    for (account_id, direction) in [(drawer.id, Direction::Out), (pot.id, Direction::In)] {
        let direction = if reverse { direction.opposite() } else { direction };
        account_repo::insert_transaction(
            conn,
            &AccountTransaction {
                id: snowflake_id(),
                account_id,
                direction,
                amount: expense.amount,
                source_type: source_type.into(),
                source_id: Some(expense.id),
                note: expense.note.clone(),
                created_by: ctx.operator.id,
                created_at: ctx.now,
            },
        )
        .await?;
    }
    Ok(())
}
