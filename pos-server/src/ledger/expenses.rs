//! Expenses and receipts
//!
//! An expense moves money out of an account; a receipt moves it in. The
//! target is given directly, or indirectly as a supplier/employee whose
//! linked account takes the entry. Exactly one of the three must be set.

use crate::core::OpContext;
use crate::db::repository::{account as account_repo, expense as expense_repo};
use crate::money;
use crate::utils::validation::{validate_optional_text, MAX_NOTE_LEN};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AccountTransaction, Direction, Expense, ExpenseCreate, ExpenseKind, Role,
};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::load_active_account;

/// Record money leaving an account
pub async fn create_expense(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: ExpenseCreate,
) -> AppResult<Expense> {
    record(conn, ctx, input, ExpenseKind::Expense).await
}

/// Record money entering an account
pub async fn create_receipt(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: ExpenseCreate,
) -> AppResult<Expense> {
    record(conn, ctx, input, ExpenseKind::Receipt).await
}

async fn record(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: ExpenseCreate,
    kind: ExpenseKind,
) -> AppResult<Expense> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Manager)?;
    money::validate_amount(input.amount, "amount")?;
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;

    let account_id = resolve_target(conn, &input).await?;
    let account = load_active_account(conn, account_id).await?;

    let expense = Expense {
        id: snowflake_id(),
        kind,
        amount: money::round2(input.amount),
        account_id: account.id,
        supplier_id: input.supplier_id,
        employee_id: input.employee_id,
        shift_id: None,
        note: input.note,
        created_by: ctx.operator.id,
        created_at: ctx.now,
    };
    expense_repo::insert(conn, &expense).await?;

    let (direction, source_type) = match kind {
        ExpenseKind::Receipt => (Direction::In, "receipt"),
        _ => (Direction::Out, "expense"),
    };
    account_repo::insert_transaction(
        conn,
        &AccountTransaction {
            id: snowflake_id(),
            account_id: account.id,
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

    tracing::info!(
        expense_id = expense.id,
        kind = ?kind,
        account_id = account.id,
        amount = expense.amount,
        "expense recorded"
    );
    Ok(expense)
}

/// Exactly one of account, supplier, employee picks the ledger account
async fn resolve_target(conn: &mut SqliteConnection, input: &ExpenseCreate) -> AppResult<i64> {
    let set = [
        input.account_id.is_some(),
        input.supplier_id.is_some(),
        input.employee_id.is_some(),
    ]
    .iter()
    .filter(|&&s| s)
    .count();
    if set != 1 {
        return Err(AppError::new(ErrorCode::BadExpenseTarget).with_detail("targets_set", set));
    }

    if let Some(account_id) = input.account_id {
        return Ok(account_id);
    }
    if let Some(supplier_id) = input.supplier_id {
        let supplier = expense_repo::find_supplier(conn, supplier_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| {
                AppError::new(ErrorCode::SupplierNotFound).with_detail("supplier_id", supplier_id)
            })?;
        return supplier.account_id.ok_or_else(|| {
            AppError::new(ErrorCode::BadExpenseTarget)
                .with_detail("reason", "supplier has no linked account")
        });
    }
    if let Some(employee_id) = input.employee_id {
        let employee = expense_repo::find_employee(conn, employee_id)
            .await?
            .filter(|e| e.is_active)
            .ok_or_else(|| {
                AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", employee_id)
            })?;
        return employee.account_id.ok_or_else(|| {
            AppError::new(ErrorCode::BadExpenseTarget)
                .with_detail("reason", "employee has no linked account")
        });
    }
    Err(AppError::new(ErrorCode::BadExpenseTarget))
}
