//! Shift lifecycle
//!
//! At most one shift is open at a time; a partial unique index backs the
//! application check. Opening a shift clones every keyed system template
//! (cash drawer, expense pot) into shift-scoped instances, then deposits
//! the opening float into the drawer.

mod cashier_expenses;

pub use cashier_expenses::{create_cashier_expense, delete_cashier_expense, update_cashier_expense};

use crate::core::OpContext;
use crate::db::repository::{account as account_repo, shift as shift_repo};
use crate::money::{self, to_decimal, to_f64};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Account, AccountTransaction, Direction, Role, Shift, ShiftClose, ShiftOpen, ShiftSnapshot,
};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

pub const CASH_DRAWER_KEY: &str = "vault:cash";
pub const EXPENSE_POT_KEY: &str = "vault:expense";

/// System account keys instantiated per shift
const SHIFT_ACCOUNT_KEYS: [&str; 2] = [CASH_DRAWER_KEY, EXPENSE_POT_KEY];

/// Open a shift with the counted opening float
pub async fn open_shift(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: ShiftOpen,
) -> AppResult<ShiftSnapshot> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;
    money::validate_non_negative(input.opening_cash, "opening_cash")?;

    if let Some(open) = shift_repo::find_open(conn).await? {
        return Err(AppError::new(ErrorCode::ShiftAlreadyOpen).with_detail("shift_id", open.id));
    }

    let shift = Shift {
        id: snowflake_id(),
        opened_by: ctx.operator.id,
        opened_at: ctx.now,
        opening_cash: money::round2(input.opening_cash),
        closed_by: None,
        closed_at: None,
        closing_cash: None,
        note: input.note,
    };
    shift_repo::insert(conn, &shift).await?;

    for key in SHIFT_ACCOUNT_KEYS {
        let template = account_repo::find_template_by_key(conn, key)
            .await?
            .ok_or_else(|| AppError::internal(format!("system account template '{key}' missing")))?;
        let instance = Account {
            id: snowflake_id(),
            name: template.name.clone(),
            account_type: template.account_type.clone(),
            currency: template.currency.clone(),
            is_active: true,
            scope: template.scope,
            account_key: template.account_key.clone(),
            is_locked: true,
            shift_id: Some(shift.id),
            base_account_id: Some(template.id),
            parent_account_id: None,
        };
        account_repo::insert(conn, &instance).await?;

        if key == CASH_DRAWER_KEY && shift.opening_cash > 0.0 {
            account_repo::insert_transaction(
                conn,
                &AccountTransaction {
                    id: snowflake_id(),
                    account_id: instance.id,
                    direction: Direction::In,
                    amount: shift.opening_cash,
                    source_type: "shift_open".into(),
                    source_id: Some(shift.id),
                    note: None,
                    created_by: ctx.operator.id,
                    created_at: ctx.now,
                },
            )
            .await?;
        }
    }

    tracing::info!(
        shift_id = shift.id,
        opening_cash = shift.opening_cash,
        by = ctx.operator.id,
        "shift opened"
    );
    snapshot_of(conn, shift).await
}

/// Close the open shift against the counted drawer
///
/// A cash variance is reported in the snapshot, never blocking.
pub async fn close_shift(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: ShiftClose,
) -> AppResult<ShiftSnapshot> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;
    money::validate_non_negative(input.closing_cash, "closing_cash")?;

    let shift = shift_repo::find_open(conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))?;

    let rows = shift_repo::close(
        conn,
        shift.id,
        ctx.operator.id,
        ctx.now,
        money::round2(input.closing_cash),
        input.note.as_deref(),
    )
    .await?;
    if rows == 0 {
        // Raced with another close
        return Err(AppError::new(ErrorCode::ShiftNotFound));
    }

    let closed = shift_repo::find_by_id(conn, shift.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))?;
    let snapshot = snapshot_of(conn, closed).await?;
    tracing::info!(
        shift_id = snapshot.shift.id,
        expected_cash = snapshot.expected_cash,
        variance = snapshot.variance,
        "shift closed"
    );
    Ok(snapshot)
}

/// The open shift with its running cash expectation
pub async fn current_shift(conn: &mut SqliteConnection) -> AppResult<Option<ShiftSnapshot>> {
    match shift_repo::find_open(conn).await? {
        Some(shift) => Ok(Some(snapshot_of(conn, shift).await?)),
        None => Ok(None),
    }
}

/// expected = opening float + cash payments - cashier expenses
async fn snapshot_of(conn: &mut SqliteConnection, shift: Shift) -> AppResult<ShiftSnapshot> {
    let cash_payments = shift_repo::sum_cash_payments(conn, shift.id).await?;
    let cashier_expenses = shift_repo::sum_cashier_expenses(conn, shift.id).await?;
    let expected_cash = to_f64(
        to_decimal(shift.opening_cash) + to_decimal(cash_payments) - to_decimal(cashier_expenses),
    );
    let variance = shift
        .closing_cash
        .map(|closing| to_f64(to_decimal(closing) - to_decimal(expected_cash)));
    Ok(ShiftSnapshot {
        shift,
        expected_cash,
        variance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_ctx, test_db};

    fn open(cash: f64) -> ShiftOpen {
        ShiftOpen {
            opening_cash: cash,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_open_provisions_system_accounts() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Cashier);

        let snap = open_shift(&mut conn, &ctx, open(100.0)).await.unwrap();
        assert!(snap.shift.is_open());
        assert_eq!(snap.expected_cash, 100.0);

        for key in SHIFT_ACCOUNT_KEYS {
            let instance = account_repo::find_shift_account(&mut conn, key, snap.shift.id)
                .await
                .unwrap()
                .expect("shift instance provisioned");
            assert!(instance.is_locked);
            assert!(instance.base_account_id.is_some());
        }

        // opening float landed in the drawer
        let drawer = account_repo::find_shift_account(&mut conn, CASH_DRAWER_KEY, snap.shift.id)
            .await
            .unwrap()
            .unwrap();
        let (inflow, _) = account_repo::direction_sums(&mut conn, drawer.id).await.unwrap();
        assert_eq!(inflow, 100.0);
    }

    #[tokio::test]
    async fn test_second_open_rejected() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Cashier);

        open_shift(&mut conn, &ctx, open(0.0)).await.unwrap();
        let err = open_shift(&mut conn, &ctx, open(0.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ShiftAlreadyOpen);
    }

    #[tokio::test]
    async fn test_requires_cashier() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();

        let err = open_shift(&mut conn, &test_ctx(Role::Waiter), open(0.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CashierRequired);
    }

    #[tokio::test]
    async fn test_close_reports_variance() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Cashier);

        open_shift(&mut conn, &ctx, open(50.0)).await.unwrap();
        let snap = close_shift(
            &mut conn,
            &ctx,
            ShiftClose {
                closing_cash: 48.0,
                note: Some("short".into()),
            },
        )
        .await
        .unwrap();
        assert!(!snap.shift.is_open());
        assert_eq!(snap.expected_cash, 50.0);
        assert_eq!(snap.variance, Some(-2.0));

        // no open shift left
        assert!(current_shift(&mut conn).await.unwrap().is_none());
        let err = close_shift(
            &mut conn,
            &ctx,
            ShiftClose {
                closing_cash: 0.0,
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ShiftNotFound);
    }

    #[tokio::test]
    async fn test_reopen_after_close_gets_fresh_accounts() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Cashier);

        let first = open_shift(&mut conn, &ctx, open(10.0)).await.unwrap();
        close_shift(
            &mut conn,
            &ctx,
            ShiftClose {
                closing_cash: 10.0,
                note: None,
            },
        )
        .await
        .unwrap();
        let second = open_shift(&mut conn, &ctx, open(20.0)).await.unwrap();
        assert_ne!(first.shift.id, second.shift.id);

        let a = account_repo::find_shift_account(&mut conn, CASH_DRAWER_KEY, first.shift.id)
            .await
            .unwrap()
            .unwrap();
        let b = account_repo::find_shift_account(&mut conn, CASH_DRAWER_KEY, second.shift.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
