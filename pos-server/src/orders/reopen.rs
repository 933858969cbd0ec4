//! Admin reopen
//!
//! Brings a settled order back for correction. With `clear_payments` the
//! recorded payments are rolled back: every ledger entry they produced
//! (including allocation fan-out) gets an opposite reversal entry, then the
//! payment rows are deleted.

use crate::core::OpContext;
use crate::db::repository::{account as account_repo, order as order_repo};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AccountTransaction, OrderSnapshot, OrderStatus, Role};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::snapshot::load_snapshot;
use super::load_order;

pub async fn reopen_order(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    clear_payments: bool,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Admin)?;

    let order = load_order(conn, order_id).await?;
    if !order.status.is_locked() {
        return Err(AppError::invalid_request(format!(
            "order {} is {:?}, nothing to reopen",
            order.id, order.status
        )));
    }

    if clear_payments {
        for payment in order_repo::list_payments(conn, order.id).await? {
            reverse_payment_entries(conn, ctx, payment.id).await?;
        }
        order_repo::delete_payments(conn, order.id).await?;
    }

    // Back to where it was in the flow: sent orders have a destination
    let status = if order.table_id.is_some() || order.is_takeaway {
        OrderStatus::Sent
    } else {
        OrderStatus::Open
    };
    order_repo::set_status(conn, order.id, status).await?;

    tracing::warn!(
        order_id = order.id,
        clear_payments,
        by = ctx.operator.id,
        "order reopened"
    );
    load_snapshot(conn, order.id).await
}

/// Opposite entries for everything a payment wrote to the ledger
async fn reverse_payment_entries(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    payment_id: i64,
) -> AppResult<()> {
    let mut entries = account_repo::list_transactions_by_source(conn, "payment", payment_id).await?;
    entries
        .extend(account_repo::list_transactions_by_source(conn, "allocation", payment_id).await?);

    for entry in entries {
        account_repo::insert_transaction(
            conn,
            &AccountTransaction {
                id: snowflake_id(),
                account_id: entry.account_id,
                direction: entry.direction.opposite(),
                amount: entry.amount,
                source_type: "reversal".into(),
                source_id: Some(entry.id),
                note: None,
                created_by: ctx.operator.id,
                created_at: ctx.now,
            },
        )
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::routing;
    use crate::orders::{add_item, add_payment, close_order, create_order};
    use crate::testing::{open_test_shift, seed_menu_item, test_ctx, test_db};
    use shared::models::{OrderAddItem, OrderAddPayment, OrderCreate, PaymentMethod};
    use sqlx::SqliteConnection;

    async fn paid_order(conn: &mut SqliteConnection) -> i64 {
        open_test_shift(conn).await;
        routing::set_payment_method_account(conn, &test_ctx(Role::Admin), PaymentMethod::Cash, 1)
            .await
            .unwrap();
        seed_menu_item(conn, 10, "Paella", 40.0).await;
        let ctx = test_ctx(Role::Cashier);
        let order = create_order(conn, &ctx, OrderCreate::default()).await.unwrap();
        add_item(
            conn,
            &ctx,
            order.order.id,
            OrderAddItem {
                menu_item_id: 10,
                qty: 1.0,
                options: vec![],
                note: None,
            },
        )
        .await
        .unwrap();
        add_payment(
            conn,
            &ctx,
            order.order.id,
            OrderAddPayment {
                method: PaymentMethod::Cash,
                amount: 40.0,
                reference: None,
            },
        )
        .await
        .unwrap();
        order.order.id
    }

    #[tokio::test]
    async fn test_requires_admin() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let order_id = paid_order(&mut conn).await;

        let err = reopen_order(&mut conn, &test_ctx(Role::Manager), order_id, false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
    }

    #[tokio::test]
    async fn test_reopen_keeps_payments_by_default() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let order_id = paid_order(&mut conn).await;

        let snap = reopen_order(&mut conn, &test_ctx(Role::Admin), order_id, false)
            .await
            .unwrap();
        assert_eq!(snap.order.status, OrderStatus::Open);
        assert_eq!(snap.payments.len(), 1);
        assert_eq!(snap.totals.balance, 0.0);
    }

    #[tokio::test]
    async fn test_clear_payments_reverses_ledger() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let order_id = paid_order(&mut conn).await;
        let shift_id = crate::orders::load_snapshot(&mut conn, order_id)
            .await
            .unwrap()
            .order
            .shift_id;

        let snap = reopen_order(&mut conn, &test_ctx(Role::Admin), order_id, true)
            .await
            .unwrap();
        assert!(snap.payments.is_empty());
        assert_eq!(snap.totals.balance, 40.0);

        // drawer nets back to zero
        let drawer =
            crate::db::repository::account::find_shift_account(&mut conn, "vault:cash", shift_id)
                .await
                .unwrap()
                .unwrap();
        let (inflow, outflow) =
            crate::db::repository::account::direction_sums(&mut conn, drawer.id)
                .await
                .unwrap();
        assert_eq!(inflow, outflow);
    }

    #[tokio::test]
    async fn test_closed_order_reopens_too() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let order_id = paid_order(&mut conn).await;
        close_order(&mut conn, &test_ctx(Role::Cashier), order_id)
            .await
            .unwrap();

        let snap = reopen_order(&mut conn, &test_ctx(Role::Admin), order_id, false)
            .await
            .unwrap();
        assert_eq!(snap.order.status, OrderStatus::Open);
    }
}
