//! Void a line item
//!
//! On a draft the line is simply deleted. Once the order has been sent the
//! line is kept for audit: it is flagged voided with a mandatory reason and
//! drops out of the totals.

use crate::core::OpContext;
use crate::db::repository::order as order_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderSnapshot, OrderStatus, Role};
use sqlx::SqliteConnection;

use super::snapshot::load_snapshot;
use super::{ensure_unlocked, load_order};

pub async fn void_item(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    item_id: i64,
    reason: Option<&str>,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;

    let order = load_order(conn, order_id).await?;
    ensure_unlocked(&order)?;

    let item = order_repo::find_item(conn, item_id)
        .await?
        .filter(|i| i.order_id == order.id)
        .ok_or_else(|| {
            AppError::new(ErrorCode::OrderItemNotFound).with_detail("item_id", item_id)
        })?;
    if item.voided {
        return Err(AppError::new(ErrorCode::OrderItemVoided).with_detail("item_id", item_id));
    }

    if matches!(order.status, OrderStatus::Draft | OrderStatus::Open) {
        // Not sent yet, nothing to audit
        order_repo::delete_customizations(conn, item.id).await?;
        order_repo::delete_item(conn, item.id).await?;
        tracing::debug!(order_id = order.id, item_id = item.id, "line removed");
    } else {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::new(ErrorCode::VoidReasonRequired))?;
        order_repo::void_item(conn, item.id, reason, ctx.operator.id, ctx.now).await?;
        tracing::info!(order_id = order.id, item_id = item.id, reason, "line voided");
    }

    load_snapshot(conn, order.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{add_item, assign_destination, create_order};
    use crate::testing::{open_test_shift, seed_menu_item, test_ctx, test_db};
    use shared::models::{OrderAddItem, OrderCreate, OrderDestination};

    async fn setup(conn: &mut SqliteConnection) -> (i64, i64) {
        open_test_shift(conn).await;
        seed_menu_item(conn, 10, "Paella", 25.0).await;
        let ctx = test_ctx(Role::Waiter);
        let order = create_order(conn, &ctx, OrderCreate::default())
            .await
            .unwrap();
        let snap = add_item(
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
        (order.order.id, snap.items[0].item.id)
    }

    async fn send(conn: &mut SqliteConnection, order_id: i64) {
        assign_destination(
            conn,
            &test_ctx(Role::Waiter),
            order_id,
            OrderDestination {
                table_id: None,
                is_takeaway: true,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_requires_cashier() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let (order_id, item_id) = setup(&mut conn).await;

        let err = void_item(&mut conn, &test_ctx(Role::Waiter), order_id, item_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CashierRequired);
    }

    #[tokio::test]
    async fn test_unsent_line_is_deleted() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let (order_id, item_id) = setup(&mut conn).await;

        let snap = void_item(&mut conn, &test_ctx(Role::Cashier), order_id, item_id, None)
            .await
            .unwrap();
        assert!(snap.items.is_empty());
    }

    #[tokio::test]
    async fn test_sent_line_needs_reason() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let (order_id, item_id) = setup(&mut conn).await;
        send(&mut conn, order_id).await;

        let ctx = test_ctx(Role::Cashier);
        let err = void_item(&mut conn, &ctx, order_id, item_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VoidReasonRequired);

        let err = void_item(&mut conn, &ctx, order_id, item_id, Some("  "))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VoidReasonRequired);
    }

    #[tokio::test]
    async fn test_sent_line_soft_voided_and_excluded_from_totals() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let (order_id, item_id) = setup(&mut conn).await;
        send(&mut conn, order_id).await;

        let ctx = test_ctx(Role::Cashier);
        let snap = void_item(&mut conn, &ctx, order_id, item_id, Some("dropped plate"))
            .await
            .unwrap();
        assert_eq!(snap.items.len(), 1);
        assert!(snap.items[0].item.voided);
        assert_eq!(
            snap.items[0].item.void_reason.as_deref(),
            Some("dropped plate")
        );
        assert_eq!(snap.totals.subtotal, 0.0);

        // double void rejected
        let err = void_item(&mut conn, &ctx, order_id, item_id, Some("again"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemVoided);
    }
}
