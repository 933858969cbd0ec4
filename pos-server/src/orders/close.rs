//! Close a paid order
//!
//! Closing archives the ticket and frees its table. Only fully settled
//! orders close; unsettled ones need payments or an admin intervention
//! first.

use crate::core::OpContext;
use crate::db::repository::order as order_repo;
use shared::error::{AppError, AppResult};
use shared::models::{OrderSnapshot, OrderStatus};
use sqlx::SqliteConnection;

use super::snapshot::load_snapshot;
use super::load_order;

pub async fn close_order(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    let order = load_order(conn, order_id).await?;
    if order.status != OrderStatus::Paid {
        return Err(AppError::invalid_request(format!(
            "only paid orders close, order {} is {:?}",
            order.id, order.status
        )));
    }
    order_repo::set_status(conn, order.id, OrderStatus::Closed).await?;
    tracing::info!(order_id = order.id, "order closed");
    load_snapshot(conn, order.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::routing;
    use crate::orders::{add_item, add_payment, create_order};
    use crate::testing::{open_test_shift, seed_menu_item, test_ctx, test_db};
    use shared::error::ErrorCode;
    use shared::models::{OrderAddItem, OrderAddPayment, OrderCreate, PaymentMethod, Role};

    #[tokio::test]
    async fn test_close_frees_table() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Cashier);
        open_test_shift(&mut conn).await;
        routing::set_payment_method_account(&mut conn, &test_ctx(Role::Admin), PaymentMethod::Cash, 1)
            .await
            .unwrap();
        seed_menu_item(&mut conn, 10, "Paella", 30.0).await;

        let order = create_order(
            &mut conn,
            &ctx,
            OrderCreate {
                table_id: Some(6),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        add_item(
            &mut conn,
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

        // unsettled order refuses to close
        let err = close_order(&mut conn, &ctx, order.order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        add_payment(
            &mut conn,
            &ctx,
            order.order.id,
            OrderAddPayment {
                method: PaymentMethod::Cash,
                amount: 30.0,
                reference: None,
            },
        )
        .await
        .unwrap();

        let snap = close_order(&mut conn, &ctx, order.order.id).await.unwrap();
        assert_eq!(snap.order.status, OrderStatus::Closed);

        // table is free again
        let next = create_order(
            &mut conn,
            &ctx,
            OrderCreate {
                table_id: Some(6),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_ne!(next.order.id, order.order.id);
    }
}
