//! Move an order to another table

use crate::core::OpContext;
use crate::db::repository::order as order_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::OrderSnapshot;
use sqlx::SqliteConnection;

use super::snapshot::load_snapshot;
use super::{ensure_unlocked, load_order};

pub async fn change_table(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    table_id: i64,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    let order = load_order(conn, order_id).await?;
    ensure_unlocked(&order)?;

    if let Some(occupant) = order_repo::find_open_by_table(conn, table_id).await?
        && occupant.id != order.id
    {
        return Err(AppError::new(ErrorCode::TableAlreadyHasOpenOrder)
            .with_detail("table_id", table_id)
            .with_detail("order_id", occupant.id));
    }

    order_repo::set_destination(conn, order.id, Some(table_id), false).await?;
    tracing::info!(order_id = order.id, table_id, "order moved");
    load_snapshot(conn, order.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::create_order;
    use crate::testing::{open_test_shift, test_ctx, test_db};
    use shared::models::{OrderCreate, Role};

    #[tokio::test]
    async fn test_move_to_free_table() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Waiter);
        open_test_shift(&mut conn).await;

        let order = create_order(
            &mut conn,
            &ctx,
            OrderCreate {
                table_id: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let snap = change_table(&mut conn, &ctx, order.order.id, 2).await.unwrap();
        assert_eq!(snap.order.table_id, Some(2));
        assert!(!snap.order.is_takeaway);
    }

    #[tokio::test]
    async fn test_takeaway_converts_to_table() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Waiter);
        open_test_shift(&mut conn).await;

        let order = create_order(
            &mut conn,
            &ctx,
            OrderCreate {
                is_takeaway: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let snap = change_table(&mut conn, &ctx, order.order.id, 5).await.unwrap();
        assert_eq!(snap.order.table_id, Some(5));
        assert!(!snap.order.is_takeaway);
    }

    #[tokio::test]
    async fn test_occupied_table_rejected() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Waiter);
        open_test_shift(&mut conn).await;

        create_order(
            &mut conn,
            &ctx,
            OrderCreate {
                table_id: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let other = create_order(&mut conn, &ctx, OrderCreate::default())
            .await
            .unwrap();

        let err = change_table(&mut conn, &ctx, other.order.id, 3)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableAlreadyHasOpenOrder);
    }
}
