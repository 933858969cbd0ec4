//! Order snapshot assembly

use crate::db::repository::order as order_repo;
use crate::pricing;
use shared::error::AppResult;
use shared::models::{Order, OrderItemSnapshot, OrderSnapshot};
use sqlx::SqliteConnection;

use super::load_order;

/// Full snapshot (header, lines, payments, computed totals) for an order
pub async fn load_snapshot(conn: &mut SqliteConnection, order_id: i64) -> AppResult<OrderSnapshot> {
    let order = load_order(conn, order_id).await?;
    snapshot_of(conn, order).await
}

/// Snapshot for an already-loaded order header
pub(crate) async fn snapshot_of(
    conn: &mut SqliteConnection,
    order: Order,
) -> AppResult<OrderSnapshot> {
    let raw_items = order_repo::list_items(conn, order.id).await?;
    let mut items = Vec::with_capacity(raw_items.len());
    for item in raw_items {
        let customizations = order_repo::list_customizations(conn, item.id).await?;
        items.push(OrderItemSnapshot {
            item,
            customizations,
        });
    }
    let payments = order_repo::list_payments(conn, order.id).await?;
    let totals = pricing::compute_totals(&order, &items, &payments);
    Ok(OrderSnapshot {
        order,
        items,
        payments,
        totals,
    })
}
