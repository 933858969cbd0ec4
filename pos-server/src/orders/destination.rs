//! Destination assignment — the "send" step
//!
//! Pinning an order to a table or marking it takeaway is what sends it to
//! the kitchen: the order leaves DRAFT/OPEN for SENT and voids become soft
//! from here on.

use crate::core::OpContext;
use crate::db::repository::order as order_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderDestination, OrderSnapshot, OrderStatus};
use sqlx::SqliteConnection;

use super::snapshot::load_snapshot;
use super::{ensure_unlocked, load_order};

pub async fn assign_destination(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    input: OrderDestination,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    match (input.table_id, input.is_takeaway) {
        (Some(_), true) => return Err(AppError::new(ErrorCode::DestinationConflict)),
        (None, false) => return Err(AppError::new(ErrorCode::DestinationRequired)),
        _ => {}
    }

    let order = load_order(conn, order_id).await?;
    ensure_unlocked(&order)?;

    if let Some(table_id) = input.table_id
        && let Some(occupant) = order_repo::find_open_by_table(conn, table_id).await?
        && occupant.id != order.id
    {
        return Err(AppError::new(ErrorCode::TableAlreadyHasOpenOrder)
            .with_detail("table_id", table_id)
            .with_detail("order_id", occupant.id));
    }

    order_repo::set_destination(conn, order.id, input.table_id, input.is_takeaway).await?;
    order_repo::set_status(conn, order.id, OrderStatus::Sent).await?;

    tracing::info!(
        order_id = order.id,
        table_id = input.table_id,
        is_takeaway = input.is_takeaway,
        "order sent"
    );
    load_snapshot(conn, order.id).await
}
