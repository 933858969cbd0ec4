//! Merge orders
//!
//! Lines and payments from all source orders move onto the target; the
//! emptied sources are retired as CLOSED. The target keeps its own header
//! (discounts, fees, destination) untouched.

use crate::core::OpContext;
use crate::db::repository::order as order_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderSnapshot, OrderStatus, Role};
use sqlx::SqliteConnection;

use super::snapshot::load_snapshot;
use super::{ensure_unlocked, load_order};

pub async fn merge_orders(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_ids: &[i64],
    target_id: i64,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;

    if order_ids.len() < 2 {
        return Err(AppError::new(ErrorCode::MergeMin2));
    }
    if !order_ids.contains(&target_id) {
        return Err(AppError::new(ErrorCode::MergeTargetInvalid).with_detail("target_id", target_id));
    }

    // Every participant must exist and be mutable before anything moves
    for &id in order_ids {
        let order = load_order(conn, id).await?;
        ensure_unlocked(&order)?;
    }

    for &source_id in order_ids {
        if source_id == target_id {
            continue;
        }
        order_repo::move_items(conn, source_id, target_id).await?;
        order_repo::move_payments(conn, source_id, target_id).await?;
        order_repo::set_status(conn, source_id, OrderStatus::Closed).await?;
    }

    tracing::info!(target_id, sources = order_ids.len() - 1, "orders merged");
    load_snapshot(conn, target_id).await
}
