//! Discard a draft order
//!
//! Drafts never reached the kitchen, so they vanish without a trace: the
//! row and its lines are deleted outright. Anything past DRAFT must go
//! through item voids and close instead.

use crate::core::OpContext;
use crate::db::repository::order as order_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::OrderStatus;
use sqlx::SqliteConnection;

use super::load_order;

pub async fn discard_draft(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
) -> AppResult<()> {
    ctx.ensure_live()?;
    let order = load_order(conn, order_id).await?;
    if order.status != OrderStatus::Draft {
        return Err(AppError::new(ErrorCode::OrderNotDraft)
            .with_detail("order_id", order.id)
            .with_detail("status", format!("{:?}", order.status)));
    }

    for item in order_repo::list_items(conn, order.id).await? {
        order_repo::delete_customizations(conn, item.id).await?;
        order_repo::delete_item(conn, item.id).await?;
    }
    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(order.id)
        .execute(conn)
        .await
        .map_err(crate::db::repository::db_err)?;

    tracing::info!(order_id = order.id, "draft discarded");
    Ok(())
}
