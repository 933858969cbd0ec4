//! Order creation
//!
//! Get-or-create per table: asking for an order on a table that already
//! holds a non-closed order returns that order instead of failing, so two
//! waiters tapping the same table converge on one ticket.

use crate::core::OpContext;
use crate::db::repository::{order as order_repo, shift as shift_repo, store_info as store_repo};
use crate::money;
use crate::utils::time::{business_date_at, parse_cutoff, parse_tz};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderCreate, OrderSnapshot, OrderStatus};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::numbering::next_order_no;
use super::snapshot::snapshot_of;

/// Create a draft order under the open shift
pub async fn create_order(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    input: OrderCreate,
) -> AppResult<OrderSnapshot> {
    if input.table_id.is_some() && input.is_takeaway {
        return Err(AppError::new(ErrorCode::DestinationConflict));
    }
    if let Some(percent) = input.customer_discount_percent {
        money::validate_percent(percent, "customer_discount_percent")?;
    }
    crate::utils::validation::validate_optional_text(
        &input.nickname,
        "nickname",
        crate::utils::validation::MAX_NAME_LEN,
    )?;

    let shift = shift_repo::find_open(conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftRequired))?;

    // Table already occupied: hand back the existing ticket
    if let Some(table_id) = input.table_id {
        if let Some(existing) = order_repo::find_open_by_table(conn, table_id).await? {
            tracing::debug!(
                order_id = existing.id,
                table_id,
                "table already has an open order, returning it"
            );
            return snapshot_of(conn, existing).await;
        }
    }

    let info = store_repo::get(conn).await?;
    let cutoff = parse_cutoff(&info.business_day_cutoff);
    let tz = parse_tz(&info.timezone);
    let business_date = business_date_at(ctx.now, cutoff, tz)
        .format("%Y-%m-%d")
        .to_string();

    let order_no = next_order_no(conn, &business_date).await?;
    let order = Order {
        id: snowflake_id(),
        business_date,
        order_no,
        status: OrderStatus::Draft,
        table_id: input.table_id,
        is_takeaway: input.is_takeaway,
        customer_id: input.customer_id,
        people_count: input.people_count,
        discount_amount: 0.0,
        discount_percent: input.customer_discount_percent.unwrap_or(0.0),
        service_fee: 0.0,
        service_fee_percent: 0.0,
        shift_id: shift.id,
        created_by: ctx.operator.id,
        created_at: ctx.now,
        nickname: input.nickname,
    };
    order_repo::insert(conn, &order).await?;

    tracing::info!(
        order_id = order.id,
        order_no = order.order_no,
        business_date = %order.business_date,
        "order created"
    );
    snapshot_of(conn, order).await
}
