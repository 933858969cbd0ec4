//! Patch order header fields
//!
//! Same presence semantics as the line patch. Destination changes go
//! through `assign_destination`/`change_table`, never through here.

use crate::core::OpContext;
use crate::db::repository::order as order_repo;
use crate::money;
use crate::utils::validation::{validate_optional_text, MAX_NAME_LEN};
use shared::error::AppResult;
use shared::models::{OrderPatch, OrderSnapshot, Role};
use sqlx::SqliteConnection;

use super::snapshot::load_snapshot;
use super::{ensure_unlocked, load_order};

pub async fn update_order(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    patch: OrderPatch,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    let mut order = load_order(conn, order_id).await?;
    ensure_unlocked(&order)?;

    let touches_money = patch.discount_amount.is_some()
        || patch.discount_percent.is_some()
        || patch.service_fee.is_some()
        || patch.service_fee_percent.is_some();
    if touches_money {
        ctx.require_role(Role::Cashier)?;
    }

    if let Some(count) = patch.people_count {
        order.people_count = Some(count);
    }
    if let Some(nickname) = patch.nickname {
        validate_optional_text(&nickname, "nickname", MAX_NAME_LEN)?;
        order.nickname = nickname;
    }
    if let Some(customer_id) = patch.customer_id {
        order.customer_id = customer_id;
    }
    if let Some(amount) = patch.discount_amount {
        money::validate_non_negative(amount, "discount_amount")?;
        order.discount_amount = amount;
    }
    if let Some(percent) = patch.discount_percent {
        money::validate_percent(percent, "discount_percent")?;
        order.discount_percent = percent;
    }
    if let Some(fee) = patch.service_fee {
        money::validate_non_negative(fee, "service_fee")?;
        order.service_fee = fee;
    }
    if let Some(percent) = patch.service_fee_percent {
        money::validate_percent(percent, "service_fee_percent")?;
        order.service_fee_percent = percent;
    }

    order_repo::update_header(conn, &order).await?;
    load_snapshot(conn, order.id).await
}
