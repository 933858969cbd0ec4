//! Add a line item to an order
//!
//! Names, prices and option deltas are snapshotted from the menu at add
//! time so later menu edits never reprice existing orders. An addition
//! identical to an existing un-printed line (same item, options and note)
//! bumps that line's quantity instead of creating a new row.

use crate::core::OpContext;
use crate::db::repository::{menu as menu_repo, order as order_repo};
use crate::money;
use crate::utils::validation::{validate_optional_text, MAX_NOTE_LEN};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    OrderAddItem, OrderItem, OrderItemCustomization, OrderSnapshot, OrderStatus,
};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::signature::customization_signature;
use super::snapshot::load_snapshot;
use super::{ensure_unlocked, load_order};

pub async fn add_item(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    input: OrderAddItem,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    money::validate_qty(input.qty)?;
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;

    let order = load_order(conn, order_id).await?;
    ensure_unlocked(&order)?;

    let menu_item = menu_repo::find_item(conn, input.menu_item_id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| {
            AppError::new(ErrorCode::MenuItemNotFound)
                .with_detail("menu_item_id", input.menu_item_id)
        })?;

    // Resolve every selection against the menu before writing anything
    let mut resolved = Vec::with_capacity(input.options.len());
    for selection in &input.options {
        let group = menu_repo::find_group(conn, selection.group_id)
            .await?
            .filter(|g| g.menu_item_id == menu_item.id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::MenuOptionNotFound)
                    .with_detail("group_id", selection.group_id)
            })?;
        let option = menu_repo::find_option(conn, group.id, selection.option_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::MenuOptionNotFound)
                    .with_detail("group_id", selection.group_id)
                    .with_detail("option_id", selection.option_id)
            })?;
        resolved.push((group, option, selection.qty));
    }

    let qty = money::round_qty(input.qty);
    let signature = customization_signature(&input.options);

    let existing = order_repo::find_mergeable_item(
        conn,
        order.id,
        menu_item.id,
        &signature,
        input.note.as_deref(),
    )
    .await?;

    match existing {
        Some(line) => {
            let merged = money::round_qty(line.qty + qty);
            order_repo::set_item_qty(conn, line.id, merged).await?;
            tracing::debug!(order_id = order.id, item_id = line.id, qty = merged, "line quantity merged");
        }
        None => {
            let item = OrderItem {
                id: snowflake_id(),
                order_id: order.id,
                menu_item_id: Some(menu_item.id),
                name: menu_item.name.clone(),
                qty,
                unit_price: menu_item.price,
                discount_amount: 0.0,
                discount_percent: 0.0,
                note: input.note.clone(),
                voided: false,
                void_reason: None,
                void_by: None,
                void_at: None,
                printer_id: menu_item.printer_id,
                kitchen_printed_at: None,
                customization_signature: signature,
            };
            order_repo::insert_item(conn, &item).await?;
            for (group, option, opt_qty) in resolved {
                order_repo::insert_customization(
                    conn,
                    &OrderItemCustomization {
                        id: snowflake_id(),
                        order_item_id: item.id,
                        group_id: group.id,
                        group_name: group.name,
                        option_id: option.id,
                        option_name: option.name,
                        qty: opt_qty,
                        price_delta: option.price_delta,
                    },
                )
                .await?;
            }
            tracing::debug!(order_id = order.id, item_id = item.id, "line added");
        }
    }

    if order.status == OrderStatus::Draft {
        order_repo::set_status(conn, order.id, OrderStatus::Open).await?;
    }
    load_snapshot(conn, order.id).await
}
