//! Patch a line item
//!
//! Absent fields stay untouched; `note: null` clears the note. A present
//! `options` array replaces the line's customizations wholesale and the
//! signature is recomputed.

use crate::core::OpContext;
use crate::db::repository::{menu as menu_repo, order as order_repo};
use crate::money;
use crate::utils::validation::{validate_optional_text, MAX_NOTE_LEN};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderItemCustomization, OrderItemPatch, OrderSnapshot, Role};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::signature::customization_signature;
use super::snapshot::load_snapshot;
use super::{ensure_unlocked, load_order};

pub async fn update_item(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    item_id: i64,
    patch: OrderItemPatch,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    let order = load_order(conn, order_id).await?;
    ensure_unlocked(&order)?;

    let mut item = order_repo::find_item(conn, item_id)
        .await?
        .filter(|i| i.order_id == order.id)
        .ok_or_else(|| {
            AppError::new(ErrorCode::OrderItemNotFound).with_detail("item_id", item_id)
        })?;
    if item.voided {
        return Err(AppError::new(ErrorCode::OrderItemVoided).with_detail("item_id", item_id));
    }

    if patch.discount_amount.is_some() || patch.discount_percent.is_some() {
        ctx.require_role(Role::Cashier)?;
    }

    if let Some(qty) = patch.qty {
        money::validate_qty(qty)?;
        item.qty = money::round_qty(qty);
    }
    if let Some(amount) = patch.discount_amount {
        money::validate_non_negative(amount, "discount_amount")?;
        item.discount_amount = amount;
    }
    if let Some(percent) = patch.discount_percent {
        money::validate_percent(percent, "discount_percent")?;
        item.discount_percent = percent;
    }
    if let Some(note) = patch.note {
        validate_optional_text(&note, "note", MAX_NOTE_LEN)?;
        item.note = note;
    }

    if let Some(selections) = &patch.options {
        let menu_item_id = item.menu_item_id.ok_or_else(|| {
            AppError::invalid_request("line has no menu item, options cannot be changed")
        })?;
        let mut resolved = Vec::with_capacity(selections.len());
        for selection in selections {
            let group = menu_repo::find_group(conn, selection.group_id)
                .await?
                .filter(|g| g.menu_item_id == menu_item_id)
                .ok_or_else(|| {
                    AppError::new(ErrorCode::MenuOptionNotFound)
                        .with_detail("group_id", selection.group_id)
                })?;
            let option = menu_repo::find_option(conn, group.id, selection.option_id)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::MenuOptionNotFound)
                        .with_detail("option_id", selection.option_id)
                })?;
            resolved.push((group, option, selection.qty));
        }

        order_repo::delete_customizations(conn, item.id).await?;
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
        item.customization_signature = customization_signature(selections);
    }

    order_repo::update_item_fields(conn, &item).await?;
    load_snapshot(conn, order.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{add_item, create_order};
    use crate::testing::{open_test_shift, seed_menu_item, seed_menu_option, test_ctx, test_db};
    use shared::models::{OptionSelection, OrderAddItem, OrderCreate};

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
                qty: 2.0,
                options: vec![],
                note: None,
            },
        )
        .await
        .unwrap();
        (order.order.id, snap.items[0].item.id)
    }

    #[tokio::test]
    async fn test_patch_qty() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Waiter);
        let (order_id, item_id) = setup(&mut conn).await;

        let patch = OrderItemPatch {
            qty: Some(3.0),
            ..Default::default()
        };
        let snap = update_item(&mut conn, &ctx, order_id, item_id, patch)
            .await
            .unwrap();
        assert_eq!(snap.items[0].item.qty, 3.0);
        assert_eq!(snap.totals.subtotal, 75.0);
    }

    #[tokio::test]
    async fn test_discount_requires_cashier() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let (order_id, item_id) = setup(&mut conn).await;

        let patch = OrderItemPatch {
            discount_percent: Some(10.0),
            ..Default::default()
        };
        let err = update_item(&mut conn, &test_ctx(Role::Waiter), order_id, item_id, patch.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CashierRequired);

        let snap = update_item(&mut conn, &test_ctx(Role::Cashier), order_id, item_id, patch)
            .await
            .unwrap();
        assert_eq!(snap.items[0].item.discount_percent, 10.0);
        assert_eq!(snap.totals.subtotal, 45.0);
    }

    #[tokio::test]
    async fn test_note_clear_vs_untouched() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Waiter);
        let (order_id, item_id) = setup(&mut conn).await;

        let patch = OrderItemPatch {
            note: Some(Some("extra hot".into())),
            ..Default::default()
        };
        let snap = update_item(&mut conn, &ctx, order_id, item_id, patch)
            .await
            .unwrap();
        assert_eq!(snap.items[0].item.note.as_deref(), Some("extra hot"));

        // absent note leaves it alone
        let patch = OrderItemPatch {
            qty: Some(1.0),
            ..Default::default()
        };
        let snap = update_item(&mut conn, &ctx, order_id, item_id, patch)
            .await
            .unwrap();
        assert_eq!(snap.items[0].item.note.as_deref(), Some("extra hot"));

        // explicit null clears it
        let patch = OrderItemPatch {
            note: Some(None),
            ..Default::default()
        };
        let snap = update_item(&mut conn, &ctx, order_id, item_id, patch)
            .await
            .unwrap();
        assert_eq!(snap.items[0].item.note, None);
    }

    #[tokio::test]
    async fn test_options_replaced_wholesale() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Waiter);
        let (order_id, item_id) = setup(&mut conn).await;
        seed_menu_option(&mut conn, 10, 100, 1000, 2.0).await;

        let patch = OrderItemPatch {
            options: Some(vec![OptionSelection {
                group_id: 100,
                option_id: 1000,
                qty: 1,
            }]),
            ..Default::default()
        };
        let snap = update_item(&mut conn, &ctx, order_id, item_id, patch)
            .await
            .unwrap();
        assert_eq!(snap.items[0].customizations.len(), 1);
        // 25*2 + 2 = 52
        assert_eq!(snap.totals.subtotal, 52.0);
        assert!(!snap.items[0].item.customization_signature.is_empty());

        let patch = OrderItemPatch {
            options: Some(vec![]),
            ..Default::default()
        };
        let snap = update_item(&mut conn, &ctx, order_id, item_id, patch)
            .await
            .unwrap();
        assert!(snap.items[0].customizations.is_empty());
        assert!(snap.items[0].item.customization_signature.is_empty());
    }

    #[tokio::test]
    async fn test_item_must_belong_to_order() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Waiter);
        let (_, item_id) = setup(&mut conn).await;
        let other = create_order(&mut conn, &ctx, OrderCreate::default())
            .await
            .unwrap();

        let err = update_item(
            &mut conn,
            &ctx,
            other.order.id,
            item_id,
            OrderItemPatch::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemNotFound);
    }
}
