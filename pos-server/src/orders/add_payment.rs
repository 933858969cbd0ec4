//! Record a payment against an order
//!
//! The amount lands in the account the payment router picks for the
//! method, then fans out over that account's percentage relations. Once
//! the balance settles the order flips to PAID.

use crate::core::OpContext;
use crate::db::repository::{account as account_repo, order as order_repo};
use crate::ledger::{relations, routing};
use crate::money::{self, to_decimal, MONEY_TOLERANCE};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AccountTransaction, Direction, OrderAddPayment, OrderSnapshot, OrderStatus, Payment, Role,
};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::snapshot::{load_snapshot, snapshot_of};
use super::{ensure_unlocked, load_order};

pub async fn add_payment(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    order_id: i64,
    input: OrderAddPayment,
) -> AppResult<OrderSnapshot> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Cashier)?;
    money::validate_amount(input.amount, "amount")?;

    let order = load_order(conn, order_id).await?;
    ensure_unlocked(&order)?;

    let current = snapshot_of(conn, order.clone()).await?;
    let remaining = to_decimal(current.totals.balance);
    if to_decimal(input.amount) > remaining + MONEY_TOLERANCE {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!(
                "payment {} exceeds remaining balance {}",
                input.amount, current.totals.balance
            ),
        ));
    }

    let account = routing::resolve_method_account(conn, input.method, order.shift_id).await?;

    let payment = Payment {
        id: snowflake_id(),
        order_id: order.id,
        method: input.method,
        amount: money::round2(input.amount),
        reference: input.reference,
        created_by: ctx.operator.id,
        created_at: ctx.now,
    };
    order_repo::insert_payment(conn, &payment).await?;

    account_repo::insert_transaction(
        conn,
        &AccountTransaction {
            id: snowflake_id(),
            account_id: account.id,
            direction: Direction::In,
            amount: payment.amount,
            source_type: "payment".into(),
            source_id: Some(payment.id),
            note: None,
            created_by: ctx.operator.id,
            created_at: ctx.now,
        },
    )
    .await?;

    // Percentage relations route slices of the inflow onward
    relations::apply_allocations(conn, ctx, account.id, payment.amount, payment.id).await?;

    let snapshot = load_snapshot(conn, order.id).await?;
    if money::is_settled(snapshot.totals.balance) {
        order_repo::set_status(conn, order.id, OrderStatus::Paid).await?;
        tracing::info!(
            order_id = order.id,
            paid = snapshot.totals.paid,
            "order settled"
        );
        return load_snapshot(conn, order.id).await;
    }

    tracing::debug!(
        order_id = order.id,
        method = input.method.as_str(),
        amount = payment.amount,
        balance = snapshot.totals.balance,
        "payment recorded"
    );
    Ok(snapshot)
}
