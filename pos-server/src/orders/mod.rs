//! Order state machine
//!
//! One file per operation. Every mutating operation takes the caller's
//! transaction handle (`&mut SqliteConnection`) plus an [`OpContext`]; rule
//! checks run before any write so the surrounding transaction stays
//! all-or-nothing.
//!
//! Status flow: DRAFT -> OPEN (first item) -> SENT (destination assigned)
//! -> PAID (balance settled) -> CLOSED (explicit close). Admin reopen
//! returns a settled order to OPEN/SENT.

mod add_item;
mod add_payment;
mod change_table;
mod close;
mod create;
mod destination;
mod discard;
mod merge;
pub mod numbering;
mod reopen;
mod signature;
mod snapshot;
mod update_item;
mod update_order;
mod void_item;

pub use add_item::add_item;
pub use add_payment::add_payment;
pub use change_table::change_table;
pub use close::close_order;
pub use create::create_order;
pub use destination::assign_destination;
pub use discard::discard_draft;
pub use merge::merge_orders;
pub use reopen::reopen_order;
pub use signature::customization_signature;
pub use snapshot::load_snapshot;
pub use update_item::update_item;
pub use update_order::update_order;
pub use void_item::void_item;

use crate::db::repository::order as order_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Order;
use sqlx::SqliteConnection;

/// Load an order or fail with the order-not-found code
pub(crate) async fn load_order(conn: &mut SqliteConnection, order_id: i64) -> AppResult<Order> {
    order_repo::find_by_id(conn, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))
}

/// Fail once an order has reached a locked status (paid/closed)
pub(crate) fn ensure_unlocked(order: &Order) -> AppResult<()> {
    if order.status.is_locked() {
        return Err(AppError::new(ErrorCode::OrderLocked)
            .with_detail("order_id", order.id)
            .with_detail("status", format!("{:?}", order.status)));
    }
    Ok(())
}
