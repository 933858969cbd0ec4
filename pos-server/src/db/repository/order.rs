//! Order repository

use super::db_err;
use shared::error::AppResult;
use shared::models::{Order, OrderItem, OrderItemCustomization, OrderStatus, Payment};
use sqlx::SqliteConnection;

const ORDER_COLS: &str = "id, business_date, order_no, status, table_id, is_takeaway, customer_id, people_count, discount_amount, discount_percent, service_fee, service_fee_percent, shift_id, created_by, created_at, nickname";

const ITEM_COLS: &str = "id, order_id, menu_item_id, name, qty, unit_price, discount_amount, discount_percent, note, voided, void_reason, void_by, void_at, printer_id, kitchen_printed_at, customization_signature";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Order>> {
    sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_err)
}

/// Non-closed order currently occupying a table
pub async fn find_open_by_table(
    conn: &mut SqliteConnection,
    table_id: i64,
) -> AppResult<Option<Order>> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLS} FROM orders WHERE table_id = ? AND status != 'CLOSED' LIMIT 1"
    ))
    .bind(table_id)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, business_date, order_no, status, table_id, is_takeaway, customer_id, people_count, discount_amount, discount_percent, service_fee, service_fee_percent, shift_id, created_by, created_at, nickname) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(&order.business_date)
    .bind(order.order_no)
    .bind(order.status)
    .bind(order.table_id)
    .bind(order.is_takeaway)
    .bind(order.customer_id)
    .bind(order.people_count)
    .bind(order.discount_amount)
    .bind(order.discount_percent)
    .bind(order.service_fee)
    .bind(order.service_fee_percent)
    .bind(order.shift_id)
    .bind(order.created_by)
    .bind(order.created_at)
    .bind(&order.nickname)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: OrderStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Rewrite the mutable header fields of an order
pub async fn update_header(conn: &mut SqliteConnection, order: &Order) -> AppResult<()> {
    sqlx::query(
        "UPDATE orders SET status = ?, table_id = ?, is_takeaway = ?, customer_id = ?, people_count = ?, discount_amount = ?, discount_percent = ?, service_fee = ?, service_fee_percent = ?, nickname = ? WHERE id = ?",
    )
    .bind(order.status)
    .bind(order.table_id)
    .bind(order.is_takeaway)
    .bind(order.customer_id)
    .bind(order.people_count)
    .bind(order.discount_amount)
    .bind(order.discount_percent)
    .bind(order.service_fee)
    .bind(order.service_fee_percent)
    .bind(&order.nickname)
    .bind(order.id)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn set_destination(
    conn: &mut SqliteConnection,
    id: i64,
    table_id: Option<i64>,
    is_takeaway: bool,
) -> AppResult<()> {
    sqlx::query("UPDATE orders SET table_id = ?, is_takeaway = ? WHERE id = ?")
        .bind(table_id)
        .bind(is_takeaway)
        .bind(id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub async fn list_items(conn: &mut SqliteConnection, order_id: i64) -> AppResult<Vec<OrderItem>> {
    sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLS} FROM order_item WHERE order_id = ? ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(conn)
    .await
    .map_err(db_err)
}

pub async fn find_item(conn: &mut SqliteConnection, item_id: i64) -> AppResult<Option<OrderItem>> {
    sqlx::query_as::<_, OrderItem>(&format!("SELECT {ITEM_COLS} FROM order_item WHERE id = ?"))
        .bind(item_id)
        .fetch_optional(conn)
        .await
        .map_err(db_err)
}

/// Non-voided line on the same order with the same menu item, signature and
/// note, used to merge identical additions
pub async fn find_mergeable_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    menu_item_id: i64,
    signature: &str,
    note: Option<&str>,
) -> AppResult<Option<OrderItem>> {
    sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLS} FROM order_item \
         WHERE order_id = ? AND menu_item_id = ? AND customization_signature = ? \
           AND voided = 0 AND note IS ? AND kitchen_printed_at IS NULL LIMIT 1"
    ))
    .bind(order_id)
    .bind(menu_item_id)
    .bind(signature)
    .bind(note)
    .fetch_optional(conn)
    .await
    .map_err(db_err)
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, menu_item_id, name, qty, unit_price, discount_amount, discount_percent, note, voided, void_reason, void_by, void_at, printer_id, kitchen_printed_at, customization_signature) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.menu_item_id)
    .bind(&item.name)
    .bind(item.qty)
    .bind(item.unit_price)
    .bind(item.discount_amount)
    .bind(item.discount_percent)
    .bind(&item.note)
    .bind(item.voided)
    .bind(&item.void_reason)
    .bind(item.void_by)
    .bind(item.void_at)
    .bind(item.printer_id)
    .bind(item.kitchen_printed_at)
    .bind(&item.customization_signature)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn set_item_qty(conn: &mut SqliteConnection, item_id: i64, qty: f64) -> AppResult<()> {
    sqlx::query("UPDATE order_item SET qty = ? WHERE id = ?")
        .bind(qty)
        .bind(item_id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub async fn update_item_fields(
    conn: &mut SqliteConnection,
    item: &OrderItem,
) -> AppResult<()> {
    sqlx::query(
        "UPDATE order_item SET qty = ?, discount_amount = ?, discount_percent = ?, note = ?, customization_signature = ? WHERE id = ?",
    )
    .bind(item.qty)
    .bind(item.discount_amount)
    .bind(item.discount_percent)
    .bind(&item.note)
    .bind(&item.customization_signature)
    .bind(item.id)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn void_item(
    conn: &mut SqliteConnection,
    item_id: i64,
    reason: &str,
    void_by: i64,
    void_at: i64,
) -> AppResult<()> {
    sqlx::query(
        "UPDATE order_item SET voided = 1, void_reason = ?, void_by = ?, void_at = ? WHERE id = ?",
    )
    .bind(reason)
    .bind(void_by)
    .bind(void_at)
    .bind(item_id)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn delete_item(conn: &mut SqliteConnection, item_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM order_item WHERE id = ?")
        .bind(item_id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub async fn list_customizations(
    conn: &mut SqliteConnection,
    order_item_id: i64,
) -> AppResult<Vec<OrderItemCustomization>> {
    sqlx::query_as::<_, OrderItemCustomization>(
        "SELECT id, order_item_id, group_id, group_name, option_id, option_name, qty, price_delta \
         FROM order_item_customization WHERE order_item_id = ? ORDER BY id",
    )
    .bind(order_item_id)
    .fetch_all(conn)
    .await
    .map_err(db_err)
}

pub async fn insert_customization(
    conn: &mut SqliteConnection,
    c: &OrderItemCustomization,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO order_item_customization (id, order_item_id, group_id, group_name, option_id, option_name, qty, price_delta) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(c.id)
    .bind(c.order_item_id)
    .bind(c.group_id)
    .bind(c.group_name.as_str())
    .bind(c.option_id)
    .bind(c.option_name.as_str())
    .bind(c.qty)
    .bind(c.price_delta)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn delete_customizations(
    conn: &mut SqliteConnection,
    order_item_id: i64,
) -> AppResult<()> {
    sqlx::query("DELETE FROM order_item_customization WHERE order_item_id = ?")
        .bind(order_item_id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub async fn list_payments(conn: &mut SqliteConnection, order_id: i64) -> AppResult<Vec<Payment>> {
    sqlx::query_as::<_, Payment>(
        "SELECT id, order_id, method, amount, reference, created_by, created_at \
         FROM payment WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await
    .map_err(db_err)
}

pub async fn insert_payment(conn: &mut SqliteConnection, payment: &Payment) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO payment (id, order_id, method, amount, reference, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(payment.id)
    .bind(payment.order_id)
    .bind(payment.method)
    .bind(payment.amount)
    .bind(&payment.reference)
    .bind(payment.created_by)
    .bind(payment.created_at)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

pub async fn delete_payments(conn: &mut SqliteConnection, order_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM payment WHERE order_id = ?")
        .bind(order_id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Move all lines from one order to another (merge)
pub async fn move_items(
    conn: &mut SqliteConnection,
    from_order_id: i64,
    to_order_id: i64,
) -> AppResult<()> {
    sqlx::query("UPDATE order_item SET order_id = ? WHERE order_id = ?")
        .bind(to_order_id)
        .bind(from_order_id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Move all payments from one order to another (merge)
pub async fn move_payments(
    conn: &mut SqliteConnection,
    from_order_id: i64,
    to_order_id: i64,
) -> AppResult<()> {
    sqlx::query("UPDATE payment SET order_id = ? WHERE order_id = ?")
        .bind(to_order_id)
        .bind(from_order_id)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}
