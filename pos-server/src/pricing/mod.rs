//! Pricing engine — pure total computation
//!
//! No I/O here: callers load the order, its lines and payments, and hand
//! them over. All arithmetic runs on `Decimal`.
//!
//! Formulas:
//! - line gross = round2(unit_price * qty + Σ option_delta * option_qty)
//! - line total = gross - discount_amount - gross * discount_percent / 100,
//!   clamped to >= 0
//! - subtotal = Σ line totals over non-voided lines
//! - total = round2(subtotal - discount_amount
//!   - subtotal * discount_percent / 100 + service_fee
//!   + subtotal * service_fee_percent / 100), clamped to >= 0
//! - balance = total - paid

use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderItemCustomization, OrderItemSnapshot, OrderTotals, Payment};

use crate::money::{to_decimal, to_f64};

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Total for a single line, customization deltas and line discounts applied
pub fn line_total(item: &OrderItem, customizations: &[OrderItemCustomization]) -> f64 {
    let mut gross = to_decimal(item.unit_price) * to_decimal(item.qty);
    for c in customizations {
        gross += to_decimal(c.price_delta) * Decimal::from(c.qty);
    }
    // Round the gross before applying discounts so the percent discount
    // works on the displayed line amount
    gross = to_decimal(to_f64(gross));

    let discounted =
        gross - to_decimal(item.discount_amount) - gross * to_decimal(item.discount_percent) / HUNDRED;
    to_f64(discounted.max(Decimal::ZERO))
}

/// Subtotal over non-voided lines
pub fn subtotal(items: &[OrderItemSnapshot]) -> f64 {
    let sum = items
        .iter()
        .filter(|line| !line.item.voided)
        .map(|line| to_decimal(line_total(&line.item, &line.customizations)))
        .sum::<Decimal>();
    to_f64(sum)
}

/// Order total from a subtotal and the order-level adjustments
pub fn order_total(order: &Order, subtotal: f64) -> f64 {
    let sub = to_decimal(subtotal);
    let total = sub - to_decimal(order.discount_amount) - sub * to_decimal(order.discount_percent)
        / HUNDRED
        + to_decimal(order.service_fee)
        + sub * to_decimal(order.service_fee_percent) / HUNDRED;
    to_f64(total.max(Decimal::ZERO))
}

/// Sum of payments
pub fn paid_total(payments: &[Payment]) -> f64 {
    let sum = payments.iter().map(|p| to_decimal(p.amount)).sum::<Decimal>();
    to_f64(sum)
}

/// Full totals for an order
pub fn compute_totals(
    order: &Order,
    items: &[OrderItemSnapshot],
    payments: &[Payment],
) -> OrderTotals {
    let subtotal = subtotal(items);
    let total = order_total(order, subtotal);
    let paid = paid_total(payments);
    let balance = to_f64(to_decimal(total) - to_decimal(paid));
    OrderTotals {
        subtotal,
        total,
        paid,
        balance,
    }
}
