//! Order model

use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    /// Created but not yet sent to the kitchen; can be discarded
    #[default]
    Draft,
    /// Confirmed, items still editable
    Open,
    /// Sent to the kitchen; voids are soft from here on
    Sent,
    /// Balance settled
    Paid,
    /// Archived (settled-and-closed, or retired by a merge)
    Closed,
}

impl OrderStatus {
    /// A locked order rejects every mutation except admin reopen
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Paid | Self::Closed)
    }
}

/// Payment method accepted by the payment router
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
    Voucher,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Mobile => "MOBILE",
            Self::Voucher => "VOUCHER",
        }
    }

    /// Parse a wire string; `None` means an unknown method
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(Self::Cash),
            "CARD" => Some(Self::Card),
            "MOBILE" => Some(Self::Mobile),
            "VOUCHER" => Some(Self::Voucher),
            _ => None,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Business date (YYYY-MM-DD, per the store's day cutoff)
    pub business_date: String,
    /// Human-facing sequence number, unique per business date
    pub order_no: i16,
    pub status: OrderStatus,
    pub table_id: Option<i64>,
    pub is_takeaway: bool,
    pub customer_id: Option<i64>,
    pub people_count: Option<i32>,
    /// Flat order-level discount in currency units
    pub discount_amount: f64,
    /// Percentage order-level discount (0..=100)
    pub discount_percent: f64,
    /// Flat service fee in currency units
    pub service_fee: f64,
    /// Percentage service fee on the subtotal
    pub service_fee_percent: f64,
    /// Shift under which the order was created
    pub shift_id: i64,
    pub created_by: i64,
    pub created_at: i64,
    pub nickname: Option<String>,
}

/// Order line item; price and name are snapshots taken at add time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: Option<i64>,
    pub name: String,
    /// Quantity, 3 decimal places (weighed items)
    pub qty: f64,
    pub unit_price: f64,
    pub discount_amount: f64,
    pub discount_percent: f64,
    pub note: Option<String>,
    /// Soft-delete flag; voided lines stay on the order for audit
    pub voided: bool,
    pub void_reason: Option<String>,
    pub void_by: Option<i64>,
    pub void_at: Option<i64>,
    /// Kitchen printer the line routes to (snapshot from the menu item)
    pub printer_id: Option<i64>,
    pub kitchen_printed_at: Option<i64>,
    /// Digest of the sorted option selections, used to merge identical lines
    pub customization_signature: String,
}

/// Customization attached to an order line (snapshot of a menu option)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemCustomization {
    pub id: i64,
    pub order_item_id: i64,
    pub group_id: i64,
    pub group_name: String,
    pub option_id: i64,
    pub option_name: String,
    pub qty: i64,
    pub price_delta: f64,
}

/// Payment row, append-only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub method: PaymentMethod,
    pub amount: f64,
    pub reference: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
}

// ==================== Operation inputs ====================

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderCreate {
    pub table_id: Option<i64>,
    #[serde(default)]
    pub is_takeaway: bool,
    pub customer_id: Option<i64>,
    /// Customer's standing discount percent, folded into the order at
    /// creation only
    pub customer_discount_percent: Option<f64>,
    pub people_count: Option<i32>,
    pub nickname: Option<String>,
}

/// One option chosen when adding or patching an order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionSelection {
    pub group_id: i64,
    pub option_id: i64,
    #[serde(default = "default_option_qty")]
    pub qty: i64,
}

fn default_option_qty() -> i64 {
    1
}

/// Add item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAddItem {
    pub menu_item_id: i64,
    pub qty: f64,
    #[serde(default)]
    pub options: Vec<OptionSelection>,
    pub note: Option<String>,
}

/// Update item payload
///
/// `None` leaves a field untouched. Double-`Option` fields distinguish
/// "leave alone" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderItemPatch {
    pub qty: Option<f64>,
    pub discount_amount: Option<f64>,
    pub discount_percent: Option<f64>,
    #[serde(default, with = "crate::models::double_option")]
    pub note: Option<Option<String>>,
    /// Replaces the customization set wholesale when present
    pub options: Option<Vec<OptionSelection>>,
}

/// Update order payload (partial patch, same presence semantics)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderPatch {
    pub people_count: Option<i32>,
    #[serde(default, with = "crate::models::double_option")]
    pub nickname: Option<Option<String>>,
    #[serde(default, with = "crate::models::double_option")]
    pub customer_id: Option<Option<i64>>,
    pub discount_amount: Option<f64>,
    pub discount_percent: Option<f64>,
    pub service_fee: Option<f64>,
    pub service_fee_percent: Option<f64>,
}

/// Destination assignment payload (table XOR takeaway)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderDestination {
    pub table_id: Option<i64>,
    #[serde(default)]
    pub is_takeaway: bool,
}

/// Add payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAddPayment {
    pub method: PaymentMethod,
    pub amount: f64,
    pub reference: Option<String>,
}

// ==================== Snapshots ====================

/// Computed money totals for an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct OrderTotals {
    /// Sum of non-voided line totals
    pub subtotal: f64,
    /// Final amount after order-level discount and service fee
    pub total: f64,
    /// Sum of payments
    pub paid: f64,
    /// total - paid, may be negative on overpay
    pub balance: f64,
}

/// Order line with its customizations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemSnapshot {
    #[serde(flatten)]
    pub item: OrderItem,
    pub customizations: Vec<OrderItemCustomization>,
}

/// Full order snapshot returned by read and mutate operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemSnapshot>,
    pub payments: Vec<Payment>,
    pub totals: OrderTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_locked() {
        assert!(!OrderStatus::Draft.is_locked());
        assert!(!OrderStatus::Sent.is_locked());
        assert!(OrderStatus::Paid.is_locked());
        assert!(OrderStatus::Closed.is_locked());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("CASH"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("CARD"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("BITCOIN"), None);
        assert_eq!(PaymentMethod::Cash.as_str(), "CASH");
    }

    #[test]
    fn test_item_patch_note_presence() {
        // absent -> leave alone
        let patch: OrderItemPatch = serde_json::from_str(r#"{"qty": 2.0}"#).unwrap();
        assert_eq!(patch.note, None);

        // null -> clear
        let patch: OrderItemPatch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(patch.note, Some(None));

        // value -> set
        let patch: OrderItemPatch = serde_json::from_str(r#"{"note": "no onions"}"#).unwrap();
        assert_eq!(patch.note, Some(Some("no onions".to_string())));
    }
}
