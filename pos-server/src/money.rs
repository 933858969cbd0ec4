//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done with `Decimal` internally, then converted to `f64`
//! for storage/serialization. Monetary values round to 2 decimal places,
//! quantities to 3.

use rust_decimal::prelude::*;
use shared::error::{AppError, AppResult, ErrorCode};

/// Rounding for monetary values (2 decimal places, half away from zero)
const MONEY_PLACES: u32 = 2;
/// Rounding for quantities (weighed items)
const QTY_PLACES: u32 = 3;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// An order counts as settled once its balance drops to this or below
pub const BALANCE_EPSILON: f64 = 0.0001;

/// Maximum allowed monetary amount per value
pub const MAX_AMOUNT: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: f64 = 9999.0;

/// Convert an f64 to Decimal for arithmetic
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Round a Decimal to money precision and convert back to f64
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(MONEY_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round an f64 to money precision (2dp, half away from zero)
#[inline]
pub fn round2(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Round an f64 to quantity precision (3dp)
#[inline]
pub fn round_qty(value: f64) -> f64 {
    to_decimal(value)
        .round_dp_with_strategy(QTY_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Whether a balance counts as fully settled
#[inline]
pub fn is_settled(balance: f64) -> bool {
    balance <= BALANCE_EPSILON
}

/// Validate that an f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    Ok(())
}

/// Validate a strictly positive monetary amount within bounds
pub fn validate_amount(value: f64, field_name: &str) -> AppResult<()> {
    require_finite(value, field_name)?;
    if value <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{} must be positive, got {}", field_name, value),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field_name, MAX_AMOUNT, value
            ),
        ));
    }
    Ok(())
}

/// Validate a non-negative monetary amount within bounds
pub fn validate_non_negative(value: f64, field_name: &str) -> AppResult<()> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{} must be non-negative, got {}", field_name, value),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field_name, MAX_AMOUNT, value
            ),
        ));
    }
    Ok(())
}

/// Validate a percentage in [0, 100]
pub fn validate_percent(value: f64, field_name: &str) -> AppResult<()> {
    require_finite(value, field_name)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(AppError::validation(format!(
            "{} must be between 0 and 100, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a line quantity (positive, within bounds)
pub fn validate_qty(value: f64) -> AppResult<()> {
    require_finite(value, "qty")?;
    if value <= 0.0 {
        return Err(AppError::validation(format!(
            "qty must be positive, got {}",
            value
        )));
    }
    if value > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "qty exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, value
        )));
    }
    Ok(())
}
