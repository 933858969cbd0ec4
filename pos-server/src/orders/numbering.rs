//! Order numbering — per-business-date atomic sequence
//!
//! A single upsert-returning statement on `order_counter` keeps numbers
//! unique under concurrent callers and across server processes. The
//! sequence is gapless-enough: a rolled-back creation may leave a gap.

use crate::db::repository::db_err;
use shared::error::{AppError, AppResult, ErrorCode};
use sqlx::SqliteConnection;

/// Allocate the next order number for a business date
pub async fn next_order_no(conn: &mut SqliteConnection, business_date: &str) -> AppResult<i16> {
    let next: i64 = sqlx::query_scalar(
        "INSERT INTO order_counter (business_date, next_no) VALUES (?, 1) \
         ON CONFLICT(business_date) DO UPDATE SET next_no = next_no + 1 \
         RETURNING next_no",
    )
    .bind(business_date)
    .fetch_one(conn)
    .await
    .map_err(db_err)?;

    if next > i16::MAX as i64 {
        return Err(
            AppError::new(ErrorCode::CounterExhausted).with_detail("business_date", business_date)
        );
    }
    Ok(next as i16)
}
