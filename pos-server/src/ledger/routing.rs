//! Payment method routing
//!
//! Maps each payment method to the ledger account its money lands in.
//! Mapping to a keyed system template (the shift drawer) is how cash
//! reaches the per-shift instance: resolution swaps the template for the
//! instance owned by the order's shift.

use crate::core::OpContext;
use crate::db::repository::account as account_repo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Account, PaymentMethod, Role};
use sqlx::SqliteConnection;

use super::load_account;

/// Point a payment method at an account
pub async fn set_payment_method_account(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    method: PaymentMethod,
    account_id: i64,
) -> AppResult<()> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Admin)?;

    let account = load_account(conn, account_id).await?;
    if account.is_shift_managed() {
        // Route via the template; instances come and go with shifts
        return Err(AppError::new(ErrorCode::AccountManagedByShift)
            .with_detail("account_id", account_id));
    }
    account_repo::upsert_method_account(conn, method, account_id).await?;
    tracing::info!(method = method.as_str(), account_id, "payment method routed");
    Ok(())
}

/// Account a payment of this method credits, under the given shift
pub async fn resolve_method_account(
    conn: &mut SqliteConnection,
    method: PaymentMethod,
    shift_id: i64,
) -> AppResult<Account> {
    let mapping = account_repo::find_method_account(conn, method)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::PaymentMethodNotConfigured)
                .with_detail("method", method.as_str())
        })?;

    let account = load_account(conn, mapping.account_id).await?;

    // Keyed templates redirect to their shift-scoped instance
    if let Some(key) = &account.account_key
        && account.shift_id.is_none()
    {
        if let Some(instance) = account_repo::find_shift_account(conn, key, shift_id).await? {
            return Ok(instance);
        }
    }

    if !account.is_active {
        return Err(
            AppError::new(ErrorCode::AccountInactive).with_detail("account_id", account.id)
        );
    }
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{open_test_shift, seed_account, test_ctx, test_db};

    #[tokio::test]
    async fn test_requires_admin() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let bank = seed_account(&mut conn, 100, "Bank").await;

        let err = set_payment_method_account(
            &mut conn,
            &test_ctx(Role::Manager),
            PaymentMethod::Card,
            bank,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
    }

    #[tokio::test]
    async fn test_unconfigured_method() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();

        let err = resolve_method_account(&mut conn, PaymentMethod::Mobile, 1)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentMethodNotConfigured);
    }

    #[tokio::test]
    async fn test_template_resolves_to_shift_instance() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let shift_id = open_test_shift(&mut conn).await;
        set_payment_method_account(&mut conn, &test_ctx(Role::Admin), PaymentMethod::Cash, 1)
            .await
            .unwrap();

        let account = resolve_method_account(&mut conn, PaymentMethod::Cash, shift_id)
            .await
            .unwrap();
        assert_eq!(account.shift_id, Some(shift_id));
        assert_eq!(account.base_account_id, Some(1));
    }

    #[tokio::test]
    async fn test_plain_account_resolves_directly() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let bank = seed_account(&mut conn, 100, "Bank").await;
        set_payment_method_account(&mut conn, &test_ctx(Role::Admin), PaymentMethod::Card, bank)
            .await
            .unwrap();

        let account = resolve_method_account(&mut conn, PaymentMethod::Card, 1)
            .await
            .unwrap();
        assert_eq!(account.id, bank);
    }

    #[tokio::test]
    async fn test_inactive_account_rejected() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let bank = seed_account(&mut conn, 100, "Bank").await;
        set_payment_method_account(&mut conn, &test_ctx(Role::Admin), PaymentMethod::Card, bank)
            .await
            .unwrap();
        sqlx::query("UPDATE account SET is_active = 0 WHERE id = ?")
            .bind(bank)
            .execute(&mut *conn)
            .await
            .unwrap();

        let err = resolve_method_account(&mut conn, PaymentMethod::Card, 1)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountInactive);
    }

    #[tokio::test]
    async fn test_remap_method() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Admin);
        let a = seed_account(&mut conn, 100, "A").await;
        let b = seed_account(&mut conn, 101, "B").await;

        set_payment_method_account(&mut conn, &ctx, PaymentMethod::Card, a)
            .await
            .unwrap();
        set_payment_method_account(&mut conn, &ctx, PaymentMethod::Card, b)
            .await
            .unwrap();
        let account = resolve_method_account(&mut conn, PaymentMethod::Card, 1)
            .await
            .unwrap();
        assert_eq!(account.id, b);
    }
}
