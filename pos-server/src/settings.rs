//! Store settings
//!
//! The `store_info` singleton carries the knobs the engine reads at run
//! time: business timezone and day cutoff, ledger currency and the
//! cashier-expense gate/cap.

use chrono::NaiveTime;
use chrono_tz::Tz;
use sqlx::SqliteConnection;

use crate::core::OpContext;
use crate::db::repository::store_info as store_repo;
use crate::money;
use crate::utils::validation::validate_name;
use shared::error::{AppError, AppResult};
use shared::models::{Role, StoreInfo, StoreInfoPatch};

pub async fn store_settings(conn: &mut SqliteConnection) -> AppResult<StoreInfo> {
    store_repo::get(conn).await
}

/// Apply a partial update to the store settings. Admin only.
pub async fn update_store_settings(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    patch: StoreInfoPatch,
) -> AppResult<StoreInfo> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Admin)?;

    let mut info = store_repo::get(conn).await?;

    if let Some(name) = patch.name {
        validate_name(&name, "name")?;
        info.name = name.trim().to_string();
    }
    if let Some(timezone) = patch.timezone {
        // The read path falls back to UTC on bad data; writes are strict
        if timezone.parse::<Tz>().is_err() {
            return Err(AppError::validation(format!(
                "Unknown timezone: {}",
                timezone
            )));
        }
        info.timezone = timezone;
    }
    if let Some(cutoff) = patch.business_day_cutoff {
        if NaiveTime::parse_from_str(&cutoff, "%H:%M").is_err() {
            return Err(AppError::validation(format!(
                "business_day_cutoff must be HH:MM, got: {}",
                cutoff
            )));
        }
        info.business_day_cutoff = cutoff;
    }
    if let Some(currency) = patch.currency {
        validate_name(&currency, "currency")?;
        info.currency = currency.trim().to_uppercase();
    }
    if let Some(enabled) = patch.cashier_expenses_enabled {
        info.cashier_expenses_enabled = enabled;
    }
    if let Some(cap) = patch.cashier_expense_cap {
        if let Some(value) = cap {
            money::validate_non_negative(value, "cashier_expense_cap")?;
        }
        info.cashier_expense_cap = cap;
    }

    store_repo::update(conn, &info).await?;
    tracing::info!(
        timezone = %info.timezone,
        cutoff = %info.business_day_cutoff,
        cashier_expenses = info.cashier_expenses_enabled,
        "store settings updated"
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_ctx, test_db};
    use shared::error::ErrorCode;

    #[tokio::test]
    async fn test_requires_admin() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();

        let err = update_store_settings(
            &mut conn,
            &test_ctx(Role::Manager),
            StoreInfoPatch::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
    }

    #[tokio::test]
    async fn test_patch_touches_only_given_fields() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Admin);
        let before = store_settings(&mut conn).await.unwrap();

        let info = update_store_settings(
            &mut conn,
            &ctx,
            StoreInfoPatch {
                timezone: Some("Europe/Madrid".into()),
                cashier_expenses_enabled: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(info.timezone, "Europe/Madrid");
        assert!(info.cashier_expenses_enabled);
        assert_eq!(info.business_day_cutoff, before.business_day_cutoff);
        assert_eq!(info.currency, before.currency);
    }

    #[tokio::test]
    async fn test_bad_timezone_and_cutoff_rejected() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Admin);

        let err = update_store_settings(
            &mut conn,
            &ctx,
            StoreInfoPatch {
                timezone: Some("Mars/Olympus".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = update_store_settings(
            &mut conn,
            &ctx,
            StoreInfoPatch {
                business_day_cutoff: Some("6am".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_cap_set_and_cleared() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Admin);

        let info = update_store_settings(
            &mut conn,
            &ctx,
            StoreInfoPatch {
                cashier_expense_cap: Some(Some(200.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(info.cashier_expense_cap, Some(200.0));

        let info = update_store_settings(
            &mut conn,
            &ctx,
            StoreInfoPatch {
                cashier_expense_cap: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(info.cashier_expense_cap, None);

        let err = update_store_settings(
            &mut conn,
            &ctx,
            StoreInfoPatch {
                cashier_expense_cap: Some(Some(-5.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
    }
}
