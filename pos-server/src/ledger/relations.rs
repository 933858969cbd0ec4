//! Account relations — percentage routing rules
//!
//! A relation slices inflows from one account onward to another (tax
//! withholding, franchise royalties). Per (from, kind) the percentages sum
//! to at most 100 so an inflow can never over-allocate.

use std::collections::HashMap;

use crate::core::OpContext;
use crate::db::repository::account as account_repo;
use crate::money::{to_decimal, to_f64, round2};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AccountRelation, AccountTransaction, Direction, RelationEntry, Role};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

use super::load_account;

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Replace the relation set of an account wholesale
pub async fn set_relations(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    from_account_id: i64,
    entries: Vec<RelationEntry>,
) -> AppResult<Vec<AccountRelation>> {
    ctx.ensure_live()?;
    ctx.require_role(Role::Manager)?;

    let from = load_account(conn, from_account_id).await?;

    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    let mut seen: Vec<(i64, &str)> = Vec::new();
    for entry in &entries {
        if entry.kind.trim().is_empty() {
            return Err(AppError::new(ErrorCode::BadAccountRelation)
                .with_detail("reason", "kind cannot be empty"));
        }
        if entry.to_account_id == from.id {
            return Err(AppError::new(ErrorCode::AccountRelationSelf));
        }
        if !(entry.percentage > 0.0 && entry.percentage <= 100.0) {
            return Err(AppError::new(ErrorCode::BadAccountRelationPercentage)
                .with_detail("percentage", entry.percentage));
        }
        let key = (entry.to_account_id, entry.kind.as_str());
        if seen.contains(&key) {
            return Err(AppError::new(ErrorCode::AccountRelationDuplicate)
                .with_detail("to_account_id", entry.to_account_id)
                .with_detail("kind", entry.kind.clone()));
        }
        seen.push(key);

        let target = account_repo::find_by_id(conn, entry.to_account_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::RelationAccountNotFound)
                    .with_detail("to_account_id", entry.to_account_id)
            })?;
        if target.is_shift_managed() {
            return Err(AppError::new(ErrorCode::AccountManagedByShift)
                .with_detail("to_account_id", target.id));
        }

        let sum = totals.entry(entry.kind.as_str()).or_insert(Decimal::ZERO);
        *sum += to_decimal(entry.percentage);
        if *sum > HUNDRED {
            return Err(AppError::new(ErrorCode::AccountRelationPercentageOver100)
                .with_detail("kind", entry.kind.clone()));
        }
    }

    account_repo::delete_relations_from(conn, from.id).await?;
    let mut saved = Vec::with_capacity(entries.len());
    for entry in entries {
        let relation = AccountRelation {
            id: snowflake_id(),
            from_account_id: from.id,
            to_account_id: entry.to_account_id,
            percentage: entry.percentage,
            kind: entry.kind,
        };
        account_repo::insert_relation(conn, &relation).await?;
        saved.push(relation);
    }
    tracing::info!(from_account_id = from.id, relations = saved.len(), "relations replaced");
    Ok(saved)
}

/// Fan a settlement inflow out over the credited account's relations
///
/// Each relation writes an OUT leg on the credited account and an IN leg on
/// its target, both tagged "allocation" with the payment id as source.
pub async fn apply_allocations(
    conn: &mut SqliteConnection,
    ctx: &OpContext,
    account_id: i64,
    amount: f64,
    payment_id: i64,
) -> AppResult<()> {
    let relations = account_repo::list_relations_from(conn, account_id).await?;
    for relation in relations {
        let slice = round2(to_f64(
            to_decimal(amount) * to_decimal(relation.percentage) / HUNDRED,
        ));
        if slice <= 0.0 {
            continue;
        }
        for (acct, direction) in [
            (account_id, Direction::Out),
            (relation.to_account_id, Direction::In),
        ] {
            account_repo::insert_transaction(
                conn,
                &AccountTransaction {
                    id: snowflake_id(),
                    account_id: acct,
                    direction,
                    amount: slice,
                    source_type: "allocation".into(),
                    source_id: Some(payment_id),
                    note: Some(relation.kind.clone()),
                    created_by: ctx.operator.id,
                    created_at: ctx.now,
                },
            )
            .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{open_test_shift, seed_account, test_ctx, test_db};

    fn rel(to: i64, percentage: f64, kind: &str) -> RelationEntry {
        RelationEntry {
            to_account_id: to,
            percentage,
            kind: kind.into(),
        }
    }

    #[tokio::test]
    async fn test_replace_relations() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Manager);
        let from = seed_account(&mut conn, 100, "Sales").await;
        let tax = seed_account(&mut conn, 101, "Tax").await;
        let royalty = seed_account(&mut conn, 102, "Royalty").await;

        let saved = set_relations(
            &mut conn,
            &ctx,
            from,
            vec![rel(tax, 21.0, "tax"), rel(royalty, 5.0, "royalty")],
        )
        .await
        .unwrap();
        assert_eq!(saved.len(), 2);

        // wholesale replace drops the old set
        let saved = set_relations(&mut conn, &ctx, from, vec![rel(tax, 10.0, "tax")])
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].percentage, 10.0);
    }

    #[tokio::test]
    async fn test_same_kind_capped_at_100() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Manager);
        let from = seed_account(&mut conn, 100, "Sales").await;
        let a = seed_account(&mut conn, 101, "A").await;
        let b = seed_account(&mut conn, 102, "B").await;

        // 60 + 50 of the same kind overflows
        let err = set_relations(
            &mut conn,
            &ctx,
            from,
            vec![rel(a, 60.0, "tax"), rel(b, 50.0, "tax")],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountRelationPercentageOver100);

        // different kinds keep independent budgets
        set_relations(
            &mut conn,
            &ctx,
            from,
            vec![rel(a, 60.0, "tax"), rel(b, 50.0, "royalty")],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_bad_entries() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Manager);
        let from = seed_account(&mut conn, 100, "Sales").await;
        let other = seed_account(&mut conn, 101, "Other").await;

        let err = set_relations(&mut conn, &ctx, from, vec![rel(from, 10.0, "tax")])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountRelationSelf);

        let err = set_relations(&mut conn, &ctx, from, vec![rel(other, 0.0, "tax")])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadAccountRelationPercentage);

        let err = set_relations(
            &mut conn,
            &ctx,
            from,
            vec![rel(other, 10.0, "tax"), rel(other, 20.0, "tax")],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountRelationDuplicate);

        let err = set_relations(&mut conn, &ctx, from, vec![rel(31337, 10.0, "tax")])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RelationAccountNotFound);
    }

    #[tokio::test]
    async fn test_shift_managed_target_rejected() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Manager);
        let shift_id = open_test_shift(&mut conn).await;
        let from = seed_account(&mut conn, 100, "Sales").await;

        let drawer =
            crate::db::repository::account::find_shift_account(&mut conn, "vault:cash", shift_id)
                .await
                .unwrap()
                .unwrap();
        let err = set_relations(&mut conn, &ctx, from, vec![rel(drawer.id, 10.0, "tax")])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountManagedByShift);
    }

    #[tokio::test]
    async fn test_allocation_fan_out() {
        let db = test_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let ctx = test_ctx(Role::Manager);
        let from = seed_account(&mut conn, 100, "Sales").await;
        let tax = seed_account(&mut conn, 101, "Tax").await;
        set_relations(&mut conn, &ctx, from, vec![rel(tax, 21.0, "tax")])
            .await
            .unwrap();

        apply_allocations(&mut conn, &ctx, from, 100.0, 777).await.unwrap();

        let entries = account_repo::list_transactions_by_source(&mut conn, "allocation", 777)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        let out = entries.iter().find(|e| e.direction == Direction::Out).unwrap();
        let inflow = entries.iter().find(|e| e.direction == Direction::In).unwrap();
        assert_eq!(out.account_id, from);
        assert_eq!(inflow.account_id, tax);
        assert_eq!(out.amount, 21.0);
        assert_eq!(inflow.amount, 21.0);
    }
}
