//! Ledger transaction coordinator - the single write path for the ledger.
//!
//! Every mutation (earn, spend, cancellation, forfeiture) funnels through one
//! scoped serializable transaction, so concurrent spends for the same owner
//! serialize instead of double-allocating the same grants, and any failure
//! rolls the whole unit of work back before it propagates.

use std::{future::Future, pin::Pin};

use crate::{
    config::rewards::RewardPolicy,
    core::{allocator, balance},
    entities::{Consumption, Grant, GrantCategory, consumption, grant},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    DatabaseTransaction, IsolationLevel, QueryOrder, Set, TransactionError, TransactionTrait,
    prelude::*,
};
use tracing::{error, info};

/// Outcome of a committed spend: the anchor grant and its debit links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendReceipt {
    /// The spend anchor row
    pub grant: grant::Model,
    /// One negative link per drawn-down earn grant, oldest grant first
    pub links: Vec<consumption::Model>,
}

/// Outcome of a committed cancellation: the reversal anchor and its credits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalReceipt {
    /// The reversal anchor row
    pub grant: grant::Model,
    /// One positive link per original debit, in the original debit order
    pub links: Vec<consumption::Model>,
}

/// Expiration assigned to spend and reversal anchor rows. Anchors never count
/// toward balance, but every ledger row carries a valid expiration date.
fn anchor_expiry() -> Date {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Runs one ledger unit of work inside a serializable transaction.
///
/// This is the only place the crate opens a transaction: commit on success,
/// rollback on any error, and contention surfaced as
/// [`Error::SerializationConflict`] for the caller to retry from scratch.
async fn with_serializable_txn<T, F>(db: &DatabaseConnection, unit: F) -> Result<T>
where
    T: Send,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'c>>
        + Send,
{
    db.transaction_with_config(unit, Some(IsolationLevel::Serializable), None)
        .await
        .map_err(|err| match err {
            TransactionError::Connection(db_err) => Error::from(db_err),
            TransactionError::Transaction(err) => err,
        })
}

/// Records an earn grant crediting `amount` points to `owner_id`.
///
/// The grant stays spendable through `expiration_date` inclusive. Amounts
/// must be positive.
pub async fn record_earn(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: i64,
    memo: String,
    expiration_date: Date,
) -> Result<grant::Model> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }

    let earn = grant::ActiveModel {
        category: Set(GrantCategory::Earn),
        amount: Set(amount),
        memo: Set(memo),
        expiration_date: Set(expiration_date),
        owner_id: Set(owner_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(grant_id = earn.id, owner_id, amount, "recorded earn grant");
    Ok(earn)
}

/// Credits the configured signup bonus to a freshly registered account.
pub async fn grant_signup_bonus(
    db: &DatabaseConnection,
    policy: &RewardPolicy,
    owner_id: i64,
) -> Result<grant::Model> {
    let expires = chrono::Utc::now()
        .date_naive()
        .checked_add_days(chrono::Days::new(policy.earn_validity_days))
        .unwrap_or(NaiveDate::MAX);

    record_earn(db, owner_id, policy.signup_bonus, "signup bonus".to_string(), expires).await
}

/// Spends `amount` points from `owner_id`'s balance, drawing oldest grants
/// first.
///
/// The balance check, the allocation and the writes all happen inside one
/// serializable transaction, so two concurrent spends can never fund
/// themselves from the same remaining balance. A zero-amount spend commits an
/// anchor row with no links.
pub async fn spend(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: i64,
    memo: String,
) -> Result<SpendReceipt> {
    if amount < 0 {
        return Err(Error::InvalidAmount { amount });
    }

    let receipt = with_serializable_txn(db, move |txn| {
        Box::pin(async move {
            let available = balance::remaining_grant_balances(txn, owner_id).await?;
            let balance: i64 = available.iter().map(|b| b.remaining).sum();
            if amount > balance {
                return Err(Error::InsufficientBalance {
                    requested: amount,
                    available: balance,
                });
            }

            let draws = allocator::plan_draws(&available, amount)?;

            let anchor = grant::ActiveModel {
                category: Set(GrantCategory::Spend),
                amount: Set(amount),
                memo: Set(memo),
                expiration_date: Set(anchor_expiry()),
                owner_id: Set(owner_id),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            let mut links = Vec::with_capacity(draws.len());
            for draw in draws {
                let link = consumption::ActiveModel {
                    spend_grant_id: Set(anchor.id),
                    source_grant_id: Set(draw.source_grant_id),
                    amount: Set(-draw.amount),
                    created_at: Set(chrono::Utc::now()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                links.push(link);
            }

            Ok(SpendReceipt {
                grant: anchor,
                links,
            })
        })
    })
    .await
    .inspect_err(|err| {
        if let Error::LedgerInconsistency { message } = err {
            error!(owner_id, amount, %message, "spend aborted on inconsistent ledger state");
        }
    })?;

    info!(
        grant_id = receipt.grant.id,
        owner_id,
        amount,
        draws = receipt.links.len(),
        "committed spend"
    );
    Ok(receipt)
}

/// Cancels a prior spend, crediting back exactly what it drew.
///
/// Each of the spend's debit links is mirrored by a positive credit link
/// against the same source grant, in the original debit order. The credit
/// links hang off a fresh reversal anchor carrying the credited magnitude.
/// Reversing a spend at most once is the caller's responsibility; ids that do
/// not name a spend grant fail with [`Error::GrantNotFound`].
pub async fn cancel_spend(
    db: &DatabaseConnection,
    spend_grant_id: i64,
) -> Result<ReversalReceipt> {
    let receipt = with_serializable_txn(db, move |txn| {
        Box::pin(async move {
            let spend = Grant::find_by_id(spend_grant_id)
                .one(txn)
                .await?
                .filter(|g| g.category == GrantCategory::Spend)
                .ok_or(Error::GrantNotFound { id: spend_grant_id })?;

            let debits = Consumption::find()
                .filter(consumption::Column::SpendGrantId.eq(spend.id))
                .filter(consumption::Column::Amount.lt(0_i64))
                .order_by_asc(consumption::Column::CreatedAt)
                .order_by_asc(consumption::Column::Id)
                .all(txn)
                .await?;

            let credits = allocator::plan_credits(&debits);
            let credited: i64 = credits.iter().map(|c| c.amount).sum();

            let anchor = grant::ActiveModel {
                category: Set(GrantCategory::SpendReversal),
                amount: Set(credited),
                memo: Set(format!("reversal of spend {}", spend.id)),
                expiration_date: Set(anchor_expiry()),
                owner_id: Set(spend.owner_id),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            let mut links = Vec::with_capacity(credits.len());
            for credit in credits {
                let link = consumption::ActiveModel {
                    spend_grant_id: Set(anchor.id),
                    source_grant_id: Set(credit.source_grant_id),
                    amount: Set(credit.amount),
                    created_at: Set(chrono::Utc::now()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                links.push(link);
            }

            Ok(ReversalReceipt {
                grant: anchor,
                links,
            })
        })
    })
    .await?;

    info!(
        reversal_id = receipt.grant.id,
        spend_grant_id,
        credited = receipt.grant.amount,
        "reversed spend"
    );
    Ok(receipt)
}

/// Account-deletion hook: forfeits whatever balance the owner still has.
///
/// Returns `None` when there is nothing to forfeit. The spend re-checks the
/// balance inside its own transaction, so a concurrent spend landing between
/// the read and the forfeiture surfaces as a business error the caller can
/// retry.
pub async fn forfeit_on_deletion(
    db: &DatabaseConnection,
    owner_id: i64,
) -> Result<Option<SpendReceipt>> {
    let available = balance::compute_balance(db, owner_id).await?;
    if available <= 0 {
        return Ok(None);
    }

    let receipt = spend(
        db,
        owner_id,
        available,
        "forfeiture on account deletion".to_string(),
    )
    .await?;
    Ok(Some(receipt))
}
