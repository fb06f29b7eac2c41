//! Balance calculation - per-grant remaining balances and the spendable sum.
//!
//! Everything here is a pure read, generic over `ConnectionTrait` so callers
//! can run it against the live connection or inside an open transaction and
//! observe the same snapshot a subsequent allocation will use.

use std::collections::HashMap;

use crate::{
    entities::{Consumption, Grant, GrantCategory, consumption, grant},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};

/// Remaining balance of one unexpired earn grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantBalance {
    /// The earn grant's id
    pub grant_id: i64,
    /// The grant's amount plus the sum of its linked consumption amounts
    pub remaining: i64,
}

/// Returns the owner's unexpired earn grants in FIFO order (`created_at`
/// ascending, id as tie-break) with each grant's remaining balance.
///
/// Grants drawn down to zero are included; callers that only want spendable
/// grants filter on `remaining > 0`. A grant consumed past its amount fails
/// the read with [`Error::LedgerInconsistency`].
pub async fn remaining_grant_balances<C>(conn: &C, owner_id: i64) -> Result<Vec<GrantBalance>>
where
    C: ConnectionTrait,
{
    let today = chrono::Utc::now().date_naive();

    let grants = Grant::find()
        .filter(grant::Column::OwnerId.eq(owner_id))
        .filter(grant::Column::Category.eq(GrantCategory::Earn))
        .filter(grant::Column::ExpirationDate.gte(today))
        .order_by_asc(grant::Column::CreatedAt)
        .order_by_asc(grant::Column::Id)
        .all(conn)
        .await?;

    if grants.is_empty() {
        return Ok(Vec::new());
    }

    let links = Consumption::find()
        .filter(consumption::Column::SourceGrantId.is_in(grants.iter().map(|g| g.id)))
        .all(conn)
        .await?;

    let mut consumed: HashMap<i64, i64> = HashMap::new();
    for link in links {
        *consumed.entry(link.source_grant_id).or_insert(0) += link.amount;
    }

    grants
        .iter()
        .map(|g| {
            let remaining = g.amount + consumed.get(&g.id).copied().unwrap_or(0);
            if remaining < 0 {
                return Err(Error::LedgerInconsistency {
                    message: format!("grant {} consumed past its amount ({remaining})", g.id),
                });
            }
            Ok(GrantBalance {
                grant_id: g.id,
                remaining,
            })
        })
        .collect()
}

/// Computes the owner's current spendable balance.
///
/// Sums the remaining balances of all unexpired earn grants, returning 0 when
/// the owner has none. Run this inside the same transaction as a subsequent
/// allocation to avoid a race between check and spend.
pub async fn compute_balance<C>(conn: &C, owner_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let balances = remaining_grant_balances(conn, owner_id).await?;
    Ok(balances.iter().map(|b| b.remaining).sum())
}
