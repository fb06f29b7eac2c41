//! Grant entity - Represents every ledger event that touches a user's points.
//!
//! Each grant has a category, amount, memo, `expiration_date`, `owner_id`, and
//! `created_at` timestamp. Earn grants add spendable points; spend and reversal
//! grants are bookkeeping anchors that consumption links hang off of.
//! Rows are append-only: they are never updated or deleted, only superseded by
//! new consumption links.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger category of a grant row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum GrantCategory {
    /// Points credited to the owner (registration bonus, manual credit)
    #[sea_orm(string_value = "earn")]
    Earn,
    /// Anchor row for a spend; its consumption links debit earn grants
    #[sea_orm(string_value = "spend")]
    Spend,
    /// Anchor row for a cancelled spend; its links credit earn grants back
    #[sea_orm(string_value = "spend_reversal")]
    SpendReversal,
}

/// Grant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grants")]
pub struct Model {
    /// Unique identifier for the grant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Whether this row earns points or anchors a spend/reversal
    pub category: GrantCategory,
    /// Point amount; positive for earns, positive magnitude for anchors
    pub amount: i64,
    /// Human-readable description of the event
    pub memo: String,
    /// Last day (inclusive) this grant counts toward the owner's balance
    pub expiration_date: Date,
    /// Opaque user id owning this grant; immutable after creation
    pub owner_id: i64,
    /// When the grant was created; FIFO ordering key for allocation
    pub created_at: DateTimeUtc,
}

/// Grants reference each other only through consumption links, so the entity
/// itself carries no relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
