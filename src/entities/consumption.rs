//! Consumption-link entity - Records how a spend drew from specific grants.
//!
//! Each row pairs one spend-side anchor grant (`spend_grant_id`) with one
//! earn-side source grant (`source_grant_id`). The amount is negative when a
//! spend debits the source grant and positive when a reversal credits it back.
//! Links are immutable once committed; cancellation writes new credit links
//! rather than editing existing ones.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Consumption-link database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consumption_links")]
pub struct Model {
    /// Unique identifier for the link
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The spend or reversal anchor grant this link belongs to
    pub spend_grant_id: i64,
    /// The earn grant being drawn down or credited back
    pub source_grant_id: i64,
    /// Negative for a debit, positive for a reversal credit
    pub amount: i64,
    /// When the link was created; reversals replay debits in this order
    pub created_at: DateTimeUtc,
}

/// Both ends of a link point at the grants table.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The anchor grant the link belongs to
    #[sea_orm(
        belongs_to = "super::grant::Entity",
        from = "Column::SpendGrantId",
        to = "super::grant::Column::Id"
    )]
    SpendGrant,
    /// The earn grant the link draws from
    #[sea_orm(
        belongs_to = "super::grant::Entity",
        from = "Column::SourceGrantId",
        to = "super::grant::Column::Id"
    )]
    SourceGrant,
}

impl ActiveModelBehavior for ActiveModel {}
