//! Paged grant history for an owner.
//!
//! Backs the history endpoint of the point API surface: every ledger event
//! for a user, newest first, optionally narrowed to one category.

use crate::{
    entities::{Grant, GrantCategory, grant},
    errors::Result,
};
use sea_orm::{PaginatorTrait, QueryOrder, prelude::*};

/// One page of an owner's grant history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    /// Grants on this page, newest first
    pub items: Vec<grant::Model>,
    /// 1-based page number that was fetched
    pub page: u64,
    /// Page size used for the query
    pub per_page: u64,
    /// Total grants matching the filter
    pub total_items: u64,
    /// Total pages at this page size
    pub total_pages: u64,
}

/// Lists an owner's grants newest first, optionally filtered by category.
///
/// Pages are 1-based; page 0 reads as the first page and a zero `per_page`
/// as 1. Pages past the end come back empty with the totals still filled in.
pub async fn list_history(
    db: &DatabaseConnection,
    owner_id: i64,
    category: Option<GrantCategory>,
    page: u64,
    per_page: u64,
) -> Result<HistoryPage> {
    let per_page = per_page.max(1);
    let page = page.max(1);

    let mut query = Grant::find().filter(grant::Column::OwnerId.eq(owner_id));
    if let Some(category) = category {
        query = query.filter(grant::Column::Category.eq(category));
    }

    let paginator = query
        .order_by_desc(grant::Column::CreatedAt)
        .order_by_desc(grant::Column::Id)
        .paginate(db, per_page);

    let totals = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(HistoryPage {
        items,
        page,
        per_page,
        total_items: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}
