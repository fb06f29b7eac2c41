//! Shared test utilities for the point ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating ledger rows with sensible defaults.

use crate::{
    core::ledger,
    entities::{consumption, grant},
    errors::Result,
};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Owner id used across tests.
pub const OWNER: i64 = 7;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an earn grant with sensible defaults.
///
/// # Defaults
/// * `memo`: `"Test earn"`
/// * `expiration_date`: 30 days out
pub async fn create_test_earn(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: i64,
) -> Result<grant::Model> {
    let expires = Utc::now().date_naive() + Days::new(30);
    ledger::record_earn(db, owner_id, amount, "Test earn".to_string(), expires).await
}

/// Creates an earn grant with a custom expiration date.
/// Use this for expiration-boundary scenarios.
pub async fn create_expiring_earn(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: i64,
    expiration_date: NaiveDate,
) -> Result<grant::Model> {
    ledger::record_earn(db, owner_id, amount, "Test earn".to_string(), expiration_date).await
}

/// Inserts a raw consumption link, bypassing the coordinator.
/// Used to set up corrupted ledger states the invariant checks must catch.
pub async fn insert_raw_link(
    db: &DatabaseConnection,
    spend_grant_id: i64,
    source_grant_id: i64,
    amount: i64,
) -> Result<consumption::Model> {
    consumption::ActiveModel {
        spend_grant_id: Set(spend_grant_id),
        source_grant_id: Set(source_grant_id),
        amount: Set(amount),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a database with one funded owner.
/// Returns (db, `owner_id`) for common test scenarios.
pub async fn setup_with_funds(amount: i64) -> Result<(DatabaseConnection, i64)> {
    let db = setup_test_db().await?;
    create_test_earn(&db, OWNER, amount).await?;
    Ok((db, OWNER))
}
