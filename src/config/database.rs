//! Database configuration module for the point ledger.
//!
//! Handles the `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without hand-written SQL.

use crate::entities::{Consumption, Grant};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default local
/// `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/point_ledger.sqlite".to_string())
}

/// Establishes a connection to the database using the `DATABASE_URL`
/// environment variable, falling back to a local `SQLite` file when unset.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates the grant and consumption-link tables from the entity definitions.
///
/// Idempotent: existing tables are left alone, so this can run on every
/// service start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut grant_table = schema.create_table_from_entity(Grant);
    grant_table.if_not_exists();
    db.execute(builder.build(&grant_table)).await?;

    let mut consumption_table = schema.create_table_from_entity(Consumption);
    consumption_table.if_not_exists();
    db.execute(builder.build(&consumption_table)).await?;

    Ok(())
}
