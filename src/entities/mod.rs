//! Entity module - Contains all SeaORM entity definitions for the ledger.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod consumption;
pub mod grant;

// Re-export specific types to avoid conflicts
pub use consumption::{
    Column as ConsumptionColumn, Entity as Consumption, Model as ConsumptionModel,
};
pub use grant::{Column as GrantColumn, Entity as Grant, GrantCategory, Model as GrantModel};
