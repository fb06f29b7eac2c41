/// Database connection and schema management
pub mod database;

/// Reward policy loading from config.toml
pub mod rewards;
