//! Reward policy loading from config.toml
//!
//! The ledger's convenience operations (signup bonus) read their amounts and
//! validity windows from a TOML file so operators can tune the policy without
//! a rebuild. A missing or unreadable file falls back to the built-in
//! defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Reward policy section
    pub rewards: RewardPolicy,
}

/// Amounts and windows applied when the ledger credits points on its own.
#[derive(Debug, Deserialize, Clone)]
pub struct RewardPolicy {
    /// Points credited to a freshly registered account
    pub signup_bonus: i64,
    /// Days an earn grant stays spendable from its creation
    pub earn_validity_days: u64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            signup_bonus: 20_000,
            earn_validity_days: 365,
        }
    }
}

/// Loads the reward policy from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the reward policy from ./config.toml, or the defaults when the file
/// is absent or malformed.
pub fn load_default_policy() -> RewardPolicy {
    load_config("config.toml").map_or_else(
        |err| {
            tracing::warn!("falling back to default reward policy: {err}");
            RewardPolicy::default()
        },
        |config| config.rewards,
    )
}
