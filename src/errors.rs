use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested spend exceeds the owner's current balance; recoverable
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Points the caller asked to spend
        requested: i64,
        /// Spendable balance at the time of the check
        available: i64,
    },

    /// Referenced grant or spend id does not exist
    #[error("grant {id} not found")]
    GrantNotFound {
        /// The id that failed to resolve
        id: i64,
    },

    /// Negative spend amount or non-positive earn amount
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// Allocation could not cover a balance-checked spend, or a grant was
    /// consumed past its amount; fatal, never retried
    #[error("ledger inconsistency: {message}")]
    LedgerInconsistency {
        /// What disagreed with the invariants
        message: String,
    },

    /// Transaction aborted by concurrent contention; the caller may retry
    /// the whole operation from scratch
    #[error("transaction aborted by concurrent contention")]
    SerializationConflict,

    /// Underlying persistence failure; the transaction has rolled back
    #[error("store failure: {0}")]
    Store(DbErr),

    #[error("Configuration error: {message}")]
    Config {
        /// What failed to load or parse
        message: String,
    },
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        if is_contention(&err) {
            Error::SerializationConflict
        } else {
            Error::Store(err)
        }
    }
}

/// Lock and serialization aborts are retryable by the caller; every other
/// database error is an infra fault.
fn is_contention(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("could not serialize")
        || message.contains("serialization failure")
        || message.contains("deadlock")
        || message.contains("database is locked")
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
