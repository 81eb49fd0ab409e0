//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. The `Display`
//! text of each variant is the message shown verbatim to the user, so the
//! wording here is user-facing rather than internal.

use thiserror::Error;

/// Which part of the transaction history blocks an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceScope {
    /// A transaction in the currently open period.
    CurrentPeriod,
    /// A transaction in a closed, archived period.
    Archive,
}

impl std::fmt::Display for ReferenceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentPeriod => write!(f, "the current period"),
            Self::Archive => write!(f, "an archived period"),
        }
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Wallet {id} not found")]
    WalletNotFound { id: i64 },

    #[error("Category {id} not found")]
    CategoryNotFound { id: i64 },

    #[error("No open budget period found")]
    PeriodNotFound,

    #[error("Transaction {id} not found")]
    TransactionNotFound { id: i64 },

    #[error("Recurring rule {id} not found")]
    RecurringRuleNotFound { id: i64 },

    #[error("Saving goal {id} not found")]
    SavingGoalNotFound { id: i64 },

    #[error("Debt {id} not found")]
    DebtNotFound { id: i64 },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: i64 },

    #[error("Split amounts must sum to the expense amount (expected {expected}, got {actual})")]
    SplitMismatch { expected: i64, actual: i64 },

    #[error("Wallet '{name}' is still referenced by transactions in {scope}")]
    WalletInUse { name: String, scope: ReferenceScope },

    #[error("Category '{name}' is essential and cannot be deleted")]
    EssentialCategory { name: String },

    #[error("Cannot transfer funds from a wallet to itself")]
    SameWalletTransfer,

    #[error("session invalid")]
    SessionInvalid,
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
