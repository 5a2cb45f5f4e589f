//! Error types for SplitBill Core

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::crypto::PasswordRule;

/// Main error type for ledger operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Database file not found at the specified path
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Database schema is newer than this library understands
    #[error("Invalid database version: {0}")]
    InvalidVersion(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Account (group) not found or inactive
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Member not found or inactive
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// Expense not found or deleted
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    /// Amount is zero, negative or does not match its split
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Password does not satisfy the password rules
    #[error("Weak password: {} rule(s) failed", .0.len())]
    WeakPassword(Vec<PasswordRule>),

    /// Too many failed password checks
    #[error("Account locked until {until}")]
    AccountLocked {
        /// End of the lockout period
        until: DateTime<Utc>,
    },

    /// Balances of one currency do not add up to zero
    #[error("Unbalanced ledger: balances sum to {0}")]
    UnbalancedLedger(i64),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Localization error
    #[error("Localization error: {0}")]
    LocalizationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<rusqlite::Error> for SplitError {
    fn from(err: rusqlite::Error) -> Self {
        SplitError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for SplitError {
    fn from(err: serde_json::Error) -> Self {
        SplitError::ConfigError(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, SplitError>;
