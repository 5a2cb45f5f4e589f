//! # SplitBill Core
//!
//! Storage and domain core for an expense-splitting application.
//!
//! ## Features
//!
//! - SQLite database storage with cascading foreign keys
//! - Users, per-user settings and salted password protection
//! - Groups (accounts) with members and shared expenses
//! - Equal and exact expense splits in integer minor units
//! - Per-member balances and minimal settlement transfers
//! - English and Traditional Chinese display strings
//!
//! ## Example
//!
//! ```no_run
//! use splitcore::{Ledger, LedgerConfig, NewExpense, ExpenseCategory, Split};
//! use std::path::Path;
//!
//! let mut ledger = Ledger::create(Path::new("/path/to/data"), LedgerConfig::default()).unwrap();
//! let trip = ledger.create_account("Weekend trip", None, "user1").unwrap();
//! let alice = ledger.add_member(&trip, "user1", "Alice", None).unwrap();
//! let bob = ledger.add_member(&trip, "user2", "Bob", None).unwrap();
//!
//! ledger.add_expense(NewExpense {
//!     account_id: trip.clone(),
//!     title: "Dinner".to_string(),
//!     note: None,
//!     amount: 120_00,
//!     currency: "NT$".to_string(),
//!     category: ExpenseCategory::Food,
//!     paid_by: alice.clone(),
//!     spent_at: None,
//!     split: Split::Equal(vec![]),
//! }).unwrap();
//!
//! let report = ledger.get_settlement_report(&trip).unwrap();
//! for transfer in report.transfers() {
//!     println!("{} pays {} {}", transfer.from_name, transfer.to_name, transfer.amount);
//! }
//! # let _ = bob;
//! ```

pub mod business;
pub mod catalog;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod localization;
pub mod settlement;
pub mod utils;

// Re-export main types
pub use error::{SplitError, Result};
pub use config::LedgerConfig;
pub use database::models::{
    User, UserSettings, PrivacyLevel, SecuritySettings, Account, Member, Expense,
    ExpenseShare, SettlementPayment, LedgerProperties,
};
pub use business::{Ledger, NewExpense, Split, CategoryTotal};
pub use catalog::{ExpenseCategory, Avatar, AvatarType};
pub use crypto::{PasswordValidator, PasswordValidation, PasswordRule};
pub use settlement::{MemberBalance, Settlement, SettlementReport, CurrencySettlement};
pub use localization::Translations;

/// Database schema version
pub const DB_VERSION: &str = "3";

/// Database filename
pub const DATABASE_FILENAME: &str = "splitbill.db";

/// Currency used when none is given
pub const DEFAULT_CURRENCY: &str = "NT$";

/// Salt length in bytes
pub const SALT_LENGTH: usize = 16;

/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Failed password checks allowed before lockout
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Lockout duration after too many failed password checks
pub const LOCKOUT_MINUTES: i64 = 15;

/// Default auto-lock timeout
pub const AUTO_LOCK_TIMEOUT_MINUTES: u32 = 5;

/// Minor units per currency unit (amounts are stored in cents)
pub const MINOR_UNITS: i64 = 100;

/// Largest amount a single expense or payment may have, in minor units
pub const MAX_AMOUNT: i64 = 1_000_000_000_000 * MINOR_UNITS;
