//! Business logic layer for SplitBill
//!
//! This module provides the high-level Ledger API for managing users,
//! groups, members, expenses and settlements.

pub mod ledger;
pub mod users;
pub mod settings;
pub mod security;
pub mod accounts;
pub mod members;
pub mod expenses;
pub mod settlements;

pub use ledger::Ledger;
pub use expenses::{CategoryTotal, NewExpense, Split};
