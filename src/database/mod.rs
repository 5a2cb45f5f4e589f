//! Database layer for SplitBill
//!
//! Handles SQLite database operations including:
//! - Schema creation and migrations
//! - CRUD operations for users, settings, accounts, members and expenses
//! - Expense shares and recorded settlement payments

pub mod models;
pub mod schema;
pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::Database;
pub use models::*;
