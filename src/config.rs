//! Ledger configuration
//!
//! Configuration is optional: every field has a default, and a JSON file
//! only needs to name the values it overrides.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::Result;

/// Runtime configuration for a [`Ledger`](crate::Ledger)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Database file name inside the ledger folder
    pub database_filename: String,
    /// Language code stored in the database properties
    pub lang: String,
    /// Currency used by expenses created without one
    pub default_currency: String,
    /// Failed password checks allowed before the user is locked out
    pub max_failed_attempts: u32,
    /// Lockout duration in minutes
    pub lockout_minutes: i64,
    /// Auto-lock timeout for new users
    pub auto_lock_timeout_minutes: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            database_filename: crate::DATABASE_FILENAME.to_string(),
            lang: "en".to_string(),
            default_currency: crate::DEFAULT_CURRENCY.to_string(),
            max_failed_attempts: crate::MAX_FAILED_ATTEMPTS,
            lockout_minutes: crate::LOCKOUT_MINUTES,
            auto_lock_timeout_minutes: crate::AUTO_LOCK_TIMEOUT_MINUTES,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        tracing::debug!(lang = %config.lang, currency = %config.default_currency, "loaded ledger config");
        Ok(config)
    }
}
