//! Data models for SplitBill database entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::catalog::ExpenseCategory;

/// Database properties and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerProperties {
    /// Unique database identifier (32 chars)
    pub database_id: String,
    /// Language code (e.g., "en", "zh-TW")
    pub lang: String,
    /// Database schema version
    pub version: String,
    /// Creation timestamp
    pub create_timestamp: Option<DateTime<Utc>>,
    /// Last update timestamp
    pub update_timestamp: Option<DateTime<Utc>>,
}

impl Default for LedgerProperties {
    fn default() -> Self {
        Self {
            database_id: String::new(),
            lang: "en".to_string(),
            version: crate::DB_VERSION.to_string(),
            create_timestamp: None,
            update_timestamp: None,
        }
    }
}

/// Application user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Mirrors whether a password hash is stored in the security settings
    pub has_password: bool,
    pub biometric_enabled: bool,
}

impl User {
    /// New user with no password and no optional profile fields
    pub fn new(id: &str, name: &str, email: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar_url: None,
            phone_number: None,
            created_at: crate::utils::now(),
            has_password: false,
            biometric_enabled: false,
        }
    }
}

/// Who can see a user's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivacyLevel {
    Public,
    Normal,
    Private,
}

impl PrivacyLevel {
    /// Code stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyLevel::Public => "PUBLIC",
            PrivacyLevel::Normal => "NORMAL",
            PrivacyLevel::Private => "PRIVATE",
        }
    }

    /// Parse a stored code; unknown codes fall back to `Normal`
    pub fn from_code(code: &str) -> Self {
        match code {
            "PUBLIC" => PrivacyLevel::Public,
            "PRIVATE" => PrivacyLevel::Private,
            _ => PrivacyLevel::Normal,
        }
    }

    /// Localization key for display
    pub fn label_key(&self) -> &'static str {
        match self {
            PrivacyLevel::Public => "privacy_public",
            PrivacyLevel::Normal => "privacy_normal",
            PrivacyLevel::Private => "privacy_private",
        }
    }
}

impl Default for PrivacyLevel {
    fn default() -> Self {
        PrivacyLevel::Normal
    }
}

/// Per-user application preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub privacy_level: PrivacyLevel,
    pub auto_lock_enabled: bool,
    pub auto_lock_timeout_minutes: u32,
}

impl UserSettings {
    /// Default settings for a user
    pub fn new(user_id: &str, auto_lock_timeout_minutes: u32) -> Self {
        Self {
            user_id: user_id.to_string(),
            notifications_enabled: true,
            email_notifications: true,
            push_notifications: true,
            privacy_level: PrivacyLevel::Normal,
            auto_lock_enabled: false,
            auto_lock_timeout_minutes,
        }
    }
}

/// Password and lock state of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub user_id: String,
    /// Base64 SHA-256 digest of salt + password
    pub password_hash: Option<String>,
    /// Base64 salt
    pub password_salt: Option<String>,
    pub biometric_enabled: bool,
    pub require_password_on_startup: bool,
    pub auto_lock_enabled: bool,
    pub auto_lock_timeout_minutes: u32,
    pub last_password_change: Option<DateTime<Utc>>,
    pub failed_login_attempts: u32,
    pub account_locked: bool,
    pub lockout_end_time: Option<DateTime<Utc>>,
}

impl SecuritySettings {
    /// Default security settings for a user (no password)
    pub fn new(user_id: &str, auto_lock_timeout_minutes: u32) -> Self {
        Self {
            user_id: user_id.to_string(),
            password_hash: None,
            password_salt: None,
            biometric_enabled: false,
            require_password_on_startup: false,
            auto_lock_enabled: false,
            auto_lock_timeout_minutes,
            last_password_change: None,
            failed_login_attempts: 0,
            account_locked: false,
            lockout_end_time: None,
        }
    }

    /// True while a lockout is in effect at `now`
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        match (self.account_locked, self.lockout_end_time) {
            (false, _) => false,
            (true, Some(end)) => now < end,
            (true, None) => true,
        }
    }
}

/// Expense-splitting group (stored as an account)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// User ID of the creator
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Membership of a person in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub account_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A recorded cost paid by one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub account_id: String,
    pub title: String,
    pub note: Option<String>,
    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    pub category: ExpenseCategory,
    /// Member ID of the payer
    pub paid_by: String,
    pub spent_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_settled: bool,
    pub is_deleted: bool,
}

/// Part of an expense owed by one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub expense_id: String,
    pub member_id: String,
    /// Share in minor units
    pub share: i64,
}

/// A transfer recorded between two members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPayment {
    pub id: String,
    pub account_id: String,
    pub from_member: String,
    pub to_member: String,
    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}
