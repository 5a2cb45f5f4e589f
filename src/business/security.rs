//! Password and lock operations
//!
//! Passwords are stored as a salted SHA-256 digest. Repeated failed checks
//! lock the user out for a configurable period.

use chrono::{DateTime, Duration, Utc};
use crate::crypto::{self, PasswordValidator};
use crate::error::{SplitError, Result};
use crate::database::{queries, SecuritySettings};
use crate::utils::now;
use super::ledger::Ledger;

impl Ledger {
    /// Get the security settings of a user
    pub fn get_security_settings(&self, user_id: &str) -> Result<SecuritySettings> {
        queries::get_security_settings(self.conn()?, user_id)?
            .ok_or_else(|| SplitError::UserNotFound(user_id.to_string()))
    }

    /// Check whether the user has a password
    pub fn has_password(&self, user_id: &str) -> Result<bool> {
        queries::has_password(self.conn()?, user_id)?
            .ok_or_else(|| SplitError::UserNotFound(user_id.to_string()))
    }

    /// Set or change the user's password
    ///
    /// The password must satisfy every password rule. Setting a password
    /// also clears any lockout.
    pub fn set_password(&mut self, user_id: &str, password: &str) -> Result<()> {
        let validation = PasswordValidator::validate(password);
        if !validation.is_valid() {
            return Err(SplitError::WeakPassword(validation.errors));
        }

        let salt = crypto::generate_salt();
        let hash = crypto::hash_password(password, &salt)?;
        let changed_at = now();

        self.database()?.transaction(|conn| {
            if !queries::update_password(conn, user_id, &hash, &salt, &changed_at)? {
                return Err(SplitError::UserNotFound(user_id.to_string()));
            }
            queries::update_password_status(conn, user_id, true)?;
            queries::update_failed_login_attempts(conn, user_id, 0)?;
            queries::update_account_lock_status(conn, user_id, false, None)
        })?;

        tracing::info!(user_id = %user_id, "password set");
        Ok(())
    }

    /// Remove the user's password
    ///
    /// Biometric unlock depends on a password and is disabled too.
    pub fn remove_password(&mut self, user_id: &str) -> Result<()> {
        self.database()?.transaction(|conn| {
            if !queries::remove_password(conn, user_id)? {
                return Err(SplitError::UserNotFound(user_id.to_string()));
            }
            queries::update_password_status(conn, user_id, false)?;
            queries::update_biometric_settings(conn, user_id, false)?;
            queries::update_biometric_status(conn, user_id, false)
        })?;

        tracing::info!(user_id = %user_id, "password removed");
        Ok(())
    }

    /// Check a password
    ///
    /// Returns `Ok(false)` for a wrong password or when no password is set.
    /// Each miss counts towards the lockout; while locked out every check
    /// fails with `AccountLocked`.
    pub fn verify_password(&mut self, user_id: &str, password: &str) -> Result<bool> {
        let security = self.get_security_settings(user_id)?;
        let now = now();

        if security.is_locked_at(now) {
            let until = security.lockout_end_time.unwrap_or(DateTime::<Utc>::MAX_UTC);
            return Err(SplitError::AccountLocked { until });
        }
        let lockout_expired = security.account_locked;
        let previous_attempts = if lockout_expired { 0 } else { security.failed_login_attempts };

        // None when the user has no password
        let verified = match (security.password_hash.as_deref(), security.password_salt.as_deref()) {
            (Some(hash), Some(salt)) => Some(crypto::verify_hash(password, salt, hash)?),
            _ => None,
        };
        let failed_attempts = match verified {
            Some(true) => 0,
            Some(false) => previous_attempts + 1,
            None => previous_attempts,
        };
        let lock_until = (verified == Some(false) && failed_attempts >= self.config.max_failed_attempts)
            .then(|| now + Duration::minutes(self.config.lockout_minutes));

        self.database()?.transaction(|conn| {
            if lockout_expired {
                queries::update_account_lock_status(conn, user_id, false, None)?;
            }
            if failed_attempts != security.failed_login_attempts {
                queries::update_failed_login_attempts(conn, user_id, failed_attempts)?;
            }
            if let Some(until) = &lock_until {
                queries::update_account_lock_status(conn, user_id, true, Some(until))?;
            }
            Ok(())
        })?;

        if lockout_expired {
            tracing::info!(user_id = %user_id, "lockout expired");
        }
        if verified == Some(false) {
            tracing::warn!(user_id = %user_id, attempts = failed_attempts, "password verification failed");
        }
        if let Some(until) = lock_until {
            tracing::warn!(user_id = %user_id, until = %until, "user locked out");
        }

        Ok(verified == Some(true))
    }

    /// Clear the lockout and the failed attempt counter
    pub fn unlock_account(&mut self, user_id: &str) -> Result<()> {
        self.database()?.transaction(|conn| {
            if queries::get_security_settings(conn, user_id)?.is_none() {
                return Err(SplitError::UserNotFound(user_id.to_string()));
            }
            queries::update_failed_login_attempts(conn, user_id, 0)?;
            queries::update_account_lock_status(conn, user_id, false, None)
        })
    }

    /// Enable or disable biometric unlock
    pub fn update_biometric_settings(&mut self, user_id: &str, enabled: bool) -> Result<()> {
        self.database()?.transaction(|conn| {
            if !queries::update_biometric_settings(conn, user_id, enabled)? {
                return Err(SplitError::UserNotFound(user_id.to_string()));
            }
            queries::update_biometric_status(conn, user_id, enabled)
        })?;

        tracing::debug!(user_id = %user_id, enabled, "biometric setting changed");
        Ok(())
    }

    /// Require the password when the app starts
    pub fn update_password_on_startup(&mut self, user_id: &str, required: bool) -> Result<()> {
        if !queries::update_password_on_startup(self.conn()?, user_id, required)? {
            return Err(SplitError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }
}
