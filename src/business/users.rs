//! User operations
//!
//! This module provides user management operations for the Ledger.

use crate::error::{SplitError, Result};
use crate::database::{queries, SecuritySettings, User, UserSettings};
use super::ledger::Ledger;

impl Ledger {
    /// Get a user by ID
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        queries::get_user_by_id(self.conn()?, user_id)
    }

    /// Get a user by email address
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        queries::get_user_by_email(self.conn()?, email)
    }

    /// Insert a user, replacing an existing user with the same ID
    ///
    /// Default settings and security rows are created for users that do
    /// not have them yet; existing rows are left alone.
    pub fn insert_user(&mut self, user: &User) -> Result<()> {
        let timeout = self.config.auto_lock_timeout_minutes;
        self.database()?.transaction(|conn| {
            queries::insert_user(conn, user)?;
            if queries::get_user_settings(conn, &user.id)?.is_none() {
                queries::insert_user_settings(conn, &UserSettings::new(&user.id, timeout))?;
            }
            if queries::get_security_settings(conn, &user.id)?.is_none() {
                queries::insert_security_settings(conn, &SecuritySettings::new(&user.id, timeout))?;
            }
            Ok(())
        })?;

        tracing::debug!(user_id = %user.id, "saved user");
        Ok(())
    }

    /// Get a user, creating one with default settings if it does not exist
    pub fn get_or_create_user(&mut self, user_id: &str, name: &str, email: &str) -> Result<User> {
        if let Some(user) = self.get_user(user_id)? {
            return Ok(user);
        }

        let user = User::new(user_id, name, email);
        self.insert_user(&user)?;
        tracing::info!(user_id = %user_id, "created user");
        Ok(user)
    }

    /// Update profile fields of a user
    pub fn update_user_profile(
        &mut self,
        user_id: &str,
        name: &str,
        email: &str,
        avatar_url: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SplitError::InvalidOperation("User name cannot be empty".to_string()));
        }

        let updated = queries::update_user_profile(self.conn()?, user_id, name, email, avatar_url, phone_number)?;
        if !updated {
            return Err(SplitError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    /// Delete a user together with their settings
    pub fn delete_user(&mut self, user_id: &str) -> Result<()> {
        if !queries::delete_user(self.conn()?, user_id)? {
            return Err(SplitError::UserNotFound(user_id.to_string()));
        }
        tracing::info!(user_id = %user_id, "deleted user");
        Ok(())
    }

    /// Get a user or fail with `UserNotFound`
    pub(crate) fn require_user(&self, user_id: &str) -> Result<User> {
        self.get_user(user_id)?
            .ok_or_else(|| SplitError::UserNotFound(user_id.to_string()))
    }
}
