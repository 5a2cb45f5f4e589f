//! User settings operations

use crate::error::{SplitError, Result};
use crate::database::{queries, PrivacyLevel, UserSettings};
use super::ledger::Ledger;

impl Ledger {
    /// Get the settings of a user
    pub fn get_user_settings(&self, user_id: &str) -> Result<UserSettings> {
        queries::get_user_settings(self.conn()?, user_id)?
            .ok_or_else(|| SplitError::UserNotFound(user_id.to_string()))
    }

    /// Replace all settings of a user
    pub fn update_user_settings(&mut self, settings: &UserSettings) -> Result<()> {
        self.require_user(&settings.user_id)?;
        queries::insert_user_settings(self.conn()?, settings)
    }

    /// Enable or disable all notifications
    pub fn update_notification_settings(&mut self, user_id: &str, enabled: bool) -> Result<()> {
        let updated = queries::update_notification_settings(self.conn()?, user_id, enabled)?;
        settings_found(updated, user_id)
    }

    /// Enable or disable email notifications
    pub fn update_email_notifications(&mut self, user_id: &str, enabled: bool) -> Result<()> {
        let updated = queries::update_email_notifications(self.conn()?, user_id, enabled)?;
        settings_found(updated, user_id)
    }

    /// Enable or disable push notifications
    pub fn update_push_notifications(&mut self, user_id: &str, enabled: bool) -> Result<()> {
        let updated = queries::update_push_notifications(self.conn()?, user_id, enabled)?;
        settings_found(updated, user_id)
    }

    /// Change who can see the user's profile
    pub fn update_privacy_level(&mut self, user_id: &str, level: PrivacyLevel) -> Result<()> {
        let updated = queries::update_privacy_level(self.conn()?, user_id, level)?;
        settings_found(updated, user_id)
    }

    /// Update auto-lock preferences
    pub fn update_auto_lock_settings(&mut self, user_id: &str, enabled: bool, timeout_minutes: u32) -> Result<()> {
        if enabled && timeout_minutes == 0 {
            return Err(SplitError::InvalidOperation(
                "Auto-lock timeout must be at least one minute".to_string()
            ));
        }
        let updated = queries::update_auto_lock_settings(self.conn()?, user_id, enabled, timeout_minutes)?;
        settings_found(updated, user_id)
    }
}

fn settings_found(updated: bool, user_id: &str) -> Result<()> {
    if updated {
        Ok(())
    } else {
        Err(SplitError::UserNotFound(user_id.to_string()))
    }
}
