//! Account (group) operations
//!
//! This module provides group management operations for the Ledger.

use crate::error::{SplitError, Result};
use crate::database::{queries, Account};
use crate::utils::{generate_entity_id, now};
use super::ledger::Ledger;

impl Ledger {
    /// Get all active accounts, most recently updated first
    pub fn get_all_accounts(&self) -> Result<Vec<Account>> {
        queries::get_all_active_accounts(self.conn()?)
    }

    /// Get an account by ID, including inactive ones
    pub fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        queries::get_account_by_id(self.conn()?, account_id)
    }

    /// Get active accounts created by a user
    pub fn get_accounts_by_user(&self, user_id: &str) -> Result<Vec<Account>> {
        queries::get_accounts_by_user(self.conn()?, user_id)
    }

    /// Count active accounts
    pub fn get_account_count(&self) -> Result<u32> {
        queries::get_active_account_count(self.conn()?)
    }

    /// Create a new account and return its ID
    pub fn create_account(&mut self, name: &str, description: Option<&str>, created_by: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::InvalidOperation("Account name cannot be empty".to_string()));
        }

        let now = now();
        let account = Account {
            id: generate_entity_id(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
            is_active: true,
        };
        queries::insert_account(self.conn()?, &account)?;

        tracing::info!(account_id = %account.id, "created account");
        Ok(account.id)
    }

    /// Save changes to an account
    ///
    /// `updated_at` is set to the current time; the stored creator and
    /// creation time are never changed.
    pub fn update_account(&mut self, account: &Account) -> Result<()> {
        if account.name.trim().is_empty() {
            return Err(SplitError::InvalidOperation("Account name cannot be empty".to_string()));
        }

        let mut updated = account.clone();
        updated.updated_at = now();
        if !queries::update_account(self.conn()?, &updated)? {
            return Err(SplitError::AccountNotFound(account.id.clone()));
        }
        Ok(())
    }

    /// Deactivate an account, keeping its history
    pub fn delete_account(&mut self, account_id: &str) -> Result<()> {
        if !queries::delete_account(self.conn()?, account_id)? {
            return Err(SplitError::AccountNotFound(account_id.to_string()));
        }
        tracing::info!(account_id = %account_id, "deactivated account");
        Ok(())
    }

    /// Delete an account with its members, expenses and payments
    pub fn purge_account(&mut self, account_id: &str) -> Result<()> {
        if !queries::purge_account(self.conn()?, account_id)? {
            return Err(SplitError::AccountNotFound(account_id.to_string()));
        }
        tracing::info!(account_id = %account_id, "purged account");
        Ok(())
    }

    /// Get an active account or fail with `AccountNotFound`
    pub(crate) fn require_active_account(&self, account_id: &str) -> Result<Account> {
        self.get_account(account_id)?
            .filter(|a| a.is_active)
            .ok_or_else(|| SplitError::AccountNotFound(account_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::business::ledger::tests::create_test_ledger;
    use crate::error::SplitError;

    #[test]
    fn test_create_and_get_account() {
        let (mut ledger, _temp) = create_test_ledger();
        let id = ledger.create_account("  週末旅行 ", Some("Hualien"), "user1").unwrap();

        let account = ledger.get_account(&id).unwrap().unwrap();
        assert_eq!(account.name, "週末旅行");
        assert_eq!(account.description.as_deref(), Some("Hualien"));
        assert_eq!(account.created_by, "user1");
        assert!(account.is_active);
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn test_empty_name_rejected() {
        let (mut ledger, _temp) = create_test_ledger();
        assert!(matches!(
            ledger.create_account("   ", None, "user1"),
            Err(SplitError::InvalidOperation(_))
        ));
        assert_eq!(ledger.get_account_count().unwrap(), 0);
    }

    #[test]
    fn test_list_and_count() {
        let (mut ledger, _temp) = create_test_ledger();
        let first = ledger.create_account("Rent", None, "user1").unwrap();
        let second = ledger.create_account("Trip", None, "user2").unwrap();

        let all = ledger.get_all_accounts().unwrap();
        assert_eq!(all.len(), 2);
        // Same second: newest insert first
        assert_eq!(all[0].id, second);
        assert_eq!(all[1].id, first);
        assert_eq!(ledger.get_account_count().unwrap(), 2);

        let mine = ledger.get_accounts_by_user("user1").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, first);
    }

    #[test]
    fn test_update_account() {
        let (mut ledger, _temp) = create_test_ledger();
        let id = ledger.create_account("Rent", None, "user1").unwrap();

        let mut account = ledger.get_account(&id).unwrap().unwrap();
        account.name = "Rent 2025".to_string();
        account.description = Some("Apartment".to_string());
        ledger.update_account(&account).unwrap();

        let stored = ledger.get_account(&id).unwrap().unwrap();
        assert_eq!(stored.name, "Rent 2025");
        assert_eq!(stored.description.as_deref(), Some("Apartment"));
        assert!(stored.updated_at >= stored.created_at);

        account.id = "missing".to_string();
        assert!(matches!(ledger.update_account(&account), Err(SplitError::AccountNotFound(_))));
    }

    #[test]
    fn test_soft_delete() {
        let (mut ledger, _temp) = create_test_ledger();
        let id = ledger.create_account("Rent", None, "user1").unwrap();
        ledger.delete_account(&id).unwrap();

        assert!(ledger.get_all_accounts().unwrap().is_empty());
        assert_eq!(ledger.get_account_count().unwrap(), 0);
        assert!(!ledger.get_account(&id).unwrap().unwrap().is_active);
        assert!(matches!(ledger.delete_account(&id), Err(SplitError::AccountNotFound(_))));
        assert!(ledger.require_active_account(&id).is_err());
    }

    #[test]
    fn test_purge() {
        let (mut ledger, _temp) = create_test_ledger();
        let id = ledger.create_account("Rent", None, "user1").unwrap();
        ledger.purge_account(&id).unwrap();
        assert!(ledger.get_account(&id).unwrap().is_none());
        assert!(matches!(ledger.purge_account(&id), Err(SplitError::AccountNotFound(_))));
    }
}
