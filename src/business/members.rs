//! Member operations

use crate::error::{SplitError, Result};
use crate::database::{queries, Member};
use crate::utils::{generate_entity_id, now};
use super::ledger::Ledger;

impl Ledger {
    /// Get active members of an account in join order
    pub fn get_members(&self, account_id: &str) -> Result<Vec<Member>> {
        queries::get_members_by_account(self.conn()?, account_id)
    }

    /// Get a member by ID, including removed ones
    pub fn get_member(&self, member_id: &str) -> Result<Option<Member>> {
        queries::get_member_by_id(self.conn()?, member_id)
    }

    /// Get the active memberships of a user across accounts
    pub fn get_memberships_by_user(&self, user_id: &str) -> Result<Vec<Member>> {
        queries::get_members_by_user(self.conn()?, user_id)
    }

    /// Count active members of an account
    pub fn get_member_count(&self, account_id: &str) -> Result<u32> {
        queries::get_member_count_by_account(self.conn()?, account_id)
    }

    /// Get the active membership of a user in an account
    pub fn get_member_by_account_and_user(&self, account_id: &str, user_id: &str) -> Result<Option<Member>> {
        queries::get_member_by_account_and_user(self.conn()?, account_id, user_id)
    }

    /// Add a person to an active account and return the member ID
    pub fn add_member(
        &mut self,
        account_id: &str,
        user_id: &str,
        user_name: &str,
        user_email: Option<&str>,
    ) -> Result<String> {
        self.require_active_account(account_id)?;

        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(SplitError::InvalidOperation("Member name cannot be empty".to_string()));
        }
        if self.get_member_by_account_and_user(account_id, user_id)?.is_some() {
            return Err(SplitError::InvalidOperation(format!(
                "User {} is already a member of account {}", user_id, account_id
            )));
        }

        let member = Member {
            id: generate_entity_id(),
            account_id: account_id.to_string(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            user_email: user_email.map(str::to_string),
            joined_at: now(),
            is_active: true,
        };

        self.database()?.transaction(|conn| {
            queries::insert_member(conn, &member)?;
            queries::touch_account(conn, account_id)
        })?;

        tracing::debug!(account_id = %account_id, member_id = %member.id, "added member");
        Ok(member.id)
    }

    /// Save a member's name, email and active flag
    ///
    /// A removed membership can only be reactivated while the user has no
    /// other active membership in the same account.
    pub fn update_member(&mut self, member: &Member) -> Result<()> {
        if member.user_name.trim().is_empty() {
            return Err(SplitError::InvalidOperation("Member name cannot be empty".to_string()));
        }
        let stored = self.get_member(&member.id)?
            .ok_or_else(|| SplitError::MemberNotFound(member.id.clone()))?;

        if member.is_active && !stored.is_active {
            let current = self.get_member_by_account_and_user(&stored.account_id, &stored.user_id)?;
            if current.is_some_and(|m| m.id != stored.id) {
                return Err(SplitError::InvalidOperation(format!(
                    "User {} is already a member of account {}", stored.user_id, stored.account_id
                )));
            }
        }

        if !queries::update_member(self.conn()?, member)? {
            return Err(SplitError::MemberNotFound(member.id.clone()));
        }
        Ok(())
    }

    /// Remove a member from their account
    ///
    /// The membership is deactivated rather than deleted so expenses and
    /// balances that mention the member stay intact.
    pub fn remove_member(&mut self, member_id: &str) -> Result<()> {
        let member = self.require_active_member(member_id)?;

        self.database()?.transaction(|conn| {
            queries::delete_member(conn, member_id)?;
            queries::touch_account(conn, &member.account_id)
        })?;

        tracing::debug!(account_id = %member.account_id, member_id = %member_id, "removed member");
        Ok(())
    }

    /// Get an active member or fail with `MemberNotFound`
    fn require_active_member(&self, member_id: &str) -> Result<Member> {
        self.get_member(member_id)?
            .filter(|m| m.is_active)
            .ok_or_else(|| SplitError::MemberNotFound(member_id.to_string()))
    }
}
