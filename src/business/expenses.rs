//! Expense operations
//!
//! This module provides expense management operations for the Ledger.
//! Every expense is stored with one share per participant; the shares of
//! an expense always add up to its amount.

use std::collections::{BTreeMap, HashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::catalog::ExpenseCategory;
use crate::error::{SplitError, Result};
use crate::database::{queries, Expense, ExpenseShare, Member};
use crate::settlement::split_evenly;
use crate::utils::{generate_entity_id, now};
use crate::MAX_AMOUNT;
use super::ledger::Ledger;

/// How an expense is divided between members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Split {
    /// Equal parts for the listed member IDs; an empty list means every
    /// active member. Leftover minor units go to the first participants.
    Equal(Vec<String>),
    /// Explicit `(member ID, share)` pairs that add up to the amount
    Exact(Vec<(String, i64)>),
}

/// Input for creating or editing an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub account_id: String,
    pub title: String,
    pub note: Option<String>,
    /// Amount in minor units, must be positive
    pub amount: i64,
    /// Currency code; empty means the configured default currency
    pub currency: String,
    pub category: ExpenseCategory,
    /// Member ID of the payer
    pub paid_by: String,
    /// When the money was spent; defaults to now
    pub spent_at: Option<DateTime<Utc>>,
    pub split: Split,
}

/// Expense total of one category in one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub currency: String,
    pub total: i64,
    pub count: u32,
}

impl Ledger {
    /// Get non-deleted expenses of an account, newest first
    pub fn get_expenses(&self, account_id: &str) -> Result<Vec<Expense>> {
        queries::get_expenses_by_account(self.conn()?, account_id)
    }

    /// Get an expense by ID, including deleted ones
    pub fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        queries::get_expense_by_id(self.conn()?, expense_id)
    }

    /// Get non-deleted expenses paid by a member
    pub fn get_expenses_by_payer(&self, member_id: &str) -> Result<Vec<Expense>> {
        queries::get_expenses_by_payer(self.conn()?, member_id)
    }

    /// Sum of non-deleted expenses per currency
    pub fn get_total_expense(&self, account_id: &str) -> Result<Vec<(String, i64)>> {
        queries::get_total_expense_by_account(self.conn()?, account_id)
    }

    /// Count non-deleted expenses
    pub fn get_expense_count(&self, account_id: &str) -> Result<u32> {
        queries::get_expense_count_by_account(self.conn()?, account_id)
    }

    /// Get the shares of an expense in the order they were given
    pub fn get_expense_shares(&self, expense_id: &str) -> Result<Vec<ExpenseShare>> {
        queries::get_expense_shares(self.conn()?, expense_id)
    }

    /// Totals per currency and category, ordered by currency then category
    pub fn get_category_totals(&self, account_id: &str) -> Result<Vec<CategoryTotal>> {
        let mut totals: BTreeMap<(String, usize), (i64, u32)> = BTreeMap::new();
        for expense in self.get_expenses(account_id)? {
            let order = ExpenseCategory::ALL
                .iter()
                .position(|c| *c == expense.category)
                .unwrap_or(ExpenseCategory::ALL.len());
            let entry = totals.entry((expense.currency, order)).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        Ok(totals
            .into_iter()
            .map(|((currency, order), (total, count))| CategoryTotal {
                category: ExpenseCategory::ALL.get(order).copied().unwrap_or(ExpenseCategory::Other),
                currency,
                total,
                count,
            })
            .collect())
    }

    /// Record an expense and return its ID
    pub fn add_expense(&mut self, new: NewExpense) -> Result<String> {
        let shares = self.validate_expense(&new)?;

        let now = now();
        let expense = Expense {
            id: generate_entity_id(),
            account_id: new.account_id,
            title: new.title.trim().to_string(),
            note: new.note,
            amount: new.amount,
            currency: self.currency_or_default(&new.currency),
            category: new.category,
            paid_by: new.paid_by,
            spent_at: new.spent_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
            is_settled: false,
            is_deleted: false,
        };

        self.database()?.transaction(|conn| {
            queries::insert_expense(conn, &expense)?;
            queries::replace_expense_shares(conn, &expense.id, &shares)?;
            queries::touch_account(conn, &expense.account_id)
        })?;

        tracing::info!(
            account_id = %expense.account_id,
            expense_id = %expense.id,
            amount = expense.amount,
            "added expense"
        );
        Ok(expense.id)
    }

    /// Replace the contents of an expense and recompute its shares
    ///
    /// The expense stays in its account and keeps its settled flag.
    pub fn update_expense(&mut self, expense_id: &str, new: NewExpense) -> Result<()> {
        let existing = self.get_expense(expense_id)?
            .filter(|e| !e.is_deleted)
            .ok_or_else(|| SplitError::ExpenseNotFound(expense_id.to_string()))?;
        if existing.account_id != new.account_id {
            return Err(SplitError::InvalidOperation(
                "An expense cannot be moved to another account".to_string()
            ));
        }

        let shares = self.validate_expense(&new)?;
        let expense = Expense {
            title: new.title.trim().to_string(),
            note: new.note,
            amount: new.amount,
            currency: self.currency_or_default(&new.currency),
            category: new.category,
            paid_by: new.paid_by,
            spent_at: new.spent_at.unwrap_or(existing.spent_at),
            updated_at: now(),
            ..existing
        };

        self.database()?.transaction(|conn| {
            queries::update_expense(conn, &expense)?;
            queries::replace_expense_shares(conn, &expense.id, &shares)?;
            queries::touch_account(conn, &expense.account_id)
        })?;

        tracing::info!(expense_id = %expense_id, amount = expense.amount, "updated expense");
        Ok(())
    }

    /// Delete an expense; it no longer counts towards balances
    pub fn delete_expense(&mut self, expense_id: &str) -> Result<()> {
        if !queries::delete_expense(self.conn()?, expense_id)? {
            return Err(SplitError::ExpenseNotFound(expense_id.to_string()));
        }
        tracing::info!(expense_id = %expense_id, "deleted expense");
        Ok(())
    }

    /// Mark an expense as settled or unsettled
    pub fn set_expense_settled(&mut self, expense_id: &str, settled: bool) -> Result<()> {
        if !queries::update_expense_settled(self.conn()?, expense_id, settled)? {
            return Err(SplitError::ExpenseNotFound(expense_id.to_string()));
        }
        tracing::debug!(expense_id = %expense_id, settled, "expense settled flag changed");
        Ok(())
    }

    pub(crate) fn currency_or_default(&self, currency: &str) -> String {
        let currency = currency.trim();
        if currency.is_empty() {
            self.config.default_currency.clone()
        } else {
            currency.to_string()
        }
    }

    /// Check an expense against its account and work out the shares
    fn validate_expense(&self, new: &NewExpense) -> Result<Vec<(String, i64)>> {
        self.require_active_account(&new.account_id)?;

        if new.title.trim().is_empty() {
            return Err(SplitError::InvalidOperation("Expense title cannot be empty".to_string()));
        }
        if new.amount <= 0 {
            return Err(SplitError::InvalidAmount(format!(
                "Expense amount must be positive, got {}", new.amount
            )));
        }
        if new.amount > MAX_AMOUNT {
            return Err(SplitError::InvalidAmount(format!(
                "Expense amount {} exceeds the maximum of {}", new.amount, MAX_AMOUNT
            )));
        }

        let members = self.get_members(&new.account_id)?;
        if !members.iter().any(|m| m.id == new.paid_by) {
            return Err(SplitError::MemberNotFound(new.paid_by.clone()));
        }

        resolve_shares(new.amount, &new.split, &members)
    }
}

/// Turn a split into `(member ID, share)` pairs
///
/// Every participant must be one of `members`, and appear only once.
pub(crate) fn resolve_shares(amount: i64, split: &Split, members: &[Member]) -> Result<Vec<(String, i64)>> {
    let participants: Vec<&str> = match split {
        Split::Equal(ids) if ids.is_empty() => members.iter().map(|m| m.id.as_str()).collect(),
        Split::Equal(ids) => ids.iter().map(String::as_str).collect(),
        Split::Exact(shares) => shares.iter().map(|(id, _)| id.as_str()).collect(),
    };

    if participants.is_empty() {
        return Err(SplitError::InvalidOperation("An expense needs at least one participant".to_string()));
    }
    let mut seen = HashSet::new();
    for id in &participants {
        if !members.iter().any(|m| m.id == *id) {
            return Err(SplitError::MemberNotFound(id.to_string()));
        }
        if !seen.insert(*id) {
            return Err(SplitError::InvalidOperation(format!("Member {} listed twice", id)));
        }
    }

    match split {
        Split::Equal(_) => Ok(participants
            .iter()
            .zip(split_evenly(amount, participants.len()))
            .map(|(id, share)| (id.to_string(), share))
            .collect()),
        Split::Exact(shares) => {
            if let Some((id, share)) = shares.iter().find(|(_, share)| *share < 0) {
                return Err(SplitError::InvalidAmount(format!("Negative share {} for member {}", share, id)));
            }
            let total = shares
                .iter()
                .try_fold(0i64, |acc, (_, share)| acc.checked_add(*share))
                .ok_or_else(|| SplitError::InvalidAmount("Shares are out of range".to_string()))?;
            if total != amount {
                return Err(SplitError::InvalidAmount(format!(
                    "Shares add up to {} but the expense is {}", total, amount
                )));
            }
            Ok(shares.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::ledger::tests::create_test_ledger;
    use tempfile::TempDir;

    struct Trip {
        ledger: Ledger,
        account: String,
        ming: String,
        hua: String,
        mei: String,
        _temp: TempDir,
    }

    fn trip() -> Trip {
        let (mut ledger, temp) = create_test_ledger();
        let account = ledger.create_account("Weekend trip", None, "user1").unwrap();
        let ming = ledger.add_member(&account, "user1", "小明", None).unwrap();
        let hua = ledger.add_member(&account, "user2", "小華", None).unwrap();
        let mei = ledger.add_member(&account, "user3", "小美", None).unwrap();
        Trip { ledger, account, ming, hua, mei, _temp: temp }
    }

    fn expense(account: &str, payer: &str, amount: i64, split: Split) -> NewExpense {
        NewExpense {
            account_id: account.to_string(),
            title: "Dinner".to_string(),
            note: None,
            amount,
            currency: String::new(),
            category: ExpenseCategory::Food,
            paid_by: payer.to_string(),
            spent_at: None,
            split,
        }
    }

    fn shares_of(ledger: &Ledger, expense_id: &str) -> Vec<(String, i64)> {
        ledger.get_expense_shares(expense_id).unwrap()
            .into_iter()
            .map(|s| (s.member_id, s.share))
            .collect()
    }

    #[test]
    fn test_add_equal_split_all_members() {
        let mut t = trip();
        let id = t.ledger.add_expense(expense(&t.account, &t.ming, 100, Split::Equal(vec![]))).unwrap();

        let stored = t.ledger.get_expense(&id).unwrap().unwrap();
        assert_eq!(stored.amount, 100);
        assert_eq!(stored.currency, "NT$");
        assert_eq!(stored.paid_by, t.ming);
        assert!(!stored.is_settled);

        // Remainder to the first participants in order
        assert_eq!(shares_of(&t.ledger, &id), vec![
            (t.ming.clone(), 34),
            (t.hua.clone(), 33),
            (t.mei.clone(), 33),
        ]);
    }

    #[test]
    fn test_add_equal_split_subset() {
        let mut t = trip();
        let split = Split::Equal(vec![t.mei.clone(), t.hua.clone()]);
        let id = t.ledger.add_expense(expense(&t.account, &t.ming, 301, split)).unwrap();
        assert_eq!(shares_of(&t.ledger, &id), vec![(t.mei.clone(), 151), (t.hua.clone(), 150)]);
    }

    #[test]
    fn test_add_exact_split() {
        let mut t = trip();
        let split = Split::Exact(vec![(t.ming.clone(), 500), (t.hua.clone(), 0), (t.mei.clone(), 1500)]);
        let id = t.ledger.add_expense(expense(&t.account, &t.hua, 2000, split)).unwrap();
        assert_eq!(shares_of(&t.ledger, &id)[2], (t.mei.clone(), 1500));
    }

    #[test]
    fn test_exact_split_validation() {
        let mut t = trip();
        let short = Split::Exact(vec![(t.ming.clone(), 500), (t.hua.clone(), 400)]);
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, 1000, short)),
            Err(SplitError::InvalidAmount(_))
        ));

        let negative = Split::Exact(vec![(t.ming.clone(), 1100), (t.hua.clone(), -100)]);
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, 1000, negative)),
            Err(SplitError::InvalidAmount(_))
        ));

        let twice = Split::Exact(vec![(t.ming.clone(), 500), (t.ming.clone(), 500)]);
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, 1000, twice)),
            Err(SplitError::InvalidOperation(_))
        ));
        assert_eq!(t.ledger.get_expense_count(&t.account).unwrap(), 0);
    }

    #[test]
    fn test_invalid_amount_and_payer() {
        let mut t = trip();
        for amount in [0, -100] {
            assert!(matches!(
                t.ledger.add_expense(expense(&t.account, &t.ming, amount, Split::Equal(vec![]))),
                Err(SplitError::InvalidAmount(_))
            ));
        }

        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, "stranger", 100, Split::Equal(vec![]))),
            Err(SplitError::MemberNotFound(_))
        ));

        t.ledger.remove_member(&t.mei).unwrap();
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.mei, 100, Split::Equal(vec![]))),
            Err(SplitError::MemberNotFound(_))
        ));
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, 100, Split::Equal(vec![t.mei.clone()]))),
            Err(SplitError::MemberNotFound(_))
        ));
    }

    #[test]
    fn test_amount_limit() {
        let mut t = trip();
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, i64::MAX, Split::Equal(vec![]))),
            Err(SplitError::InvalidAmount(_))
        ));
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, MAX_AMOUNT + 1, Split::Equal(vec![]))),
            Err(SplitError::InvalidAmount(_))
        ));

        let huge = Split::Exact(vec![(t.ming.clone(), i64::MAX), (t.hua.clone(), i64::MAX)]);
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, 1000, huge)),
            Err(SplitError::InvalidAmount(_))
        ));

        // The largest allowed amounts still settle
        t.ledger.add_expense(expense(&t.account, &t.ming, MAX_AMOUNT, Split::Equal(vec![]))).unwrap();
        t.ledger.add_expense(expense(&t.account, &t.hua, MAX_AMOUNT, Split::Equal(vec![]))).unwrap();
        let report = t.ledger.get_settlement_report(&t.account).unwrap();
        assert_eq!(report.currencies[0].total_expenses, 2 * MAX_AMOUNT);
    }

    #[test]
    fn test_member_of_other_account_rejected() {
        let mut t = trip();
        let other = t.ledger.create_account("Rent", None, "user9").unwrap();
        let outsider = t.ledger.add_member(&other, "user9", "Outsider", None).unwrap();

        let split = Split::Equal(vec![t.ming.clone(), outsider]);
        assert!(matches!(
            t.ledger.add_expense(expense(&t.account, &t.ming, 100, split)),
            Err(SplitError::MemberNotFound(_))
        ));
    }

    #[test]
    fn test_list_and_totals() {
        let mut t = trip();
        let first = t.ledger.add_expense(expense(&t.account, &t.ming, 1000, Split::Equal(vec![]))).unwrap();
        let mut taxi = expense(&t.account, &t.hua, 450, Split::Equal(vec![]));
        taxi.category = ExpenseCategory::Transport;
        let second = t.ledger.add_expense(taxi).unwrap();
        let mut souvenir = expense(&t.account, &t.hua, 20, Split::Equal(vec![]));
        souvenir.currency = "USD".to_string();
        t.ledger.add_expense(souvenir).unwrap();

        let expenses = t.ledger.get_expenses(&t.account).unwrap();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[2].id, first);
        assert_eq!(t.ledger.get_expense_count(&t.account).unwrap(), 3);

        assert_eq!(t.ledger.get_total_expense(&t.account).unwrap(), vec![
            ("NT$".to_string(), 1450),
            ("USD".to_string(), 20),
        ]);

        let by_hua = t.ledger.get_expenses_by_payer(&t.hua).unwrap();
        assert_eq!(by_hua.len(), 2);
        assert!(by_hua.iter().any(|e| e.id == second));

        let categories = t.ledger.get_category_totals(&t.account).unwrap();
        assert_eq!(categories, vec![
            CategoryTotal { category: ExpenseCategory::Food, currency: "NT$".to_string(), total: 1000, count: 1 },
            CategoryTotal { category: ExpenseCategory::Transport, currency: "NT$".to_string(), total: 450, count: 1 },
            CategoryTotal { category: ExpenseCategory::Food, currency: "USD".to_string(), total: 20, count: 1 },
        ]);
    }

    #[test]
    fn test_update_expense_recomputes_shares() {
        let mut t = trip();
        let id = t.ledger.add_expense(expense(&t.account, &t.ming, 300, Split::Equal(vec![]))).unwrap();
        let created_at = t.ledger.get_expense(&id).unwrap().unwrap().created_at;

        let mut edit = expense(&t.account, &t.hua, 200, Split::Equal(vec![t.ming.clone(), t.hua.clone()]));
        edit.title = "Late dinner".to_string();
        t.ledger.update_expense(&id, edit).unwrap();

        let stored = t.ledger.get_expense(&id).unwrap().unwrap();
        assert_eq!(stored.title, "Late dinner");
        assert_eq!(stored.amount, 200);
        assert_eq!(stored.paid_by, t.hua);
        assert_eq!(stored.created_at, created_at);
        assert_eq!(shares_of(&t.ledger, &id), vec![(t.ming.clone(), 100), (t.hua.clone(), 100)]);
    }

    #[test]
    fn test_update_expense_errors() {
        let mut t = trip();
        let id = t.ledger.add_expense(expense(&t.account, &t.ming, 300, Split::Equal(vec![]))).unwrap();

        assert!(matches!(
            t.ledger.update_expense("missing", expense(&t.account, &t.ming, 100, Split::Equal(vec![]))),
            Err(SplitError::ExpenseNotFound(_))
        ));
        assert!(matches!(
            t.ledger.update_expense(&id, expense(&t.account, &t.ming, 0, Split::Equal(vec![]))),
            Err(SplitError::InvalidAmount(_))
        ));

        let other = t.ledger.create_account("Rent", None, "user1").unwrap();
        assert!(matches!(
            t.ledger.update_expense(&id, expense(&other, &t.ming, 100, Split::Equal(vec![]))),
            Err(SplitError::InvalidOperation(_))
        ));

        // Failed edits leave the shares untouched
        assert_eq!(shares_of(&t.ledger, &id).len(), 3);
    }

    #[test]
    fn test_delete_and_settle() {
        let mut t = trip();
        let id = t.ledger.add_expense(expense(&t.account, &t.ming, 300, Split::Equal(vec![]))).unwrap();

        t.ledger.set_expense_settled(&id, true).unwrap();
        assert!(t.ledger.get_expense(&id).unwrap().unwrap().is_settled);

        t.ledger.delete_expense(&id).unwrap();
        assert!(t.ledger.get_expenses(&t.account).unwrap().is_empty());
        assert!(t.ledger.get_expense(&id).unwrap().unwrap().is_deleted);
        assert!(matches!(t.ledger.delete_expense(&id), Err(SplitError::ExpenseNotFound(_))));
        assert!(matches!(t.ledger.set_expense_settled(&id, false), Err(SplitError::ExpenseNotFound(_))));
    }

    #[test]
    fn test_resolve_shares_without_members() {
        assert!(matches!(
            resolve_shares(100, &Split::Equal(vec![]), &[]),
            Err(SplitError::InvalidOperation(_))
        ));
    }
}
