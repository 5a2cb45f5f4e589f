//! Balance and settlement operations

use std::collections::{BTreeMap, BTreeSet};
use crate::error::{SplitError, Result};
use crate::database::{queries, Member, SettlementPayment};
use crate::settlement::{
    compute_balances, minimize_transfers, CurrencySettlement, MemberBalance, Settlement, SettlementReport,
};
use crate::utils::{generate_entity_id, now};
use crate::MAX_AMOUNT;
use super::ledger::Ledger;

impl Ledger {
    /// Current balance of every member, per currency
    pub fn get_balances(&self, account_id: &str) -> Result<Vec<MemberBalance>> {
        if self.get_account(account_id)?.is_none() {
            return Err(SplitError::AccountNotFound(account_id.to_string()));
        }

        let conn = self.conn()?;
        let members = queries::get_all_members_by_account(conn, account_id)?;
        let expenses = queries::get_expenses_by_account(conn, account_id)?;
        let shares = queries::get_expense_shares_by_account(conn, account_id)?;
        let payments = queries::get_settlement_payments_by_account(conn, account_id)?;

        compute_balances(&members, &expenses, &shares, &payments)
    }

    /// Balances, totals and suggested transfers of an account
    pub fn get_settlement_report(&self, account_id: &str) -> Result<SettlementReport> {
        let account = self.get_account(account_id)?
            .ok_or_else(|| SplitError::AccountNotFound(account_id.to_string()))?;

        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for expense in self.get_expenses(account_id)?.into_iter().filter(|e| !e.is_settled) {
            let total = totals.entry(expense.currency).or_default();
            *total = total.checked_add(expense.amount).ok_or_else(|| {
                SplitError::InvalidAmount("Expense total is out of range".to_string())
            })?;
        }

        let mut by_currency: BTreeMap<String, Vec<MemberBalance>> = BTreeMap::new();
        for balance in self.get_balances(account_id)? {
            by_currency.entry(balance.currency.clone()).or_default().push(balance);
        }

        let mut currencies = Vec::with_capacity(by_currency.len());
        for (currency, balances) in by_currency {
            let transfers = minimize_transfers(&balances)?;
            currencies.push(CurrencySettlement {
                total_expenses: totals.get(&currency).copied().unwrap_or(0),
                currency,
                balances,
                transfers,
            });
        }

        Ok(SettlementReport { account, currencies })
    }

    /// Record that a suggested (or any other) transfer was paid
    ///
    /// Both sides must belong to the account, removed members included.
    /// An empty currency means the configured default; the currency must
    /// be one the account's expenses use.
    pub fn record_settlement(&mut self, account_id: &str, settlement: &Settlement) -> Result<String> {
        self.require_active_account(account_id)?;

        if settlement.amount <= 0 {
            return Err(SplitError::InvalidAmount(format!(
                "Settlement amount must be positive, got {}", settlement.amount
            )));
        }
        if settlement.amount > MAX_AMOUNT {
            return Err(SplitError::InvalidAmount(format!(
                "Settlement amount {} exceeds the maximum of {}", settlement.amount, MAX_AMOUNT
            )));
        }
        if settlement.from_member_id == settlement.to_member_id {
            return Err(SplitError::InvalidOperation("A member cannot pay themselves".to_string()));
        }
        for member_id in [&settlement.from_member_id, &settlement.to_member_id] {
            self.require_account_member(account_id, member_id)?;
        }

        let currency = self.currency_or_default(&settlement.currency);
        let used: BTreeSet<String> = self.get_expenses(account_id)?.into_iter().map(|e| e.currency).collect();
        if !used.contains(&currency) {
            return Err(SplitError::InvalidOperation(format!(
                "Account {} has no expenses in {}", account_id, currency
            )));
        }

        let payment = SettlementPayment {
            id: generate_entity_id(),
            account_id: account_id.to_string(),
            from_member: settlement.from_member_id.clone(),
            to_member: settlement.to_member_id.clone(),
            amount: settlement.amount,
            currency,
            created_at: now(),
        };

        self.database()?.transaction(|conn| {
            queries::insert_settlement_payment(conn, &payment)?;
            queries::touch_account(conn, account_id)
        })?;

        tracing::info!(
            account_id = %account_id,
            payment_id = %payment.id,
            amount = payment.amount,
            currency = %payment.currency,
            "recorded settlement"
        );
        Ok(payment.id)
    }

    /// Recorded settlement payments of an account, oldest first
    pub fn get_settlement_payments(&self, account_id: &str) -> Result<Vec<SettlementPayment>> {
        queries::get_settlement_payments_by_account(self.conn()?, account_id)
    }

    /// Delete a recorded settlement payment
    pub fn delete_settlement_payment(&mut self, payment_id: &str) -> Result<()> {
        if !queries::delete_settlement_payment(self.conn()?, payment_id)? {
            return Err(SplitError::InvalidOperation(format!(
                "Settlement payment not found: {}", payment_id
            )));
        }
        tracing::info!(payment_id = %payment_id, "deleted settlement payment");
        Ok(())
    }

    /// Get a member of the account, active or removed
    fn require_account_member(&self, account_id: &str, member_id: &str) -> Result<Member> {
        self.get_member(member_id)?
            .filter(|m| m.account_id == account_id)
            .ok_or_else(|| SplitError::MemberNotFound(member_id.to_string()))
    }
}
