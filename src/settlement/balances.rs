//! Per-member balances

use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use crate::error::{SplitError, Result};
use crate::database::models::{Expense, ExpenseShare, Member, SettlementPayment};

/// Position of one member in one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member_id: String,
    pub member_name: String,
    pub currency: String,
    /// Total the member paid for expenses
    pub paid: i64,
    /// Total of the member's shares
    pub owed: i64,
    /// Settlement payments the member made
    pub sent: i64,
    /// Settlement payments the member received
    pub received: i64,
    /// `paid - owed + sent - received`; positive means others owe the member
    pub balance: i64,
}

#[derive(Default, Clone, Copy)]
struct Totals {
    paid: i64,
    owed: i64,
    sent: i64,
    received: i64,
}

impl Totals {
    fn balance(&self) -> Result<i64> {
        self.paid
            .checked_sub(self.owed)
            .and_then(|b| b.checked_add(self.sent))
            .and_then(|b| b.checked_sub(self.received))
            .ok_or_else(overflow)
    }

    fn is_zero(&self) -> bool {
        self.paid == 0 && self.owed == 0 && self.sent == 0 && self.received == 0
    }
}

/// Compute balances of a group
///
/// Deleted and settled expenses (and their shares) are ignored. Every
/// active member gets a row for each currency in use; removed members
/// only appear where they still have activity. Rows are ordered by
/// currency, then by the order of `members`.
///
/// Fails with `InvalidAmount` if a total does not fit in an `i64`.
pub fn compute_balances(
    members: &[Member],
    expenses: &[Expense],
    shares: &[ExpenseShare],
    payments: &[SettlementPayment],
) -> Result<Vec<MemberBalance>> {
    // currency -> member -> totals
    let mut ledger: BTreeMap<String, HashMap<String, Totals>> = BTreeMap::new();
    let mut expense_currency: HashMap<&str, &str> = HashMap::new();

    for expense in expenses.iter().filter(|e| !e.is_deleted && !e.is_settled) {
        expense_currency.insert(expense.id.as_str(), expense.currency.as_str());
        let totals = ledger
            .entry(expense.currency.clone())
            .or_default()
            .entry(expense.paid_by.clone())
            .or_default();
        add_to(&mut totals.paid, expense.amount)?;
    }

    for share in shares {
        let Some(currency) = expense_currency.get(share.expense_id.as_str()) else {
            continue;
        };
        let totals = ledger
            .entry(currency.to_string())
            .or_default()
            .entry(share.member_id.clone())
            .or_default();
        add_to(&mut totals.owed, share.share)?;
    }

    for payment in payments {
        let per_member = ledger.entry(payment.currency.clone()).or_default();
        add_to(&mut per_member.entry(payment.from_member.clone()).or_default().sent, payment.amount)?;
        add_to(&mut per_member.entry(payment.to_member.clone()).or_default().received, payment.amount)?;
    }

    let mut result = Vec::new();
    for (currency, per_member) in &ledger {
        for member in members {
            let totals = per_member.get(&member.id).copied().unwrap_or_default();
            if !member.is_active && totals.is_zero() {
                continue;
            }
            result.push(make_balance(&member.id, &member.user_name, currency, totals)?);
        }

        // Members referenced by history but missing from the member list
        let mut unknown: Vec<(&String, &Totals)> = per_member
            .iter()
            .filter(|(id, _)| !members.iter().any(|m| &m.id == *id))
            .collect();
        unknown.sort_by(|a, b| a.0.cmp(b.0));
        for (id, totals) in unknown {
            result.push(make_balance(id, id, currency, *totals)?);
        }
    }

    Ok(result)
}

fn add_to(total: &mut i64, amount: i64) -> Result<()> {
    *total = total.checked_add(amount).ok_or_else(overflow)?;
    Ok(())
}

fn overflow() -> SplitError {
    SplitError::InvalidAmount("Balance total is out of range".to_string())
}

fn make_balance(member_id: &str, name: &str, currency: &str, totals: Totals) -> Result<MemberBalance> {
    Ok(MemberBalance {
        member_id: member_id.to_string(),
        member_name: name.to_string(),
        currency: currency.to_string(),
        paid: totals.paid,
        owed: totals.owed,
        sent: totals.sent,
        received: totals.received,
        balance: totals.balance()?,
    })
}
