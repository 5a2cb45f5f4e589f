//! Settlement transfer suggestion

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use serde::{Deserialize, Serialize};
use crate::error::{SplitError, Result};
use super::balances::MemberBalance;

/// A suggested payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from_member_id: String,
    pub from_name: String,
    pub to_member_id: String,
    pub to_name: String,
    /// Amount in minor units, always positive
    pub amount: i64,
    pub currency: String,
}

/// Suggest transfers that bring every balance to zero
///
/// Repeatedly matches the member who owes the most with the member who is
/// owed the most and transfers the smaller of the two amounts, so each
/// step clears at least one member. For `n` members with a non-zero
/// balance in a currency, at most `n - 1` transfers are produced. Equal
/// amounts are ordered by member ID.
///
/// Balances are grouped by currency; each currency must sum to zero.
/// Balances that cannot be added up in an `i64` fail with `InvalidAmount`.
pub fn minimize_transfers(balances: &[MemberBalance]) -> Result<Vec<Settlement>> {
    let mut by_currency: BTreeMap<&str, Vec<&MemberBalance>> = BTreeMap::new();
    for balance in balances {
        by_currency.entry(balance.currency.as_str()).or_default().push(balance);
    }

    let mut transfers = Vec::new();
    for (currency, group) in by_currency {
        let total = group
            .iter()
            .try_fold(0i64, |acc, b| acc.checked_add(b.balance).filter(|_| b.balance != i64::MIN))
            .ok_or_else(|| SplitError::InvalidAmount(format!("Balances in {} are out of range", currency)))?;
        if total != 0 {
            return Err(SplitError::UnbalancedLedger(total));
        }
        settle_currency(currency, &group, &mut transfers);
    }

    Ok(transfers)
}

fn settle_currency(currency: &str, group: &[&MemberBalance], out: &mut Vec<Settlement>) {
    // Max-heaps keyed by outstanding amount, then smallest member ID first
    let mut debtors: BinaryHeap<(i64, Reverse<&str>, usize)> = BinaryHeap::new();
    let mut creditors: BinaryHeap<(i64, Reverse<&str>, usize)> = BinaryHeap::new();

    for (idx, b) in group.iter().enumerate() {
        if b.balance < 0 {
            debtors.push((-b.balance, Reverse(b.member_id.as_str()), idx));
        } else if b.balance > 0 {
            creditors.push((b.balance, Reverse(b.member_id.as_str()), idx));
        }
    }

    while let (Some((owes, d_id, d_idx)), Some((owed, c_id, c_idx))) = (debtors.pop(), creditors.pop()) {
        let amount = owes.min(owed);
        let from = group[d_idx];
        let to = group[c_idx];
        out.push(Settlement {
            from_member_id: from.member_id.clone(),
            from_name: from.member_name.clone(),
            to_member_id: to.member_id.clone(),
            to_name: to.member_name.clone(),
            amount,
            currency: currency.to_string(),
        });

        if owes > amount {
            debtors.push((owes - amount, d_id, d_idx));
        }
        if owed > amount {
            creditors.push((owed - amount, c_id, c_idx));
        }
    }
}

/// Split `amount` into `parts` shares that differ by at most one minor unit
///
/// The remainder goes one unit at a time to the first shares.
pub fn split_evenly(amount: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as i64;
    let base = amount.div_euclid(n);
    let remainder = amount.rem_euclid(n) as usize;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}
