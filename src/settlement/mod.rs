//! Balance and settlement computation
//!
//! Balances say how far each member is ahead (positive: others owe them)
//! or behind (negative: they owe others) within one currency. Transfers
//! are the payments that bring every balance back to zero.

mod balances;
mod transfers;

pub use balances::{compute_balances, MemberBalance};
pub use transfers::{minimize_transfers, split_evenly, Settlement};

use serde::{Deserialize, Serialize};
use crate::database::models::Account;

/// Balances and suggested transfers for one currency of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettlement {
    pub currency: String,
    /// Sum of counted (unsettled, non-deleted) expenses
    pub total_expenses: i64,
    pub balances: Vec<MemberBalance>,
    pub transfers: Vec<Settlement>,
}

/// Settlement state of a whole group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub account: Account,
    /// One entry per currency, ordered by currency code
    pub currencies: Vec<CurrencySettlement>,
}

impl SettlementReport {
    /// All suggested transfers across currencies
    pub fn transfers(&self) -> impl Iterator<Item = &Settlement> {
        self.currencies.iter().flat_map(|c| c.transfers.iter())
    }

    /// All member balances across currencies
    pub fn balances(&self) -> impl Iterator<Item = &MemberBalance> {
        self.currencies.iter().flat_map(|c| c.balances.iter())
    }

    /// True when nobody owes anybody
    pub fn is_settled(&self) -> bool {
        self.transfers().next().is_none()
    }
}
