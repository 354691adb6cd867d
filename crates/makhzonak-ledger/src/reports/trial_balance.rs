//! # Trial Balance
//!
//! Every account with opening, period and closing balances split into debit
//! and credit columns.
//!
//! ## Column Placement
//! ```text
//!   Asset, balance +300          → debit 300
//!   Asset, balance −40           → credit 40      (abnormal side)
//!   Revenue, balance +1000       → credit 1000
//!   period columns               → raw Σ debit / Σ credit of the period
//! ```
//!
//! For a ledger of balanced entries each pair of column totals is equal.

use makhzonak_core::Money;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::accounts::{AccountType, ChartOfAccounts};
use crate::balances::PeriodBalances;

/// Splits a signed balance into its (debit, credit) columns.
fn split(account_type: AccountType, balance: Money) -> (Money, Money) {
    let natural = balance.non_negative();
    let abnormal = (-balance).non_negative();
    if account_type.is_debit_normal() {
        (natural, abnormal)
    } else {
        (abnormal, natural)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrialBalanceRow {
    pub account_id: String,
    pub name: String,
    pub account_type: AccountType,
    pub opening_debit: Money,
    pub opening_credit: Money,
    pub period_debit: Money,
    pub period_credit: Money,
    pub closing_debit: Money,
    pub closing_credit: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrialBalanceTotals {
    pub opening_debit: Money,
    pub opening_credit: Money,
    pub period_debit: Money,
    pub period_credit: Money,
    pub closing_debit: Money,
    pub closing_credit: Money,
}

impl TrialBalanceTotals {
    fn add(&mut self, row: &TrialBalanceRow) {
        self.opening_debit += row.opening_debit;
        self.opening_credit += row.opening_credit;
        self.period_debit += row.period_debit;
        self.period_credit += row.period_credit;
        self.closing_debit += row.closing_debit;
        self.closing_credit += row.closing_credit;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub totals: TrialBalanceTotals,
}

impl TrialBalance {
    /// One row per account in chart order, summed on each account's own
    /// balance (no roll-up, so parents are not counted twice).
    pub fn from_period(chart: &ChartOfAccounts, period: &PeriodBalances) -> Self {
        let mut totals = TrialBalanceTotals::default();
        let rows: Vec<TrialBalanceRow> = chart
            .accounts()
            .iter()
            .map(|account| {
                let (opening_debit, opening_credit) = split(account.account_type, period.opening(&account.id));
                let (closing_debit, closing_credit) = split(account.account_type, period.closing(&account.id));
                let movement = period.movement(&account.id);
                TrialBalanceRow {
                    account_id: account.id.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    opening_debit,
                    opening_credit,
                    period_debit: movement.debit,
                    period_credit: movement.credit,
                    closing_debit,
                    closing_credit,
                }
            })
            .inspect(|row| totals.add(row))
            .collect();

        TrialBalance { rows, totals }
    }

    /// All three debit totals equal their credit totals.
    pub fn is_balanced(&self) -> bool {
        let t = &self.totals;
        t.opening_debit == t.opening_credit && t.period_debit == t.period_credit && t.closing_debit == t.closing_credit
    }
}
