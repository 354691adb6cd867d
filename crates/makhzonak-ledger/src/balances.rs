//! # Period Balances
//!
//! Per-account opening balance, period movement and closing balance for a
//! report period.
//!
//! ```text
//!            posted entries, date < start          start ≤ date ≤ end
//!   ──────────────────────────────────────────┬──────────────────────────┬──►
//!                                              │                          │
//!   compute_balances_before(start) = opening   │ compute_period_movements │
//!                                              │   {debit, credit}        │
//!                                              └──────────────────────────┘
//!   closing = opening + signed(movement)  ==  compute_balances_before(end + 1)
//! ```
//!
//! Accounts absent from a map have a zero balance. Postings against ids not
//! in the chart are kept in the movement map but cannot be signed, so they
//! never reach a balance.

use std::collections::HashMap;

use chrono::NaiveDate;
use makhzonak_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::accounts::{AccountType, ChartOfAccounts};
use crate::journal::{DateRange, JournalEntry};

/// Unsigned debit and credit sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Movement {
    pub debit: Money,
    pub credit: Money,
}

impl Movement {
    /// Net movement under the account type's sign convention.
    #[inline]
    pub fn signed(&self, account_type: AccountType) -> Money {
        account_type.signed(self.debit, self.credit)
    }
}

fn posted(entries: &[JournalEntry]) -> impl Iterator<Item = &JournalEntry> {
    entries.iter().filter(|e| e.is_posted)
}

/// Σ debit / Σ credit per account over posted entries inside `range`.
pub fn compute_period_movements(entries: &[JournalEntry], range: &DateRange) -> HashMap<String, Movement> {
    let mut movements: HashMap<String, Movement> = HashMap::new();

    for entry in posted(entries).filter(|e| range.contains(e.date)) {
        for item in &entry.items {
            let movement = movements.entry(item.account_id.clone()).or_default();
            movement.debit += item.debit;
            movement.credit += item.credit;
        }
    }

    movements
}

/// Signed balance per account over posted entries dated strictly before
/// `cutoff`.
pub fn compute_balances_before(
    chart: &ChartOfAccounts,
    entries: &[JournalEntry],
    cutoff: NaiveDate,
) -> HashMap<String, Money> {
    let mut balances: HashMap<String, Money> = HashMap::new();

    for entry in posted(entries).filter(|e| e.date < cutoff) {
        for item in &entry.items {
            match chart.get(&item.account_id) {
                Some(account) => {
                    *balances.entry(item.account_id.clone()).or_default() +=
                        account.account_type.signed(item.debit, item.credit);
                }
                None => {
                    debug!(entry_id = %entry.id, account_id = %item.account_id, "Posting to unknown account skipped");
                }
            }
        }
    }

    balances
}

/// Opening balance plus signed period movement, for every account in the
/// chart that has either.
pub fn closing_balances(
    chart: &ChartOfAccounts,
    opening: &HashMap<String, Money>,
    movements: &HashMap<String, Movement>,
) -> HashMap<String, Money> {
    chart
        .accounts()
        .iter()
        .filter(|a| opening.contains_key(&a.id) || movements.contains_key(&a.id))
        .map(|a| {
            let open = opening.get(&a.id).copied().unwrap_or_default();
            let moved = movements
                .get(&a.id)
                .map(|m| m.signed(a.account_type))
                .unwrap_or_default();
            (a.id.clone(), open + moved)
        })
        .collect()
}

/// Everything the statements need for one period.
#[derive(Debug, Clone)]
pub struct PeriodBalances {
    pub range: DateRange,
    pub opening: HashMap<String, Money>,
    pub movements: HashMap<String, Movement>,
    pub closing: HashMap<String, Money>,
}

impl PeriodBalances {
    pub fn compute(chart: &ChartOfAccounts, entries: &[JournalEntry], range: DateRange) -> Self {
        for entry in posted(entries).filter(|e| e.date <= range.end && !e.is_balanced()) {
            warn!(
                entry_id = %entry.id,
                debit = %entry.total_debit(),
                credit = %entry.total_credit(),
                "Posted journal entry is unbalanced"
            );
        }

        let opening = compute_balances_before(chart, entries, range.start);
        let movements = compute_period_movements(entries, &range);
        let closing = closing_balances(chart, &opening, &movements);
        debug!(
            start = %range.start,
            end = %range.end,
            accounts_moved = movements.len(),
            "Period balances computed"
        );

        PeriodBalances {
            range,
            opening,
            movements,
            closing,
        }
    }

    pub fn opening(&self, id: &str) -> Money {
        self.opening.get(id).copied().unwrap_or_default()
    }

    pub fn closing(&self, id: &str) -> Money {
        self.closing.get(id).copied().unwrap_or_default()
    }

    pub fn movement(&self, id: &str) -> Movement {
        self.movements.get(id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::Account;
    use crate::journal::JournalLine;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sar(major: i64) -> Money {
        Money::from_major(major)
    }

    fn chart() -> ChartOfAccounts {
        ChartOfAccounts::new(vec![
            Account::new("cash", "Cash", AccountType::Asset),
            Account::new("sales", "Sales", AccountType::Revenue),
        ])
        .unwrap()
    }

    fn sale(id: &str, on: NaiveDate, amount: i64) -> JournalEntry {
        JournalEntry::posted(
            id,
            on,
            vec![
                JournalLine::debit("cash", sar(amount)),
                JournalLine::credit("sales", sar(amount)),
            ],
        )
    }

    #[test]
    fn test_movements_respect_range_and_posting() {
        let mut draft = sale("d", date(1, 10), 999);
        draft.is_posted = false;
        let entries = vec![
            sale("before", date(1, 1), 100),
            sale("first-day", date(2, 1), 40),
            sale("last-day", date(2, 29), 60),
            sale("after", date(3, 1), 500),
            draft,
        ];
        let range = DateRange::new(date(2, 1), date(2, 29)).unwrap();
        let movements = compute_period_movements(&entries, &range);

        assert_eq!(movements["cash"], Movement { debit: sar(100), credit: Money::ZERO });
        assert_eq!(movements["sales"].credit, sar(100));
    }

    #[test]
    fn test_balances_before_is_strict_and_signed() {
        let entries = vec![sale("a", date(1, 1), 100), sale("b", date(2, 1), 50)];
        let balances = compute_balances_before(&chart(), &entries, date(2, 1));

        assert_eq!(balances["cash"], sar(100));
        assert_eq!(balances["sales"], sar(100));
    }

    #[test]
    fn test_closing_equals_balances_before_day_after_end() {
        let chart = chart();
        let entries = vec![
            sale("a", date(1, 1), 100),
            sale("b", date(2, 15), 50),
            sale("c", date(3, 2), 7),
        ];
        let range = DateRange::new(date(2, 1), date(2, 29)).unwrap();
        let period = PeriodBalances::compute(&chart, &entries, range);

        assert_eq!(period.opening("cash"), sar(100));
        assert_eq!(period.closing("cash"), sar(150));
        assert_eq!(period.closing, compute_balances_before(&chart, &entries, range.day_after_end()));
    }

    #[test]
    fn test_unknown_accounts_do_not_reach_balances() {
        let entries = vec![JournalEntry::posted(
            "x",
            date(1, 1),
            vec![JournalLine::debit("ghost", sar(5)), JournalLine::credit("sales", sar(5))],
        )];
        let range = DateRange::new(date(1, 1), date(1, 31)).unwrap();
        let period = PeriodBalances::compute(&chart(), &entries, range);

        assert!(period.movements.contains_key("ghost"));
        assert!(!period.closing.contains_key("ghost"));
        assert_eq!(period.closing("sales"), sar(5));
    }

    #[test]
    fn test_empty_ledger_is_all_zero() {
        let range = DateRange::new(date(1, 1), date(12, 31)).unwrap();
        let period = PeriodBalances::compute(&chart(), &[], range);
        assert!(period.closing.is_empty());
        assert_eq!(period.movement("cash"), Movement::default());
    }
}
