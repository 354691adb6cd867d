//! Balance sheet as of the last day of the period.
//!
//! Profit is not closed into a retained-earnings account by the journal, so
//! it is folded into equity here: `retained_earnings` is cumulative revenue
//! minus cumulative expense up to the as-of date. That keeps
//! `assets = liabilities + equity` for any balanced ledger.

use chrono::NaiveDate;
use makhzonak_core::Money;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{report_lines, ReportLine};
use crate::accounts::{AccountType, ChartOfAccounts};
use crate::balances::PeriodBalances;

/// Largest gap between the two sides still shown as balanced.
const BALANCE_TOLERANCE: Money = Money::from_minor(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BalanceSheet {
    #[ts(as = "String")]
    pub as_of: NaiveDate,
    pub assets: Vec<ReportLine>,
    pub liabilities: Vec<ReportLine>,
    pub equity: Vec<ReportLine>,
    pub total_assets: Money,
    pub total_liabilities: Money,
    /// Σ closing balance of every equity account.
    pub equity_accounts_total: Money,
    pub retained_earnings: Money,
    /// `equity_accounts_total + retained_earnings`
    pub total_equity: Money,
}

impl BalanceSheet {
    pub fn from_period(chart: &ChartOfAccounts, period: &PeriodBalances) -> Self {
        let closing = &period.closing;
        let lines = |account_type: AccountType| {
            report_lines(chart, account_type, |account| chart.recursive_total(&account.id, closing))
        };

        let equity_accounts_total: Money = chart
            .accounts_of_type(AccountType::Equity)
            .map(|account| period.closing(&account.id))
            .sum();
        let retained_earnings =
            chart.total_of_type(AccountType::Revenue, closing) - chart.total_of_type(AccountType::Expense, closing);

        BalanceSheet {
            as_of: period.range.end,
            assets: lines(AccountType::Asset),
            liabilities: lines(AccountType::Liability),
            equity: lines(AccountType::Equity),
            total_assets: chart.total_of_type(AccountType::Asset, closing),
            total_liabilities: chart.total_of_type(AccountType::Liability, closing),
            equity_accounts_total,
            retained_earnings,
            total_equity: equity_accounts_total + retained_earnings,
        }
    }

    /// `assets ≈ liabilities + equity`, within one minor unit.
    pub fn is_balanced(&self) -> bool {
        (self.total_assets - (self.total_liabilities + self.total_equity)).abs() <= BALANCE_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::journal::{JournalEntry, JournalLine};

    #[test]
    fn test_accounting_equation_holds() {
        let chart = chart();
        let period = PeriodBalances::compute(&chart, &entries(), february());
        let sheet = BalanceSheet::from_period(&chart, &period);

        assert_eq!(sheet.as_of, date(2, 29));
        assert_eq!(sheet.total_assets, sar(1650));
        assert_eq!(sheet.total_liabilities, sar(50));
        assert_eq!(sheet.equity_accounts_total, sar(1000));
        assert_eq!(sheet.retained_earnings, sar(600));
        assert_eq!(sheet.total_equity, sar(1600));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_earlier_profit_stays_in_equity() {
        let chart = chart();
        let mut entries = entries();
        entries.push(JournalEntry::posted(
            "je-march",
            date(3, 5),
            vec![JournalLine::debit("1110", sar(200)), JournalLine::credit("4100", sar(200))],
        ));
        let march = crate::journal::DateRange::new(date(3, 1), date(3, 31)).unwrap();
        let period = PeriodBalances::compute(&chart, &entries, march);
        let sheet = BalanceSheet::from_period(&chart, &period);

        assert_eq!(sheet.retained_earnings, sar(800));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_unbalanced_entry_shows_gap() {
        let chart = chart();
        let entries = vec![JournalEntry::posted(
            "je-typo",
            date(2, 3),
            vec![JournalLine::debit("1110", sar(100)), JournalLine::credit("3000", sar(90))],
        )];
        let period = PeriodBalances::compute(&chart, &entries, february());
        let sheet = BalanceSheet::from_period(&chart, &period);
        assert!(!sheet.is_balanced());
    }

    #[test]
    fn test_one_halala_gap_is_tolerated() {
        let chart = chart();
        let period = PeriodBalances::compute(&chart, &entries(), february());
        let mut sheet = BalanceSheet::from_period(&chart, &period);
        sheet.total_assets += Money::from_minor(1);
        assert!(sheet.is_balanced());
        sheet.total_assets += Money::from_minor(1);
        assert!(!sheet.is_balanced());
    }
}
