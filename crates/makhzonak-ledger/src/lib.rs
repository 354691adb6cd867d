//! # makhzonak-ledger: Financial Statements for Makhzonak+
//!
//! Aggregates posted journal entries over a chart of accounts into period
//! balances and the four standard reports. Like `makhzonak-core`, this crate
//! performs no I/O: callers hand in records, reports come back as values.
//!
//! ## Modules
//!
//! - [`accounts`] - Account types, the chart-of-accounts tree, roll-ups
//! - [`journal`] - Journal entries and inclusive date ranges
//! - [`balances`] - Opening / movement / closing balances for a period
//! - [`reports`] - Income statement, balance sheet, cash flow, trial balance
//! - [`error`] - Ledger error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use makhzonak_core::Money;
//! use makhzonak_ledger::{
//!     Account, AccountRoles, AccountType, ChartOfAccounts, DateRange, FinancialReports,
//!     JournalEntry, JournalLine,
//! };
//!
//! let chart = ChartOfAccounts::new(vec![
//!     Account::new("1110", "Cash", AccountType::Asset).cash_equivalent(),
//!     Account::new("4100", "Parts sales", AccountType::Revenue),
//! ])
//! .unwrap();
//!
//! let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
//! let entries = vec![JournalEntry::posted(
//!     "je-1",
//!     day,
//!     vec![
//!         JournalLine::debit("1110", Money::from_major(250)),
//!         JournalLine::credit("4100", Money::from_major(250)),
//!     ],
//! )];
//!
//! let range = DateRange::new(day, day).unwrap();
//! let reports = FinancialReports::generate(&chart, &entries, range, &AccountRoles::default());
//!
//! assert_eq!(reports.income_statement.net_profit, Money::from_major(250));
//! assert_eq!(reports.cash_flow.cash_at_end, Money::from_major(250));
//! ```

pub mod accounts;
pub mod balances;
pub mod error;
pub mod journal;
pub mod reports;

pub use accounts::{Account, AccountType, ChartOfAccounts};
pub use balances::{
    closing_balances, compute_balances_before, compute_period_movements, Movement, PeriodBalances,
};
pub use error::{LedgerError, LedgerResult};
pub use journal::{DateRange, JournalEntry, JournalLine};
pub use reports::{
    AccountRoles, BalanceSheet, CashFlowStatement, FinancialReports, IncomeStatement, ReportLine,
    TrialBalance,
};
