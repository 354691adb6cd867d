//! # Financial Reports
//!
//! The four statements for one period, all derived from the same
//! [`PeriodBalances`].
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ChartOfAccounts + posted JournalEntries + DateRange                    │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                  PeriodBalances                                         │
//! │        opening ─── movements ─── closing                                │
//! │           │            │            │                                   │
//! │           │            ▼            │                                   │
//! │           │     IncomeStatement     │                                   │
//! │           │     (period roll-ups)   │                                   │
//! │           │            │ net profit ▼                                   │
//! │           │            └──────► CashFlowStatement ◄── AccountRoles      │
//! │           │                     (ΔAR, ΔInventory, ΔAP)                  │
//! │           ▼                         ▼                                   │
//! │     TrialBalance               BalanceSheet                             │
//! │     (every account)            (closing roll-ups)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing data never fails a report: an empty chart, an empty ledger or an
//! unset AR/AP/Inventory role all contribute zero.

pub mod balance_sheet;
pub mod cash_flow;
pub mod income;
pub mod trial_balance;

use makhzonak_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::accounts::{Account, AccountType, ChartOfAccounts};
use crate::balances::PeriodBalances;
use crate::journal::{DateRange, JournalEntry};

pub use balance_sheet::BalanceSheet;
pub use cash_flow::CashFlowStatement;
pub use income::IncomeStatement;
pub use trial_balance::{TrialBalance, TrialBalanceRow, TrialBalanceTotals};

// =============================================================================
// Shared Types
// =============================================================================

/// Account ids playing the working-capital roles of the cash-flow statement.
///
/// Each role is optional; an unset or unknown id contributes zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccountRoles {
    #[serde(default)]
    pub receivable_account_id: Option<String>,
    #[serde(default)]
    pub payable_account_id: Option<String>,
    #[serde(default)]
    pub inventory_account_id: Option<String>,
}

/// One rendered statement row: an account and its rolled-up amount,
/// indented by `depth` below its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportLine {
    pub account_id: String,
    pub name: String,
    pub depth: u32,
    pub amount: Money,
}

/// Flattens every root of `account_type` into pre-order report lines, with
/// `amount` giving the roll-up for each account.
pub(crate) fn report_lines<F>(chart: &ChartOfAccounts, account_type: AccountType, amount: F) -> Vec<ReportLine>
where
    F: Fn(&Account) -> Money,
{
    chart
        .roots_of_type(account_type)
        .flat_map(|root| chart.subtree(&root.id))
        .map(|(depth, account)| ReportLine {
            account_id: account.id.clone(),
            name: account.name.clone(),
            depth: depth as u32,
            amount: amount(account),
        })
        .collect()
}

// =============================================================================
// Financial Reports
// =============================================================================

/// Income statement, balance sheet, cash-flow statement and trial balance
/// for one period.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinancialReports {
    pub range: DateRange,
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
    pub cash_flow: CashFlowStatement,
    pub trial_balance: TrialBalance,
}

impl FinancialReports {
    pub fn generate(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        range: DateRange,
        roles: &AccountRoles,
    ) -> Self {
        let period = PeriodBalances::compute(chart, entries, range);

        let income_statement = IncomeStatement::from_period(chart, &period);
        let balance_sheet = BalanceSheet::from_period(chart, &period);
        let cash_flow = CashFlowStatement::from_period(chart, &period, income_statement.net_profit, roles);
        let trial_balance = TrialBalance::from_period(chart, &period);

        if !balance_sheet.is_balanced() {
            warn!(
                assets = %balance_sheet.total_assets,
                liabilities = %balance_sheet.total_liabilities,
                equity = %balance_sheet.total_equity,
                "Balance sheet does not balance"
            );
        }

        info!(
            start = %range.start,
            end = %range.end,
            net_profit = %income_statement.net_profit,
            "Financial reports generated"
        );

        FinancialReports {
            range,
            income_statement,
            balance_sheet,
            cash_flow,
            trial_balance,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_generate_all_reports() {
        let reports = FinancialReports::generate(&chart(), &entries(), february(), &roles());

        assert_eq!(reports.income_statement.net_profit, sar(600));
        assert_eq!(reports.cash_flow.operating, sar(550));
        assert_eq!(reports.cash_flow.cash_at_end, sar(1550));
        assert!(reports.balance_sheet.is_balanced());
        assert!(reports.trial_balance.is_balanced());
    }

    #[test]
    fn test_empty_inputs_degrade_to_zero() {
        let chart = ChartOfAccounts::new(Vec::new()).unwrap();
        let reports = FinancialReports::generate(&chart, &[], february(), &AccountRoles::default());

        assert_eq!(reports.income_statement.net_profit, Money::ZERO);
        assert_eq!(reports.balance_sheet.total_assets, Money::ZERO);
        assert_eq!(reports.cash_flow.net_change, Money::ZERO);
        assert!(reports.trial_balance.rows.is_empty());
        assert!(reports.balance_sheet.is_balanced());
    }

    #[test]
    fn test_report_lines_are_pre_order() {
        let chart = chart();
        let lines = report_lines(&chart, AccountType::Asset, |_| Money::ZERO);
        let ids: Vec<(&str, u32)> = lines.iter().map(|l| (l.account_id.as_str(), l.depth)).collect();
        assert_eq!(ids, vec![("1000", 0), ("1110", 1), ("1200", 1)]);
    }

    #[test]
    fn test_reports_serialize() {
        let reports = FinancialReports::generate(&chart(), &entries(), february(), &roles());
        let json = serde_json::to_value(&reports).unwrap();
        assert_eq!(json["range"]["start"], "2024-02-01");
        assert_eq!(json["income_statement"]["net_profit"], 60000);
    }
}
