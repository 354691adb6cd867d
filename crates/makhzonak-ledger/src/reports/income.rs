//! Income statement: period roll-ups of the revenue and expense trees.

use makhzonak_core::Money;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{report_lines, ReportLine};
use crate::accounts::{AccountType, ChartOfAccounts};
use crate::balances::PeriodBalances;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IncomeStatement {
    pub revenue: Vec<ReportLine>,
    pub expenses: Vec<ReportLine>,
    pub total_revenue: Money,
    pub total_expense: Money,
    /// `total_revenue − total_expense`
    pub net_profit: Money,
}

impl IncomeStatement {
    pub fn from_period(chart: &ChartOfAccounts, period: &PeriodBalances) -> Self {
        let period_total = |account_type: AccountType| -> Money {
            chart
                .roots_of_type(account_type)
                .map(|root| chart.recursive_period_total(&root.id, &period.movements))
                .sum()
        };
        let lines = |account_type: AccountType| {
            report_lines(chart, account_type, |account| {
                chart.recursive_period_total(&account.id, &period.movements)
            })
        };

        let total_revenue = period_total(AccountType::Revenue);
        let total_expense = period_total(AccountType::Expense);

        IncomeStatement {
            revenue: lines(AccountType::Revenue),
            expenses: lines(AccountType::Expense),
            total_revenue,
            total_expense,
            net_profit: total_revenue - total_expense,
        }
    }
}
