//! Plain-text rendering of [`FinancialReports`] for terminals and logs.

use std::fmt::Write;

use makhzonak_core::Money;
use makhzonak_ledger::{FinancialReports, ReportLine};

use crate::settings::CompanySettings;

/// Width of the label column.
const LABEL_WIDTH: usize = 40;

struct Renderer<'a> {
    settings: &'a CompanySettings,
    out: String,
}

impl<'a> Renderer<'a> {
    fn heading(&mut self, title: &str) {
        let _ = writeln!(self.out, "\n{}\n{}", title, "=".repeat(title.chars().count()));
    }

    fn row(&mut self, label: &str, amount: Money) {
        let _ = writeln!(
            self.out,
            "{:<width$} {:>18}",
            label,
            self.settings.format_currency(amount.minor()),
            width = LABEL_WIDTH
        );
    }

    fn lines(&mut self, lines: &[ReportLine]) {
        for line in lines {
            let label = format!("{}{} {}", "  ".repeat(line.depth as usize), line.account_id, line.name);
            self.row(&label, line.amount);
        }
    }

    fn columns(&mut self, label: &str, values: [Money; 6]) {
        let _ = write!(self.out, "{:<28}", label);
        for value in values {
            let _ = write!(self.out, " {:>12}", value);
        }
        self.out.push('\n');
    }
}

/// Renders all four statements.
pub fn render_reports(reports: &FinancialReports, settings: &CompanySettings) -> String {
    let mut r = Renderer {
        settings,
        out: String::new(),
    };
    let _ = writeln!(
        r.out,
        "{}: {} to {}",
        settings.company.name, reports.range.start, reports.range.end
    );

    let is = &reports.income_statement;
    r.heading("Income Statement");
    r.lines(&is.revenue);
    r.row("Total revenue", is.total_revenue);
    r.lines(&is.expenses);
    r.row("Total expenses", is.total_expense);
    r.row("Net profit", is.net_profit);

    let bs = &reports.balance_sheet;
    r.heading(&format!("Balance Sheet as of {}", bs.as_of));
    r.lines(&bs.assets);
    r.row("Total assets", bs.total_assets);
    r.lines(&bs.liabilities);
    r.row("Total liabilities", bs.total_liabilities);
    r.lines(&bs.equity);
    r.row("Retained earnings", bs.retained_earnings);
    r.row("Total equity", bs.total_equity);
    if !bs.is_balanced() {
        r.out.push_str("!! assets differ from liabilities + equity\n");
    }

    let cf = &reports.cash_flow;
    r.heading("Cash Flow Statement");
    r.row("Net profit", cf.net_profit);
    r.row("Change in receivables", -cf.change_in_receivables);
    r.row("Change in inventory", -cf.change_in_inventory);
    r.row("Change in payables", cf.change_in_payables);
    r.row("Operating activities", cf.operating);
    r.row("Investing activities", cf.investing);
    r.row("Financing activities", cf.financing);
    r.row("Net change in cash", cf.net_change);
    r.row("Cash at start", cf.cash_at_start);
    r.row("Cash at end", cf.cash_at_end);
    r.row("Cash at end (start + net change)", cf.cash_at_end_derived);

    let tb = &reports.trial_balance;
    r.heading("Trial Balance");
    let _ = writeln!(
        r.out,
        "{:<28} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Account", "Open Dr", "Open Cr", "Period Dr", "Period Cr", "Close Dr", "Close Cr"
    );
    for row in &tb.rows {
        r.columns(
            &format!("{} {}", row.account_id, row.name),
            [
                row.opening_debit,
                row.opening_credit,
                row.period_debit,
                row.period_credit,
                row.closing_debit,
                row.closing_credit,
            ],
        );
    }
    let t = &tb.totals;
    r.columns(
        "Total",
        [
            t.opening_debit,
            t.opening_credit,
            t.period_debit,
            t.period_credit,
            t.closing_debit,
            t.closing_credit,
        ],
    );

    r.out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use makhzonak_ledger::{
        Account, AccountRoles, AccountType, ChartOfAccounts, DateRange, JournalEntry, JournalLine,
    };

    use super::*;

    #[test]
    fn test_render_contains_every_section() {
        let chart = ChartOfAccounts::new(vec![
            Account::new("1110", "Cash", AccountType::Asset).cash_equivalent(),
            Account::new("4000", "Sales", AccountType::Revenue),
        ])
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let entries = vec![JournalEntry::posted(
            "je-1",
            day,
            vec![
                JournalLine::debit("1110", Money::from_major(50)),
                JournalLine::credit("4000", Money::from_major(50)),
            ],
        )];
        let reports = FinancialReports::generate(
            &chart,
            &entries,
            DateRange::new(day, day).unwrap(),
            &AccountRoles::default(),
        );

        let text = render_reports(&reports, &CompanySettings::default());
        assert!(text.contains("Income Statement"));
        assert!(text.contains("Balance Sheet as of 2024-06-01"));
        assert!(text.contains("Cash Flow Statement"));
        assert!(text.contains("Trial Balance"));
        assert!(text.contains("50.00 SAR"));
        assert!(!text.contains("!!"));
    }
}
