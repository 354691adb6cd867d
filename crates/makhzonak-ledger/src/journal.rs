//! # Journal Entries and Report Periods

use chrono::NaiveDate;
use makhzonak_core::Money;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{LedgerError, LedgerResult};

/// One debit or credit posting against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JournalLine {
    pub account_id: String,
    #[serde(default)]
    pub debit: Money,
    #[serde(default)]
    pub credit: Money,
}

impl JournalLine {
    pub fn debit(account_id: impl Into<String>, amount: Money) -> Self {
        JournalLine {
            account_id: account_id.into(),
            debit: amount,
            credit: Money::ZERO,
        }
    }

    pub fn credit(account_id: impl Into<String>, amount: Money) -> Self {
        JournalLine {
            account_id: account_id.into(),
            debit: Money::ZERO,
            credit: amount,
        }
    }
}

/// A dated set of postings. Only posted entries count toward balances.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JournalEntry {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub is_posted: bool,
    #[serde(default)]
    pub description: String,
    pub items: Vec<JournalLine>,
}

impl JournalEntry {
    /// A posted entry with no description.
    pub fn posted(id: impl Into<String>, date: NaiveDate, items: Vec<JournalLine>) -> Self {
        JournalEntry {
            id: id.into(),
            date,
            is_posted: true,
            description: String::new(),
            items,
        }
    }

    pub fn total_debit(&self) -> Money {
        self.items.iter().map(|i| i.debit).sum()
    }

    pub fn total_credit(&self) -> Money {
        self.items.iter().map(|i| i.credit).sum()
    }

    /// Σ debit == Σ credit.
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }
}

/// Inclusive calendar-date range: `start` from the first moment of the day,
/// `end` through its last moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl DateRange {
    /// ```rust
    /// use chrono::NaiveDate;
    /// use makhzonak_ledger::DateRange;
    ///
    /// let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    /// assert!(DateRange::new(jan, feb).is_ok());
    /// assert!(DateRange::new(feb, jan).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if start > end {
            return Err(LedgerError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// Parses ISO `YYYY-MM-DD` boundaries as sent by the report screen.
    pub fn parse(start: &str, end: &str) -> LedgerResult<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| LedgerError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            })
        };
        Self::new(parse(start)?, parse(end)?)
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// First day after the range; balances strictly before it are the
    /// closing balances of the range.
    pub fn day_after_end(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(NaiveDate::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entry_balance_check() {
        let entry = JournalEntry::posted(
            "je-1",
            date(2024, 1, 5),
            vec![
                JournalLine::debit("1110", Money::from_major(100)),
                JournalLine::credit("4100", Money::from_major(100)),
            ],
        );
        assert!(entry.is_balanced());

        let mut lopsided = entry.clone();
        lopsided.items.pop();
        assert!(!lopsided.is_balanced());
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert!(!range.contains(date(2023, 12, 31)));
        assert_eq!(range.day_after_end(), date(2024, 2, 1));
    }

    #[test]
    fn test_parse_range() {
        let range = DateRange::parse("2024-01-01", " 2024-03-31 ").unwrap();
        assert_eq!(range.end, date(2024, 3, 31));
        assert!(DateRange::parse("2024-13-01", "2024-12-31").is_err());
        assert!(DateRange::parse("2024-02-01", "2024-01-01").is_err());
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let json = r#"{
            "id": "je-9",
            "date": "2024-04-02",
            "is_posted": false,
            "items": [{ "account_id": "5100", "debit": 2500 }]
        }"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.items[0].credit, Money::ZERO);
        assert_eq!(entry.total_debit(), Money::from_minor(2500));
        assert!(entry.description.is_empty());
    }
}
