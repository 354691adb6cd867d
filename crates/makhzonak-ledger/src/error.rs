//! # Ledger Error Types
//!
//! Report generation over partially configured tenant data is expected to
//! succeed: missing accounts, missing AR/AP settings and empty ledgers all
//! degrade to zero. The errors here are the structural problems that would
//! otherwise make a report loop forever or lie.

use thiserror::Error;

/// Chart-of-accounts and report configuration errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Following `parent_id` links from an account returns to an account
    /// already visited.
    ///
    /// ## Example
    /// ```text
    /// 1100 Cash ──parent──► 1000 Assets ──parent──► 1100 Cash   ✗
    /// ```
    #[error("Account hierarchy contains a cycle through account {account_id}")]
    CyclicHierarchy { account_id: String },

    /// The report period ends before it starts.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    /// An account id referenced by the caller is not in the chart.
    #[error("Account not found: {0}")]
    UnknownAccount(String),
}

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
