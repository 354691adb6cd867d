//! # Error Types
//!
//! Domain-specific error types for makhzonak-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  makhzonak-core errors (this file)                                     │
//! │  ├── CoreError        - Calculator / domain errors                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  makhzonak-ledger errors (separate crate)                              │
//! │  └── LedgerError      - Chart-of-accounts configuration problems       │
//! │                                                                         │
//! │  makhzonak-cli errors (app)                                            │
//! │  └── AppError         - Settings, snapshot files, arguments            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clamped input is NOT an error: the invoice calculator corrects it and
//! returns a [`crate::invoice::LineWarning`] instead.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An update addressed a row position that does not exist.
    ///
    /// ## When This Occurs
    /// - The UI kept a stale row index after a bulk removal
    #[error("Line index {index} is out of range (draft has {len} lines)")]
    LineIndexOutOfRange { index: usize, len: usize },

    /// No line with the given id exists in the draft.
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid characters in a part number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
