//! # Application Error Type
//!
//! Everything that can stop the app before or around the pure calculators:
//! unreadable files, malformed settings or snapshots, and the structural
//! ledger problems the reports refuse to paper over.
//!
//! ```text
//! settings.toml ──► toml::de::Error  ──┐
//! snapshot.json ──► serde_json::Error ─┤
//! file system   ──► std::io::Error   ──┼──► AppError ──► exit code 1
//! validation    ──► ValidationError  ──┤
//! chart / range ──► LedgerError      ──┘
//! ```

use std::path::PathBuf;

use makhzonak_core::{CoreError, ValidationError};
use makhzonak_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`crate::CompanySettings`].
    #[error("Invalid settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Settings parsed but hold values the calculators cannot use.
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] ValidationError),

    /// The snapshot is not valid JSON for [`crate::Snapshot`].
    #[error("Invalid snapshot: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_is_transparent() {
        let err: AppError = LedgerError::CyclicHierarchy {
            account_id: "1100".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Account hierarchy contains a cycle through account 1100");
    }

    #[test]
    fn test_io_error_names_the_file() {
        let err = AppError::io(
            "/nowhere/settings.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().starts_with("Failed to read /nowhere/settings.toml"));
    }
}
