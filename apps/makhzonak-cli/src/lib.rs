//! # Makhzonak+ Application Layer
//!
//! Settings, in-memory state and the reporting binary around the pure
//! `makhzonak-core` and `makhzonak-ledger` crates.
//!
//! ## Module Organization
//! ```text
//! makhzonak_cli/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── settings.rs     ◄─── CompanySettings: defaults → TOML → env
//! ├── state.rs        ◄─── AppState + JSON Snapshot loading
//! ├── render.rs       ◄─── Plain-text report rendering
//! ├── logging.rs      ◄─── tracing-subscriber setup
//! ├── error.rs        ◄─── AppError
//! └── bin/
//!     └── makhzonak-reports.rs
//! ```

pub mod error;
pub mod logging;
pub mod render;
pub mod settings;
pub mod state;

pub use error::{AppError, AppResult};
pub use settings::CompanySettings;
pub use state::{AppState, Snapshot};
