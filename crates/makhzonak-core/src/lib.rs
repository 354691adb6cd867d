//! # makhzonak-core: Pure Business Logic for Makhzonak+
//!
//! This crate holds the invoice-side business logic of Makhzonak+ as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Makhzonak+ Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (web SPA)                           │   │
//! │  │   Sales Invoice ── Purchase Order ── Quotation ── Reports       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed records (ts-rs bindings)         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ makhzonak-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  invoice  │  │ validation│  │   │
//! │  │   │ Part, Kit │  │   Money   │  │ LineItem  │  │   rules   │  │   │
//! │  │   │  TaxRate  │  │  rounding │  │  Totals   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            makhzonak-ledger (financial statements)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Part, Kit, TaxRate, Percent, DocumentKind)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice`] - Invoice / PO / quotation line-item calculator
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use makhzonak_core::invoice::{InvoiceCalculator, LinePrefill};
//! use makhzonak_core::{Money, Part, TaxRate};
//!
//! let part = Part::new("p-1", "OF-2201", "Oil filter", Money::from_major(35)).unwrap();
//!
//! let mut draft = InvoiceCalculator::new(TaxRate::from_bps(1500), Money::ZERO);
//! draft.add_filled_row(LinePrefill::from_part(&part));
//!
//! // 35.00 + 15% VAT
//! assert_eq!(draft.totals().grand_total, Money::from_minor(4025));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{InvoiceCalculator, InvoiceTotals, LineItem, LineKind};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID for single-tenant deployments.
///
/// Records carry a tenant id so that a shared backend can host several
/// shops; local installs use this value.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";
