//! # Validation Module
//!
//! Input validation for catalogue records and company settings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  └── <input type="number" min="0">, required fields                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Catalogue records (Part, Kit) and settings are REJECTED           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Invoice calculator                                           │
//! │  └── Draft line edits are CLAMPED with a warning, never rejected       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest part number accepted (OEM numbers with supersession suffixes).
const MAX_PART_NUMBER_LEN: usize = 50;

const MAX_NAME_LEN: usize = 200;

/// Validates a part number.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens, underscores, dots and slashes only
///
/// ```rust
/// use makhzonak_core::validation::validate_part_number;
///
/// assert!(validate_part_number("04465-0K240").is_ok());
/// assert!(validate_part_number("").is_err());
/// assert!(validate_part_number("has space").is_err());
/// ```
pub fn validate_part_number(part_number: &str) -> ValidationResult<()> {
    let part_number = part_number.trim();

    if part_number.is_empty() {
        return Err(ValidationError::Required {
            field: "part_number".to_string(),
        });
    }

    if part_number.chars().count() > MAX_PART_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "part_number".to_string(),
            max: MAX_PART_NUMBER_LEN,
        });
    }

    if !part_number
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "part_number".to_string(),
            reason: "must contain only letters, numbers, '-', '_', '.' and '/'".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (parts, kits, accounts).
///
/// Length is counted in characters so Arabic names are not penalised for
/// their UTF-8 width.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a catalogue quantity (kit contents).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalogue price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates the value of one loyalty point.
pub fn validate_point_value(value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "point_value".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}
