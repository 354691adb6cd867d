//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An invoice line of 3 × 33.33 SAR with 15% VAT accumulates drift        │
//! │  across every line, every report, every trial balance.                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Halalas (1 SAR = 100 halalas)                    │
//! │    Every amount is an i64 count of minor units.                         │
//! │    Every division rounds explicitly, half away from zero.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use makhzonak_core::money::Money;
//!
//! let price = Money::from_minor(1099); // 10.99 SAR
//! let doubled = price * 2;             // 21.98 SAR
//! let total = price + Money::from_minor(500);
//! assert_eq!(total.minor(), 1599);
//! assert_eq!(doubled.to_string(), "21.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{Percent, TaxRate};

/// Divides with rounding half away from zero.
///
/// All derived money amounts in the workspace go through this helper so that
/// positive and negative values round symmetrically.
pub(crate) fn div_round(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator != 0);
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        if (numerator < 0) != (denominator < 0) {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (halalas for SAR).
///
/// ## Design Decisions
/// - **i64 (signed)**: balances in the ledger are signed; invoice amounts are
///   clamped non-negative by the calculator, not by the type
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a bare integer**: the frontend formats for display
/// - **Saturating arithmetic**: `+`, `-`, `*` and negation stop at the i64
///   bounds instead of wrapping, so an absurd quantity can never flip a
///   total negative
///
/// ## Where Money is Used
/// ```text
/// Part.price ──► LineItem.unit_price ──► LineItem.line_total ──► InvoiceTotals
///
/// JournalLine.debit/credit ──► Movement ──► balances ──► statements
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Zero money value.
    pub const ZERO: Money = Money(0);

    /// Largest representable amount; saturated results land here.
    pub const MAX: Money = Money(i64::MAX);

    /// Creates a Money value from minor units (halalas).
    ///
    /// ```rust
    /// use makhzonak_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // 10.99 SAR
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units (riyals and halalas).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    ///
    /// ```rust
    /// use makhzonak_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).minor(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Creates a Money value from whole riyals.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (riyal) portion, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    fn saturating(wide: i128) -> Self {
        Money(wide.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Clamps negative values to zero.
    #[inline]
    pub fn non_negative(self) -> Self {
        Money(self.0.max(0))
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    ///
    /// ```rust
    /// use makhzonak_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 897);
    /// assert_eq!(unit_price.multiply_quantity(i64::MAX), Money::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Calculates tax at the given rate, rounded half away from zero.
    ///
    /// ```rust
    /// use makhzonak_core::money::Money;
    /// use makhzonak_core::types::TaxRate;
    ///
    /// let net = Money::from_minor(23000);  // 230.00 SAR
    /// let vat = TaxRate::from_bps(1500);   // 15%
    /// assert_eq!(net.calculate_tax(vat).minor(), 3450);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large ledgers from overflowing in the intermediate product
        Money::saturating(div_round(self.0 as i128 * rate.bps() as i128, 10_000))
    }

    /// Returns the given percentage of this amount (the discount amount, not
    /// the discounted total), rounded to the minor unit.
    ///
    /// ```rust
    /// use makhzonak_core::money::Money;
    /// use makhzonak_core::types::Percent;
    ///
    /// let gross = Money::from_major(200);
    /// assert_eq!(gross.percentage(Percent::from_bps(1000)), Money::from_major(20));
    /// ```
    pub fn percentage(&self, percent: Percent) -> Money {
        Money::saturating(div_round(self.0 as i128 * percent.bps() as i128, 10_000))
    }

    /// Returns what percentage `self` is of `whole`, rounded to 0.01%.
    ///
    /// A zero or negative `whole` yields zero percent.
    pub fn ratio_of(&self, whole: Money) -> Percent {
        if whole.0 <= 0 || self.0 <= 0 {
            return Percent::zero();
        }
        let bps = div_round(self.0 as i128 * 10_000, whole.0 as i128);
        Percent::from_bps(bps.clamp(0, u32::MAX as i128) as u32)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering ("12.34"); currency symbols belong to settings.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "10.99");
        assert_eq!(Money::from_minor(500).to_string(), "5.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::from_minor(-5).to_string(), "-0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
        assert_eq!((-a).minor(), -1000);
        assert_eq!(vec![a, b, b].into_iter().sum::<Money>().minor(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_minor(i64::MAX / 2 + 1);

        assert_eq!(big + big, Money::MAX);
        assert_eq!(big * 3, Money::MAX);
        assert_eq!(-big * 3, Money::from_minor(i64::MIN));
        assert_eq!(Money::from_minor(i64::MIN) - big, Money::from_minor(i64::MIN));
        assert_eq!(-Money::from_minor(i64::MIN), Money::MAX);

        let mut total = Money::MAX;
        total += Money::from_minor(1);
        assert_eq!(total, Money::MAX);
        assert_eq!(vec![Money::MAX, Money::MAX].into_iter().sum::<Money>(), Money::MAX);
    }

    #[test]
    fn test_div_round_is_symmetric() {
        assert_eq!(div_round(5, 10), 1);
        assert_eq!(div_round(4, 10), 0);
        assert_eq!(div_round(-5, 10), -1);
        assert_eq!(div_round(-4, 10), 0);
        assert_eq!(div_round(15, 10), 2);
        assert_eq!(div_round(-15, 10), -2);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let tax = Money::from_minor(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.minor(), 83);

        // Credit notes round symmetrically
        let tax = Money::from_minor(-1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.minor(), -83);
    }

    #[test]
    fn test_percentage_and_ratio() {
        let gross = Money::from_minor(20000);
        let amount = gross.percentage(Percent::from_bps(1000));
        assert_eq!(amount.minor(), 2000);
        assert_eq!(amount.ratio_of(gross).bps(), 1000);

        // 1/3 of the gross → 33.33%
        assert_eq!(Money::from_minor(100).ratio_of(Money::from_minor(300)).bps(), 3333);
        assert_eq!(Money::from_minor(100).ratio_of(Money::ZERO), Percent::zero());
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Money::from_minor(-1).non_negative(), Money::ZERO);
        assert_eq!(Money::from_minor(7).non_negative().minor(), 7);
    }
}
