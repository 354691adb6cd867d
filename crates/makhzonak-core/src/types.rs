//! # Domain Types
//!
//! Core domain types shared by the invoice calculator and the frontend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Part       │   │       Kit       │   │  KitComponent   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  part_id        │       │
//! │  │  part_number    │   │  name           │   │  name           │       │
//! │  │  name           │   │  items ─────────┼──►│  quantity/kit   │       │
//! │  │  price          │   │                 │   │  price (frozen) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    Percent      │   │  DocumentKind   │       │
//! │  │  bps (u32)      │   │  bps (u32)      │   │  SalesInvoice   │       │
//! │  │  1500 = 15%     │   │  1234 = 12.34%  │   │  PurchaseOrder  │       │
//! │  └─────────────────┘   └─────────────────┘   │  Quotation      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{validate_item_name, validate_part_number, validate_price, validate_quantity};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (Saudi VAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Creates a tax rate from a fraction (`0.15` = 15%), the form company
    /// settings are stored in by the frontend.
    pub fn from_fraction(fraction: f64) -> Self {
        TaxRate((fraction * 10_000.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage in basis points, used for line discounts.
///
/// A percentage rounded to two decimals is exact here: `12.34%` is `1234`.
/// The type itself does not clamp; the invoice calculator clamps to
/// [`Percent::FULL`] and reports when it had to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// 100%.
    pub const FULL: Percent = Percent(10_000);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percent from a human percentage (`12.5` = 12.5%), rounded to
    /// two decimals. Negative inputs saturate to zero.
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the value as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Clamps to at most 100%.
    #[inline]
    pub fn clamped(self) -> Self {
        self.min(Percent::FULL)
    }
}

// =============================================================================
// Part
// =============================================================================

/// A stocked auto part available for sale or purchase.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Part {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Manufacturer / OEM part number - business identifier.
    pub part_number: String,

    /// Display name shown on invoices.
    pub name: String,

    /// Selling price.
    pub price: Money,

    /// Last purchase cost (for purchase orders and margins).
    pub cost: Option<Money>,

    /// Current stock level.
    pub stock: i64,
}

impl Part {
    /// Creates a part after validating its business fields.
    ///
    /// ```rust
    /// use makhzonak_core::{Money, Part};
    ///
    /// let part = Part::new("p-1", "OF-2201", "Oil filter", Money::from_minor(3500)).unwrap();
    /// assert_eq!(part.part_number, "OF-2201");
    /// assert!(Part::new("p-2", "", "Nameless", Money::ZERO).is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        part_number: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> CoreResult<Self> {
        let part_number = part_number.into();
        let name = name.into();
        validate_part_number(&part_number)?;
        validate_item_name(&name)?;
        validate_price(price)?;

        Ok(Part {
            id: id.into(),
            part_number: part_number.trim().to_string(),
            name: name.trim().to_string(),
            price,
            cost: None,
            stock: 0,
        })
    }
}

// =============================================================================
// Kits
// =============================================================================

/// One part inside a kit definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KitItem {
    pub part_id: String,
    pub quantity: i64,
}

/// A bundle of parts sold or purchased as a single line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Kit {
    pub id: String,
    pub name: String,
    pub items: Vec<KitItem>,
}

impl Kit {
    /// Creates a kit after validating its name and per-kit quantities.
    pub fn new(id: impl Into<String>, name: impl Into<String>, items: Vec<KitItem>) -> CoreResult<Self> {
        let name = name.into();
        validate_item_name(&name)?;
        for item in &items {
            validate_quantity(item.quantity)?;
        }

        Ok(Kit {
            id: id.into(),
            name: name.trim().to_string(),
            items,
        })
    }

    /// Resolves the kit definition against the parts catalogue, freezing each
    /// component's current name and price.
    ///
    /// Items whose part no longer exists are skipped with a warning, which
    /// leaves the kit priced without them.
    pub fn resolve_components(&self, parts: &[Part]) -> Vec<KitComponent> {
        self.items
            .iter()
            .filter_map(|item| {
                let Some(part) = parts.iter().find(|p| p.id == item.part_id) else {
                    warn!(kit_id = %self.id, part_id = %item.part_id, "Kit component missing from catalogue, skipped");
                    return None;
                };
                Some(KitComponent {
                    part_id: part.id.clone(),
                    name: part.name.clone(),
                    quantity_per_kit: item.quantity,
                    price: part.price,
                })
            })
            .collect()
    }
}

/// A resolved kit component carried on a kit line for display.
///
/// Component prices are never used for the line total directly; the kit's
/// unit price is fixed when the line is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KitComponent {
    pub part_id: String,
    pub name: String,
    pub quantity_per_kit: i64,
    pub price: Money,
}

impl KitComponent {
    /// Price of this component for one kit.
    #[inline]
    pub fn extended_price(&self) -> Money {
        self.price.multiply_quantity(self.quantity_per_kit)
    }
}

// =============================================================================
// Document Kind
// =============================================================================

/// The kind of draft a line list belongs to.
///
/// The calculator behaves identically for all kinds; only the tax rate and
/// loyalty point value passed in differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    SalesInvoice,
    PurchaseOrder,
    Quotation,
}

impl DocumentKind {
    /// Whether company VAT is charged on this kind of document.
    pub fn charges_tax(&self) -> bool {
        matches!(self, DocumentKind::SalesInvoice)
    }

    /// Whether customers can redeem loyalty points against it.
    pub fn accepts_loyalty(&self) -> bool {
        matches!(self, DocumentKind::SalesInvoice)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, price_minor: i64) -> Part {
        Part::new(id, format!("PN-{}", id), format!("Part {}", id), Money::from_minor(price_minor))
            .unwrap()
    }

    #[test]
    fn test_tax_rate_conversions() {
        assert_eq!(TaxRate::from_percentage(15.0).bps(), 1500);
        assert_eq!(TaxRate::from_fraction(0.15).bps(), 1500);
        assert!((TaxRate::from_bps(825).percentage() - 8.25).abs() < 0.001);
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_percent_clamping() {
        assert_eq!(Percent::from_percentage(12.34).bps(), 1234);
        assert_eq!(Percent::from_percentage(-5.0), Percent::zero());
        assert_eq!(Percent::from_bps(12_000).clamped(), Percent::FULL);
        assert_eq!(Percent::from_bps(500).clamped().bps(), 500);
    }

    #[test]
    fn test_kit_resolves_components_and_skips_missing_parts() {
        let parts = vec![part("a", 1000), part("b", 250)];
        let kit = Kit::new(
            "kit-1",
            "Brake service kit",
            vec![
                KitItem { part_id: "a".into(), quantity: 2 },
                KitItem { part_id: "b".into(), quantity: 4 },
                KitItem { part_id: "gone".into(), quantity: 1 },
            ],
        )
        .unwrap();

        let components = kit.resolve_components(&parts);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].extended_price().minor(), 2000);
        assert_eq!(components[1].extended_price().minor(), 1000);
    }

    #[test]
    fn test_kit_rejects_zero_quantity() {
        let result = Kit::new("kit", "Kit", vec![KitItem { part_id: "a".into(), quantity: 0 }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_document_kind_parameters() {
        assert!(DocumentKind::SalesInvoice.charges_tax());
        assert!(!DocumentKind::PurchaseOrder.charges_tax());
        assert!(!DocumentKind::Quotation.accepts_loyalty());
        assert_eq!(DocumentKind::default(), DocumentKind::SalesInvoice);
    }
}
