//! # Invoice Line-Item Calculator
//!
//! Maintains the editable draft of lines behind a sales invoice, purchase
//! order or quotation, and keeps every derived amount consistent with each
//! edit.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Operations                                     │
//! │                                                                         │
//! │  Frontend Action          Calculator Call          Draft Change         │
//! │  ───────────────          ───────────────          ────────────         │
//! │                                                                         │
//! │  "+ Line" ───────────────► add_empty_row() ──────► push(Empty, qty 1)   │
//! │  Pick from search ───────► add_filled_row() ─────► push(Part, totals)   │
//! │  Pick a kit ─────────────► add_kit_row() ────────► drop blanks, push    │
//! │  Edit a cell ────────────► update_item() ────────► merge, recompute     │
//! │  Delete / bulk delete ───► remove_rows() ────────► retain (never empty) │
//! │  Duplicate selection ────► copy_rows() ──────────► push clones          │
//! │  New document ───────────► reset_all() ──────────► [Empty], points = 0  │
//! │                                                                         │
//! │  Totals are recomputed from the lines on every read: totals()           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Discount Rule
//! Exactly one of percent / amount is authoritative per update. Percent wins
//! if both are present. The other field is derived and rounded to 0.01.
//! The amount is always kept within `[0, gross]`, so a line total can never
//! go negative; every correction is reported as a [`LineWarning`].
//!
//! ## Example
//! ```rust
//! use makhzonak_core::invoice::{InvoiceCalculator, LineKind, LinePatch};
//! use makhzonak_core::{Money, Percent, TaxRate};
//!
//! let mut draft = InvoiceCalculator::new(TaxRate::from_bps(1500), Money::ZERO);
//! draft
//!     .update_item(0, LinePatch {
//!         kind: Some(LineKind::part("p-1", "Brake pads")),
//!         quantity: Some(2),
//!         unit_price: Some(Money::from_major(100)),
//!         discount_percent: Some(Percent::from_percentage(10.0)),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let totals = draft.totals();
//! assert_eq!(totals.net_total, Money::from_major(180));
//! assert_eq!(totals.grand_total, Money::from_major(207));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DocumentKind, Kit, KitComponent, Part, Percent, TaxRate};

// =============================================================================
// Line Kind
// =============================================================================

/// What a line prices.
///
/// A line references at most one priced entity; a row with both a part and a
/// kit cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineKind {
    /// Placeholder row with nothing selected yet.
    #[default]
    Empty,

    Part { part_id: String, name: String },

    /// `components` is for display/expansion only.
    Kit {
        kit_id: String,
        name: String,
        components: Vec<KitComponent>,
    },
}

impl LineKind {
    pub fn part(part_id: impl Into<String>, name: impl Into<String>) -> Self {
        LineKind::Part {
            part_id: part_id.into(),
            name: name.into(),
        }
    }

    /// The referenced part or kit id, if any.
    pub fn reference_id(&self) -> Option<&str> {
        match self {
            LineKind::Empty => None,
            LineKind::Part { part_id, .. } => Some(part_id),
            LineKind::Kit { kit_id, .. } => Some(kit_id),
        }
    }

    pub fn has_reference(&self) -> bool {
        self.reference_id().is_some()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a draft.
///
/// ## Invariants (maintained by [`InvoiceCalculator`])
/// - `quantity >= 0`, `unit_price >= 0`
/// - `0 <= discount_amount <= gross()`
/// - `discount_percent <= 100%`
/// - `line_total == gross() - discount_amount`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Stable across edits; used for selection and removal.
    pub id: String,
    pub kind: LineKind,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount_percent: Percent,
    pub discount_amount: Money,
    pub line_total: Money,
    pub notes: String,
}

impl LineItem {
    /// A fresh placeholder row: quantity 1, price 0, no discount.
    pub fn empty() -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            kind: LineKind::Empty,
            quantity: 1,
            unit_price: Money::ZERO,
            discount_percent: Percent::zero(),
            discount_amount: Money::ZERO,
            line_total: Money::ZERO,
            notes: String::new(),
        }
    }

    /// `quantity × unit_price`, before discount.
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// A row counts toward totals only when it references a part or kit and
    /// has a positive quantity.
    pub fn is_valid(&self) -> bool {
        self.kind.has_reference() && self.quantity > 0
    }

    /// Copy of this row under a new id.
    pub fn duplicate(&self) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }

    /// Kit components multiplied out by the line quantity, for pick lists and
    /// printed invoices. Part and empty lines expand to nothing.
    pub fn expanded_components(&self) -> Vec<ExpandedComponent> {
        match &self.kind {
            LineKind::Kit { components, .. } => components
                .iter()
                .map(|c| ExpandedComponent {
                    part_id: c.part_id.clone(),
                    name: c.name.clone(),
                    quantity: c.quantity_per_kit.saturating_mul(self.quantity),
                    unit_price: c.price,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn recompute_total(&mut self) {
        self.line_total = self.gross() - self.discount_amount;
    }
}

/// A kit component with its quantity scaled to the whole line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpandedComponent {
    pub part_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

// =============================================================================
// Inputs
// =============================================================================

/// A row pre-populated from an external lookup (search modal, barcode scan).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinePrefill {
    pub kind: LineKind,
    pub quantity: Option<i64>,
    pub unit_price: Option<Money>,
    pub discount_amount: Option<Money>,
    pub notes: Option<String>,
}

impl LinePrefill {
    /// One unit of a part at its selling price.
    pub fn from_part(part: &Part) -> Self {
        LinePrefill {
            kind: LineKind::part(part.id.clone(), part.name.clone()),
            quantity: Some(1),
            unit_price: Some(part.price),
            ..Default::default()
        }
    }

    /// One unit of a part at its last cost, falling back to the selling
    /// price. Used when drafting purchase orders.
    pub fn from_part_at_cost(part: &Part) -> Self {
        LinePrefill {
            unit_price: Some(part.cost.unwrap_or(part.price)),
            ..Self::from_part(part)
        }
    }
}

/// Partial update for one row. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinePatch {
    pub kind: Option<LineKind>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Money>,
    pub discount_percent: Option<Percent>,
    pub discount_amount: Option<Money>,
    pub notes: Option<String>,
}

// =============================================================================
// Outputs
// =============================================================================

/// A correction the calculator applied to keep a row consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineWarning {
    /// A negative quantity was replaced by 0.
    QuantityClamped { requested: i64 },
    /// A negative unit price was replaced by 0.
    UnitPriceClamped { requested: Money },
    /// A percent above 100% was replaced by 100%.
    DiscountPercentClamped { requested: Percent },
    /// A discount amount outside `[0, gross]` was pulled back into range.
    DiscountAmountClamped { requested: Money, applied: Money },
}

/// Result of adding or editing a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineChange {
    pub line_id: String,
    pub warnings: Vec<LineWarning>,
}

impl LineChange {
    /// True when the input was applied exactly as given.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Aggregate amounts for the whole draft. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    /// Σ quantity × unit price over valid rows.
    pub subtotal: Money,
    pub total_discount: Money,
    pub net_total: Money,
    pub tax: Money,
    pub loyalty_points_used: i64,
    pub loyalty_discount: Money,
    /// `max(0, net_total + tax - loyalty_discount)`
    pub grand_total: Money,
    pub valid_line_count: usize,
    pub total_quantity: i64,
}

// =============================================================================
// Calculator
// =============================================================================

/// The editable draft plus the parameters its totals depend on.
///
/// The draft is never empty: any operation that would remove the last row
/// leaves one fresh empty row behind, so the UI always has an editable line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCalculator {
    lines: Vec<LineItem>,
    tax_rate: TaxRate,
    /// Currency value of one loyalty point.
    point_value: Money,
    loyalty_points_used: i64,
}

impl InvoiceCalculator {
    /// Creates a draft with a single empty row.
    pub fn new(tax_rate: TaxRate, point_value: Money) -> Self {
        InvoiceCalculator {
            lines: vec![LineItem::empty()],
            tax_rate,
            point_value,
            loyalty_points_used: 0,
        }
    }

    /// Creates a draft for the given document kind. Purchase orders and
    /// quotations carry no tax and no loyalty redemption.
    pub fn for_document(kind: DocumentKind, tax_rate: TaxRate, point_value: Money) -> Self {
        let tax_rate = if kind.charges_tax() { tax_rate } else { TaxRate::zero() };
        let point_value = if kind.accepts_loyalty() { point_value } else { Money::ZERO };
        Self::new(tax_rate, point_value)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Position of a row, for callers that hold ids but edit by index.
    pub fn index_of(&self, id: &str) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| CoreError::LineNotFound(id.to_string()))
    }

    pub fn valid_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter(|l| l.is_valid())
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn set_tax_rate(&mut self, tax_rate: TaxRate) {
        self.tax_rate = tax_rate;
    }

    pub fn loyalty_points_used(&self) -> i64 {
        self.loyalty_points_used
    }

    /// Sets the points redeemed against this draft.
    ///
    /// The calculator does not know the customer's balance; the caller clamps
    /// to it. Negative values are treated as 0.
    pub fn set_loyalty_points_used(&mut self, points: i64) {
        self.loyalty_points_used = points.max(0);
    }

    // =========================================================================
    // Adding Rows
    // =========================================================================

    /// Appends a placeholder row and returns its id.
    pub fn add_empty_row(&mut self) -> String {
        let line = LineItem::empty();
        let id = line.id.clone();
        self.lines.push(line);
        debug!(line_id = %id, "Added empty line");
        id
    }

    /// Appends a row populated from a lookup, with its total computed
    /// immediately.
    pub fn add_filled_row(&mut self, prefill: LinePrefill) -> LineChange {
        let mut warnings = Vec::new();
        let mut line = LineItem::empty();

        line.kind = prefill.kind;
        if let Some(qty) = prefill.quantity {
            line.quantity = clamp_quantity(qty, &mut warnings);
        }
        if let Some(price) = prefill.unit_price {
            line.unit_price = clamp_price(price, &mut warnings);
        }
        if let Some(notes) = prefill.notes {
            line.notes = notes;
        }
        let requested = prefill.discount_amount.unwrap_or(Money::ZERO);
        apply_discount_amount(&mut line, requested, &mut warnings);
        line.recompute_total();

        let change = LineChange {
            line_id: line.id.clone(),
            warnings,
        };
        log_warnings(&change);
        debug!(line_id = %change.line_id, total = %line.line_total, "Added filled line");
        self.lines.push(line);
        change
    }

    /// Appends a kit row priced at Σ component price × quantity per kit.
    ///
    /// Rows without a part or kit reference are removed first so adding a
    /// kit never leaves blank lines behind.
    pub fn add_kit_row(&mut self, kit: &Kit, components: Vec<KitComponent>) -> String {
        let unit_price: Money = components.iter().map(KitComponent::extended_price).sum();

        let before = self.lines.len();
        self.lines.retain(|l| l.kind.has_reference());
        let dropped = before - self.lines.len();

        let mut line = LineItem::empty();
        line.kind = LineKind::Kit {
            kit_id: kit.id.clone(),
            name: kit.name.clone(),
            components,
        };
        line.unit_price = unit_price.non_negative();
        line.recompute_total();

        let id = line.id.clone();
        debug!(kit_id = %kit.id, line_id = %id, unit_price = %line.unit_price, dropped, "Added kit line");
        self.lines.push(line);
        id
    }

    // =========================================================================
    // Editing Rows
    // =========================================================================

    /// Merges `patch` into the row at `index` and recomputes its discount
    /// and total from the post-merge quantity and price.
    ///
    /// ## Discount Resolution
    /// ```text
    /// patch.discount_percent? ──yes──► clamp [0,100] ─► amount = round2(gross × p)
    ///         │no
    ///         ▼
    /// patch.discount_amount? ──yes──► gross == 0 ─► both 0
    ///         │no                     else clamp [0,gross] ─► p = round2(a / gross)
    ///         ▼
    /// gross changed? ──yes──► keep amount, clamp [0,gross] ─► p = round2(a / gross)
    ///         │
    ///         ▼
    /// line_total = gross − amount
    /// ```
    pub fn update_item(&mut self, index: usize, patch: LinePatch) -> CoreResult<LineChange> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineIndexOutOfRange { index, len })?;
        let mut warnings = Vec::new();
        let previous_gross = line.gross();

        if let Some(kind) = patch.kind {
            line.kind = kind;
        }
        if let Some(qty) = patch.quantity {
            line.quantity = clamp_quantity(qty, &mut warnings);
        }
        if let Some(price) = patch.unit_price {
            line.unit_price = clamp_price(price, &mut warnings);
        }
        if let Some(notes) = patch.notes {
            line.notes = notes;
        }

        let gross = line.gross();
        if let Some(requested) = patch.discount_percent {
            let percent = requested.clamped();
            if percent != requested {
                warnings.push(LineWarning::DiscountPercentClamped { requested });
            }
            line.discount_percent = percent;
            line.discount_amount = gross.percentage(percent);
        } else if let Some(requested) = patch.discount_amount {
            apply_discount_amount(line, requested, &mut warnings);
        } else if gross != previous_gross {
            // The amount stays authoritative; the percent follows the new gross
            let requested = line.discount_amount;
            apply_discount_amount(line, requested, &mut warnings);
        }
        line.recompute_total();

        let change = LineChange {
            line_id: line.id.clone(),
            warnings,
        };
        log_warnings(&change);
        debug!(index, line_id = %change.line_id, total = %line.line_total, "Updated line");
        Ok(change)
    }

    // =========================================================================
    // Removing and Copying Rows
    // =========================================================================

    /// Removes one row by id. Returns whether a row was removed.
    pub fn remove_row(&mut self, id: &str) -> bool {
        self.remove_rows(&[id.to_string()]) > 0
    }

    /// Removes every row whose id is in `ids` and returns how many were
    /// removed. An emptied draft gets one fresh empty row.
    pub fn remove_rows(&mut self, ids: &[String]) -> usize {
        let before = self.lines.len();
        self.lines.retain(|l| !ids.contains(&l.id));
        let removed = before - self.lines.len();
        self.ensure_not_empty();
        debug!(removed, remaining = self.lines.len(), "Removed lines");
        removed
    }

    /// Appends duplicates of the selected rows, in draft order, under fresh
    /// ids. Returns the new ids.
    pub fn copy_rows(&mut self, ids: &[String]) -> Vec<String> {
        let copies: Vec<LineItem> = self
            .lines
            .iter()
            .filter(|l| ids.contains(&l.id))
            .map(LineItem::duplicate)
            .collect();
        let new_ids: Vec<String> = copies.iter().map(|l| l.id.clone()).collect();
        self.lines.extend(copies);
        debug!(copied = new_ids.len(), "Copied lines");
        new_ids
    }

    /// Clears the draft back to a single empty row and no loyalty redemption.
    pub fn reset_all(&mut self) {
        self.lines = vec![LineItem::empty()];
        self.loyalty_points_used = 0;
        debug!("Draft reset");
    }

    fn ensure_not_empty(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(LineItem::empty());
        }
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Computes the draft totals from the current rows and parameters.
    ///
    /// Rows without a part/kit reference or with a zero quantity contribute
    /// nothing to any aggregate.
    pub fn totals(&self) -> InvoiceTotals {
        let mut totals = InvoiceTotals {
            loyalty_points_used: self.loyalty_points_used,
            ..Default::default()
        };

        for line in self.valid_lines() {
            totals.subtotal += line.gross();
            totals.total_discount += line.discount_amount;
            totals.total_quantity = totals.total_quantity.saturating_add(line.quantity);
            totals.valid_line_count += 1;
        }

        totals.net_total = totals.subtotal - totals.total_discount;
        totals.tax = totals.net_total.calculate_tax(self.tax_rate);
        totals.loyalty_discount = self.point_value * self.loyalty_points_used;
        totals.grand_total = (totals.net_total + totals.tax - totals.loyalty_discount).non_negative();
        totals
    }
}

impl Default for InvoiceCalculator {
    fn default() -> Self {
        Self::new(TaxRate::zero(), Money::ZERO)
    }
}

// =============================================================================
// Clamping Helpers
// =============================================================================

fn clamp_quantity(qty: i64, warnings: &mut Vec<LineWarning>) -> i64 {
    if qty < 0 {
        warnings.push(LineWarning::QuantityClamped { requested: qty });
        0
    } else {
        qty
    }
}

fn clamp_price(price: Money, warnings: &mut Vec<LineWarning>) -> Money {
    if price.is_negative() {
        warnings.push(LineWarning::UnitPriceClamped { requested: price });
        Money::ZERO
    } else {
        price
    }
}

/// Sets the amount as the authoritative discount and derives the percent.
fn apply_discount_amount(line: &mut LineItem, requested: Money, warnings: &mut Vec<LineWarning>) {
    let gross = line.gross();
    if !gross.is_positive() {
        if !requested.is_zero() {
            warnings.push(LineWarning::DiscountAmountClamped {
                requested,
                applied: Money::ZERO,
            });
        }
        line.discount_amount = Money::ZERO;
        line.discount_percent = Percent::zero();
        return;
    }

    let applied = requested.clamp(Money::ZERO, gross);
    if applied != requested {
        warnings.push(LineWarning::DiscountAmountClamped { requested, applied });
    }
    line.discount_amount = applied;
    line.discount_percent = applied.ratio_of(gross);
}

fn log_warnings(change: &LineChange) {
    for warning in &change.warnings {
        warn!(line_id = %change.line_id, ?warning, "Line input clamped");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
