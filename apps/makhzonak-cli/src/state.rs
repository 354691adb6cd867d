//! # Application State
//!
//! One explicit owner for the records the calculators read. Screens (or the
//! reports binary) borrow slices from it; nothing here is global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            AppState                                     │
//! │                                                                         │
//! │  settings ──────────────┐                                               │
//! │  parts, kits ───────────┼──► new_draft / add_part / add_kit             │
//! │                         │        (makhzonak-core InvoiceCalculator)     │
//! │  chart, journal ────────┴──► reports(range)                             │
//! │                                  (makhzonak-ledger FinancialReports)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use makhzonak_core::invoice::{LineChange, LinePrefill};
use makhzonak_core::{DocumentKind, InvoiceCalculator, Kit, KitComponent, Part};
use makhzonak_ledger::{Account, ChartOfAccounts, DateRange, FinancialReports, JournalEntry};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::settings::CompanySettings;

/// Serialized records as exported by the web app.
///
/// ```json
/// { "accounts": [...], "journal_entries": [...], "parts": [...], "kits": [...] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub kits: Vec<Kit>,
}

impl Snapshot {
    pub fn from_json_str(contents: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_json_str(&contents)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    settings: CompanySettings,
    parts: Vec<Part>,
    kits: Vec<Kit>,
    chart: ChartOfAccounts,
    journal_entries: Vec<JournalEntry>,
}

impl AppState {
    /// Indexes the chart of accounts; a cyclic hierarchy is rejected here.
    pub fn new(settings: CompanySettings, snapshot: Snapshot) -> AppResult<Self> {
        let chart = ChartOfAccounts::new(snapshot.accounts)?;
        info!(
            accounts = chart.len(),
            journal_entries = snapshot.journal_entries.len(),
            parts = snapshot.parts.len(),
            kits = snapshot.kits.len(),
            "Application state loaded"
        );

        Ok(AppState {
            settings,
            parts: snapshot.parts,
            kits: snapshot.kits,
            chart,
            journal_entries: snapshot.journal_entries,
        })
    }

    pub fn settings(&self) -> &CompanySettings {
        &self.settings
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn kits(&self) -> &[Kit] {
        &self.kits
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.journal_entries
    }

    pub fn part(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn kit(&self, id: &str) -> Option<&Kit> {
        self.kits.iter().find(|k| k.id == id)
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    pub fn new_draft(&self, kind: DocumentKind) -> InvoiceCalculator {
        self.settings.new_draft(kind)
    }

    /// Resolves a kit against the current parts catalogue.
    pub fn kit_components(&self, kit_id: &str) -> Option<Vec<KitComponent>> {
        self.kit(kit_id).map(|kit| kit.resolve_components(&self.parts))
    }

    /// Adds one unit of a part, priced at cost on purchase orders and at the
    /// selling price otherwise. `None` if the part does not exist.
    pub fn add_part(&self, draft: &mut InvoiceCalculator, kind: DocumentKind, part_id: &str) -> Option<LineChange> {
        let part = self.part(part_id)?;
        let prefill = match kind {
            DocumentKind::PurchaseOrder => LinePrefill::from_part_at_cost(part),
            DocumentKind::SalesInvoice | DocumentKind::Quotation => LinePrefill::from_part(part),
        };
        Some(draft.add_filled_row(prefill))
    }

    /// Adds a kit line and returns its id. `None` if the kit does not exist.
    pub fn add_kit(&self, draft: &mut InvoiceCalculator, kit_id: &str) -> Option<String> {
        let kit = self.kit(kit_id)?;
        let components = kit.resolve_components(&self.parts);
        Some(draft.add_kit_row(kit, components))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// The four statements for `range`, using the configured account roles.
    pub fn reports(&self, range: DateRange) -> FinancialReports {
        let roles = self.settings.account_roles();
        for id in [
            &roles.receivable_account_id,
            &roles.payable_account_id,
            &roles.inventory_account_id,
        ]
        .into_iter()
        .flatten()
        {
            if let Err(e) = self.chart.require(id) {
                warn!("Configured account role ignored: {}", e);
            }
        }

        FinancialReports::generate(&self.chart, &self.journal_entries, range, &roles)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use makhzonak_core::{KitItem, Money, TaxRate};
    use makhzonak_ledger::LedgerError;

    use super::*;

    const SNAPSHOT: &str = r#"{
        "accounts": [
            { "id": "1000", "name": "Assets", "account_type": "asset" },
            { "id": "1110", "name": "Cash", "account_type": "asset", "parent_id": "1000", "is_cash_equivalent": true },
            { "id": "1200", "name": "Receivables", "account_type": "asset", "parent_id": "1000" },
            { "id": "4000", "name": "Sales", "account_type": "revenue" }
        ],
        "journal_entries": [
            {
                "id": "je-1",
                "date": "2024-03-10",
                "is_posted": true,
                "description": "Counter sale",
                "items": [
                    { "account_id": "1110", "debit": 80000, "credit": 0 },
                    { "account_id": "1200", "debit": 20000, "credit": 0 },
                    { "account_id": "4000", "debit": 0, "credit": 100000 }
                ]
            }
        ]
    }"#;

    fn part(id: &str, price: i64) -> Part {
        Part::new(id, format!("PN-{}", id), format!("Part {}", id), Money::from_major(price)).unwrap()
    }

    fn state() -> AppState {
        let mut snapshot = Snapshot::from_json_str(SNAPSHOT).unwrap();
        let mut filter = part("filter", 25);
        filter.cost = Some(Money::from_major(15));
        snapshot.parts = vec![filter, part("plug", 10)];
        snapshot.kits = vec![Kit::new(
            "service",
            "Service kit",
            vec![
                KitItem {
                    part_id: "filter".to_string(),
                    quantity: 1,
                },
                KitItem {
                    part_id: "plug".to_string(),
                    quantity: 4,
                },
            ],
        )
        .unwrap()];

        let mut settings = CompanySettings::default();
        settings.accounts.receivable = Some("1200".to_string());
        AppState::new(settings, snapshot).unwrap()
    }

    #[test]
    fn test_snapshot_loads() {
        let state = state();
        assert_eq!(state.chart().len(), 4);
        assert_eq!(state.journal_entries().len(), 1);
        assert!(state.chart().get("1110").is_some_and(|a| a.is_cash_equivalent));
    }

    #[test]
    fn test_cyclic_chart_is_rejected() {
        let snapshot = Snapshot::from_json_str(
            r#"{ "accounts": [
                { "id": "a", "name": "A", "account_type": "asset", "parent_id": "b" },
                { "id": "b", "name": "B", "account_type": "asset", "parent_id": "a" }
            ] }"#,
        )
        .unwrap();
        let result = AppState::new(CompanySettings::default(), snapshot);
        assert!(matches!(
            result,
            Err(AppError::Ledger(LedgerError::CyclicHierarchy { .. }))
        ));
    }

    #[test]
    fn test_reports_use_configured_roles() {
        let state = state();
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let range = DateRange::new(march, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()).unwrap();
        let reports = state.reports(range);

        assert_eq!(reports.income_statement.net_profit, Money::from_major(1000));
        assert_eq!(reports.cash_flow.change_in_receivables, Money::from_major(200));
        assert_eq!(reports.cash_flow.operating, Money::from_major(800));
        assert_eq!(reports.cash_flow.cash_at_end, Money::from_major(800));
        assert!(reports.cash_flow.is_reconciled());
    }

    #[test]
    fn test_purchase_order_prices_at_cost() {
        let state = state();
        let mut po = state.new_draft(DocumentKind::PurchaseOrder);
        state.add_part(&mut po, DocumentKind::PurchaseOrder, "filter").unwrap();
        assert!(po.tax_rate().is_zero());
        assert_eq!(po.totals().subtotal, Money::from_major(15));

        let mut invoice = state.new_draft(DocumentKind::SalesInvoice);
        state.add_part(&mut invoice, DocumentKind::SalesInvoice, "filter").unwrap();
        assert_eq!(invoice.tax_rate(), TaxRate::from_bps(1500));
        assert_eq!(invoice.totals().subtotal, Money::from_major(25));

        assert!(state.add_part(&mut invoice, DocumentKind::SalesInvoice, "ghost").is_none());
    }

    #[test]
    fn test_add_kit_prices_from_components() {
        let state = state();
        let mut draft = state.new_draft(DocumentKind::Quotation);
        let id = state.add_kit(&mut draft, "service").unwrap();

        // 25 + 4 × 10
        assert_eq!(draft.line(&id).map(|l| l.unit_price), Some(Money::from_major(65)));
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(state.kit_components("service").map(|c| c.len()), Some(2));
        assert!(state.add_kit(&mut draft, "missing").is_none());
    }

    #[test]
    fn test_demo_snapshot_reconciles() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let settings = CompanySettings::from_file(&dir.join("settings.toml")).unwrap();
        let snapshot = Snapshot::from_file(&dir.join("snapshot.json")).unwrap();
        let state = AppState::new(settings, snapshot).unwrap();

        let range = DateRange::parse("2024-02-01", "2024-02-29").unwrap();
        let reports = state.reports(range);
        let cf = &reports.cash_flow;

        assert_eq!(reports.income_statement.net_profit, Money::from_major(250));
        assert_eq!(cf.change_in_receivables, Money::from_major(1150));
        assert_eq!(cf.change_in_inventory, Money::from_major(-3000));
        assert_eq!(cf.change_in_payables, Money::ZERO);
        assert_eq!(cf.operating, Money::from_major(2100));
        assert_eq!(cf.cash_at_start, Money::from_major(50000));
        assert_eq!(cf.cash_at_end, Money::from_major(52100));
        assert!(cf.is_reconciled());
        assert!(reports.balance_sheet.is_balanced());
        assert!(reports.trial_balance.is_balanced());
    }

    #[test]
    fn test_snapshot_file_errors() {
        let path = std::env::temp_dir().join(format!("makhzonak-snapshot-{}.json", uuid::Uuid::new_v4()));
        assert!(matches!(Snapshot::from_file(&path), Err(AppError::Io { .. })));

        std::fs::write(&path, "{ not json").unwrap();
        let result = Snapshot::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(AppError::SnapshotParse(_))));
    }
}
