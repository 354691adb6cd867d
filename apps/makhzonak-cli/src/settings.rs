//! # Company Settings
//!
//! The per-tenant values the calculators take as plain inputs: VAT rate,
//! loyalty point value, the AR / AP / Inventory account roles used by the
//! cash-flow statement, and currency display.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MAKHZONAK_TAX_RATE=15          (percent)                           │
//! │     MAKHZONAK_POINT_VALUE=5        (halalas per point)                 │
//! │     MAKHZONAK_AR_ACCOUNT=1200                                          │
//! │     MAKHZONAK_AP_ACCOUNT=2100                                          │
//! │     MAKHZONAK_INVENTORY_ACCOUNT=1300                                   │
//! │     MAKHZONAK_TENANT_ID=...                                            │
//! │                                                                         │
//! │  2. TOML Settings File                                                 │
//! │     --config <path>, or                                                │
//! │     ~/.config/makhzonak/settings.toml (Linux)                          │
//! │     ~/Library/Application Support/makhzonak/settings.toml (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     15% VAT, no loyalty, no account roles, SAR                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settings File Format
//! ```toml
//! [company]
//! name = "Al-Noor Auto Parts"
//! tenant_id = "00000000-0000-0000-0000-000000000001"
//!
//! [tax]
//! rate_bps = 1500
//!
//! [loyalty]
//! point_value = 5
//!
//! [accounts]
//! receivable = "1200"
//! payable = "2100"
//! inventory = "1300"
//!
//! [currency]
//! code = "SAR"
//! symbol = "SAR"
//! symbol_position = "after"
//! ```

use std::path::{Path, PathBuf};

use makhzonak_core::validation::{validate_point_value, validate_tax_rate_bps};
use makhzonak_core::{DocumentKind, InvoiceCalculator, Money, TaxRate, DEFAULT_TENANT_ID};
use makhzonak_ledger::AccountRoles;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySection {
    #[serde(default = "default_company_name")]
    pub name: String,

    /// Tenant the records belong to.
    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,
}

fn default_company_name() -> String {
    "Makhzonak+ Auto Parts".to_string()
}

fn default_tenant_id() -> String {
    DEFAULT_TENANT_ID.to_string()
}

impl Default for CompanySection {
    fn default() -> Self {
        CompanySection {
            name: default_company_name(),
            tenant_id: default_tenant_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSection {
    /// VAT in basis points; 0 disables tax.
    #[serde(default = "default_tax_rate_bps")]
    pub rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    1500 // 15% Saudi VAT
}

impl Default for TaxSection {
    fn default() -> Self {
        TaxSection {
            rate_bps: default_tax_rate_bps(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltySection {
    /// Value of one loyalty point in halalas.
    #[serde(default)]
    pub point_value: Money,
}

/// Account ids filling the cash-flow working-capital roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receivable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<String>,
}

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    #[default]
    After,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySection {
    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    #[serde(default = "default_currency_code")]
    pub symbol: String,

    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

fn default_currency_code() -> String {
    "SAR".to_string()
}

impl Default for CurrencySection {
    fn default() -> Self {
        CurrencySection {
            code: default_currency_code(),
            symbol: default_currency_code(),
            symbol_position: SymbolPosition::After,
        }
    }
}

// =============================================================================
// Company Settings
// =============================================================================

/// Complete company settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySettings {
    #[serde(default)]
    pub company: CompanySection,

    #[serde(default)]
    pub tax: TaxSection,

    #[serde(default)]
    pub loyalty: LoyaltySection,

    #[serde(default)]
    pub accounts: AccountsSection,

    #[serde(default)]
    pub currency: CurrencySection,
}

impl CompanySettings {
    /// Loads settings from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Settings file: `path` if given (must exist), otherwise the platform
    ///    default (skipped when absent)
    /// 3. Environment variables
    /// 4. Validation
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Settings file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading settings from file");
        let contents = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let mut settings: CompanySettings = toml::from_str(contents)?;
        settings.accounts.normalize();
        Ok(settings)
    }

    /// `<platform config dir>/makhzonak/settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("makhzonak").join("settings.toml"))
    }

    /// Tax must lie in 0–100% and the point value must not be negative.
    pub fn validate(&self) -> AppResult<()> {
        validate_tax_rate_bps(self.tax.rate_bps)?;
        validate_point_value(self.loyalty.point_value)?;
        Ok(())
    }

    /// Applies `MAKHZONAK_*` overrides, reading each variable through
    /// `lookup`. Unparseable numbers are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("MAKHZONAK_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) => {
                    debug!(rate = %rate, "Overriding tax rate from environment");
                    self.tax.rate_bps = TaxRate::from_percentage(pct).bps();
                }
                Err(_) => warn!(rate = %rate, "Ignoring unparseable MAKHZONAK_TAX_RATE"),
            }
        }

        if let Some(value) = lookup("MAKHZONAK_POINT_VALUE") {
            match value.trim().parse::<i64>() {
                Ok(minor) => self.loyalty.point_value = Money::from_minor(minor),
                Err(_) => warn!(value = %value, "Ignoring unparseable MAKHZONAK_POINT_VALUE"),
            }
        }

        if let Some(id) = lookup("MAKHZONAK_AR_ACCOUNT") {
            self.accounts.receivable = Some(id);
        }
        if let Some(id) = lookup("MAKHZONAK_AP_ACCOUNT") {
            self.accounts.payable = Some(id);
        }
        if let Some(id) = lookup("MAKHZONAK_INVENTORY_ACCOUNT") {
            self.accounts.inventory = Some(id);
        }

        if let Some(tenant_id) = lookup("MAKHZONAK_TENANT_ID") {
            self.company.tenant_id = tenant_id;
        }

        self.accounts.normalize();
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax.rate_bps)
    }

    pub fn point_value(&self) -> Money {
        self.loyalty.point_value
    }

    pub fn account_roles(&self) -> AccountRoles {
        AccountRoles {
            receivable_account_id: self.accounts.receivable.clone(),
            payable_account_id: self.accounts.payable.clone(),
            inventory_account_id: self.accounts.inventory.clone(),
        }
    }

    /// A fresh draft of `kind` carrying this company's tax rate and point
    /// value where the document kind uses them.
    pub fn new_draft(&self, kind: DocumentKind) -> InvoiceCalculator {
        InvoiceCalculator::for_document(kind, self.tax_rate(), self.point_value())
    }

    /// Formats a halala amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use makhzonak_cli::CompanySettings;
    ///
    /// let settings = CompanySettings::default();
    /// assert_eq!(settings.format_currency(1234), "12.34 SAR");
    /// ```
    pub fn format_currency(&self, minor_units: i64) -> String {
        let amount = Money::from_minor(minor_units);
        match self.currency.symbol_position {
            SymbolPosition::After => format!("{} {}", amount, self.currency.symbol),
            SymbolPosition::Before => format!("{}{}", self.currency.symbol, amount),
        }
    }
}

impl AccountsSection {
    /// Blank ids mean "not configured".
    fn normalize(&mut self) {
        for role in [&mut self.receivable, &mut self.payable, &mut self.inventory] {
            if role.as_deref().is_some_and(|id| id.trim().is_empty()) {
                *role = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = CompanySettings::default();
        assert_eq!(settings.tax_rate(), TaxRate::from_bps(1500));
        assert_eq!(settings.point_value(), Money::ZERO);
        assert_eq!(settings.account_roles(), AccountRoles::default());
        assert_eq!(settings.company.tenant_id, DEFAULT_TENANT_ID);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let settings = CompanySettings::from_toml_str(
            r#"
            [company]
            name = "Al-Noor Auto Parts"

            [tax]
            rate_bps = 500

            [loyalty]
            point_value = 10

            [accounts]
            receivable = "1200"
            payable = ""
            "#,
        )
        .unwrap();

        assert_eq!(settings.company.name, "Al-Noor Auto Parts");
        assert_eq!(settings.tax.rate_bps, 500);
        assert_eq!(settings.point_value(), Money::from_minor(10));
        assert_eq!(settings.accounts.receivable.as_deref(), Some("1200"));
        assert_eq!(settings.accounts.payable, None);
        assert_eq!(settings.currency.code, "SAR");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut settings = CompanySettings::from_toml_str("[tax]\nrate_bps = 500\n").unwrap();
        settings.apply_overrides(env(&[
            ("MAKHZONAK_TAX_RATE", "15"),
            ("MAKHZONAK_POINT_VALUE", "5"),
            ("MAKHZONAK_AR_ACCOUNT", "1200"),
            ("MAKHZONAK_AP_ACCOUNT", "2100"),
            ("MAKHZONAK_INVENTORY_ACCOUNT", "1300"),
            ("MAKHZONAK_TENANT_ID", "tenant-7"),
        ]));

        assert_eq!(settings.tax.rate_bps, 1500);
        assert_eq!(settings.point_value(), Money::from_minor(5));
        let roles = settings.account_roles();
        assert_eq!(roles.receivable_account_id.as_deref(), Some("1200"));
        assert_eq!(roles.payable_account_id.as_deref(), Some("2100"));
        assert_eq!(roles.inventory_account_id.as_deref(), Some("1300"));
        assert_eq!(settings.company.tenant_id, "tenant-7");
    }

    #[test]
    fn test_bad_env_numbers_are_ignored() {
        let mut settings = CompanySettings::default();
        settings.apply_overrides(env(&[("MAKHZONAK_TAX_RATE", "fifteen"), ("MAKHZONAK_POINT_VALUE", "")]));
        assert_eq!(settings.tax.rate_bps, 1500);
        assert_eq!(settings.point_value(), Money::ZERO);
    }

    #[test]
    fn test_validation_rejects_tax_over_100_percent() {
        let mut settings = CompanySettings::default();
        settings.tax.rate_bps = 10_001;
        assert!(matches!(settings.validate(), Err(AppError::InvalidSettings(_))));

        settings.tax.rate_bps = 10_000;
        settings.loyalty.point_value = Money::from_minor(-1);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let path = std::env::temp_dir().join(format!("makhzonak-settings-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[tax]\nrate_bps = 0\n").unwrap();

        let settings = CompanySettings::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(settings.tax_rate().is_zero());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("makhzonak-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(CompanySettings::from_file(&path), Err(AppError::Io { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            CompanySettings::from_toml_str("[tax]\nrate_bps = \"lots\""),
            Err(AppError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_new_draft_per_document_kind() {
        let mut settings = CompanySettings::default();
        settings.loyalty.point_value = Money::from_minor(5);

        let invoice = settings.new_draft(DocumentKind::SalesInvoice);
        assert_eq!(invoice.tax_rate(), TaxRate::from_bps(1500));

        let po = settings.new_draft(DocumentKind::PurchaseOrder);
        assert!(po.tax_rate().is_zero());
    }

    #[test]
    fn test_format_currency() {
        let mut settings = CompanySettings::default();
        assert_eq!(settings.format_currency(0), "0.00 SAR");
        assert_eq!(settings.format_currency(-1234), "-12.34 SAR");
        assert_eq!(settings.format_currency(123456789), "1234567.89 SAR");

        settings.currency.symbol = "﷼".to_string();
        settings.currency.symbol_position = SymbolPosition::Before;
        assert_eq!(settings.format_currency(100), "﷼1.00");
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&CompanySettings::default()).unwrap();
        assert!(toml_str.contains("[tax]"));
        assert!(toml_str.contains("[currency]"));
        let back = CompanySettings::from_toml_str(&toml_str).unwrap();
        assert_eq!(back, CompanySettings::default());
    }
}
