//! # Chart of Accounts
//!
//! The account tree and the recursive roll-ups every statement is built on.
//!
//! ## Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A forest: one or more roots per account type, any depth below.         │
//! │                                                                         │
//! │  1000 Assets                          4000 Revenue                      │
//! │  ├── 1100 Cash & Banks                ├── 4100 Parts sales              │
//! │  │   ├── 1110 Cash drawer  (cash)     └── 4200 Service income           │
//! │  │   └── 1120 Bank account (cash)                                       │
//! │  ├── 1200 Accounts receivable   ◄── AR role                             │
//! │  └── 1300 Inventory             ◄── Inventory role                      │
//! │                                                                         │
//! │  roll-up(1000) = own(1000) + roll-up(1100) + roll-up(1200) + ...        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ChartOfAccounts::new`] rejects cyclic `parent_id` chains, so every
//! roll-up on a built chart terminates.

use std::collections::{HashMap, HashSet};

use makhzonak_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// Account Type
// =============================================================================

/// The five fundamental account types.
///
/// | Type      | Normal side | Signed balance      |
/// |-----------|-------------|---------------------|
/// | Asset     | Debit       | debit − credit      |
/// | Expense   | Debit       | debit − credit      |
/// | Liability | Credit      | credit − debit      |
/// | Equity    | Credit      | credit − debit      |
/// | Revenue   | Credit      | credit − debit      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Revenue,
        AccountType::Expense,
    ];

    /// Returns true if debits increase this account's balance.
    #[inline]
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }

    /// Applies the sign convention to a debit/credit pair.
    ///
    /// ```rust
    /// use makhzonak_core::Money;
    /// use makhzonak_ledger::AccountType;
    ///
    /// let (dr, cr) = (Money::from_major(100), Money::from_major(30));
    /// assert_eq!(AccountType::Asset.signed(dr, cr), Money::from_major(70));
    /// assert_eq!(AccountType::Revenue.signed(dr, cr), Money::from_major(-70));
    /// ```
    #[inline]
    pub fn signed(&self, debit: Money, credit: Money) -> Money {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Asset => write!(f, "asset"),
            AccountType::Liability => write!(f, "liability"),
            AccountType::Equity => write!(f, "equity"),
            AccountType::Revenue => write!(f, "revenue"),
            AccountType::Expense => write!(f, "expense"),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// A node of the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    /// `None` marks a root.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Counts toward cash at start/end of the cash-flow statement.
    #[serde(default)]
    pub is_cash_equivalent: bool,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Account {
            id: id.into(),
            name: name.into(),
            account_type,
            parent_id: None,
            is_cash_equivalent: false,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn cash_equivalent(mut self) -> Self {
        self.is_cash_equivalent = true;
        self
    }
}

// =============================================================================
// Chart of Accounts
// =============================================================================

/// Validated, indexed account forest.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: Vec<Account>,
    index: HashMap<String, usize>,
    /// parent id → child positions, in chart order.
    children: HashMap<String, Vec<usize>>,
}

impl ChartOfAccounts {
    /// Indexes the accounts and checks the hierarchy.
    ///
    /// ## Rules
    /// - Duplicate ids: the first occurrence wins, later ones are dropped
    ///   with a warning.
    /// - Unknown parent: the account is kept but is unreachable from every
    ///   root, so it does not contribute to roll-ups (warning logged).
    /// - Cycle: [`LedgerError::CyclicHierarchy`].
    pub fn new(accounts: Vec<Account>) -> LedgerResult<Self> {
        let mut kept = Vec::with_capacity(accounts.len());
        let mut index = HashMap::with_capacity(accounts.len());
        for account in accounts {
            if index.contains_key(&account.id) {
                warn!(account_id = %account.id, "Duplicate account id ignored");
                continue;
            }
            index.insert(account.id.clone(), kept.len());
            kept.push(account);
        }

        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, account) in kept.iter().enumerate() {
            if let Some(parent) = &account.parent_id {
                if index.contains_key(parent) {
                    children.entry(parent.clone()).or_default().push(pos);
                } else {
                    warn!(account_id = %account.id, parent_id = %parent, "Account parent not found; excluded from roll-ups");
                }
            }
        }

        let chart = ChartOfAccounts {
            accounts: kept,
            index,
            children,
        };
        chart.check_acyclic()?;
        debug!(accounts = chart.accounts.len(), "Chart of accounts indexed");
        Ok(chart)
    }

    /// Walks every parent chain once; a chain that revisits an account is a
    /// cycle.
    fn check_acyclic(&self) -> LedgerResult<()> {
        let mut verified: HashSet<&str> = HashSet::new();

        for account in &self.accounts {
            let mut path: HashSet<&str> = HashSet::new();
            let mut current = Some(account);

            while let Some(node) = current {
                if verified.contains(node.id.as_str()) {
                    break;
                }
                if !path.insert(node.id.as_str()) {
                    return Err(LedgerError::CyclicHierarchy {
                        account_id: node.id.clone(),
                    });
                }
                current = node.parent_id.as_deref().and_then(|p| self.get(p));
            }

            verified.extend(path);
        }

        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.index.get(id).map(|&pos| &self.accounts[pos])
    }

    /// Like [`get`](Self::get), for ids the caller expects to exist.
    pub fn require(&self, id: &str) -> LedgerResult<&Account> {
        self.get(id).ok_or_else(|| LedgerError::UnknownAccount(id.to_string()))
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn children(&self, id: &str) -> impl Iterator<Item = &Account> + '_ {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.accounts[pos])
    }

    pub fn roots(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.iter().filter(|a| a.parent_id.is_none())
    }

    pub fn roots_of_type(&self, account_type: AccountType) -> impl Iterator<Item = &Account> + '_ {
        self.roots().filter(move |a| a.account_type == account_type)
    }

    pub fn accounts_of_type(&self, account_type: AccountType) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.iter().filter(move |a| a.account_type == account_type)
    }

    /// The subtree under `id` in pre-order, with depth (the account itself
    /// has depth 0). Unknown ids yield an empty list.
    pub fn subtree(&self, id: &str) -> Vec<(usize, &Account)> {
        let mut out = Vec::new();
        if let Some(account) = self.get(id) {
            self.collect_subtree(account, 0, &mut out);
        }
        out
    }

    fn collect_subtree<'a>(&'a self, account: &'a Account, depth: usize, out: &mut Vec<(usize, &'a Account)>) {
        out.push((depth, account));
        for child in self.children(&account.id) {
            self.collect_subtree(child, depth + 1, out);
        }
    }

    // =========================================================================
    // Roll-ups
    // =========================================================================

    /// Own value of `id` plus the roll-up of every child, where `leaf`
    /// supplies each account's own value.
    ///
    /// Unknown ids roll up to zero.
    pub fn rollup<F>(&self, id: &str, leaf: &F) -> Money
    where
        F: Fn(&Account) -> Money,
    {
        match self.get(id) {
            Some(account) => {
                leaf(account) + self.children(id).map(|child| self.rollup(&child.id, leaf)).sum::<Money>()
            }
            None => Money::ZERO,
        }
    }

    /// Cumulative balance of `id` and all its descendants.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use makhzonak_core::Money;
    /// use makhzonak_ledger::{Account, AccountType, ChartOfAccounts};
    ///
    /// let chart = ChartOfAccounts::new(vec![
    ///     Account::new("1000", "Assets", AccountType::Asset),
    ///     Account::new("1100", "Current", AccountType::Asset).with_parent("1000"),
    ///     Account::new("1110", "Cash", AccountType::Asset).with_parent("1100"),
    /// ]).unwrap();
    ///
    /// let balances: HashMap<String, Money> = [("1000", 10), ("1100", 20), ("1110", 30)]
    ///     .into_iter()
    ///     .map(|(id, v)| (id.to_string(), Money::from_major(v)))
    ///     .collect();
    ///
    /// assert_eq!(chart.recursive_total("1000", &balances), Money::from_major(60));
    /// ```
    pub fn recursive_total(&self, id: &str, balances: &HashMap<String, Money>) -> Money {
        self.rollup(id, &|account: &Account| balances.get(&account.id).copied().unwrap_or_default())
    }

    /// Signed period movement of `id` and all its descendants, each account
    /// signed by its own type.
    pub fn recursive_period_total(&self, id: &str, movements: &HashMap<String, crate::balances::Movement>) -> Money {
        self.rollup(id, &|account: &Account| {
            movements
                .get(&account.id)
                .map(|m| m.signed(account.account_type))
                .unwrap_or_default()
        })
    }

    /// Σ roll-up over every root of the given type.
    pub fn total_of_type(&self, account_type: AccountType, balances: &HashMap<String, Money>) -> Money {
        self.roots_of_type(account_type)
            .map(|root| self.recursive_total(&root.id, balances))
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
