//! 快照类型

use chrono::{DateTime, Local};
use kiro_monitor_provider::PanelConfig;
use serde::{Deserialize, Serialize};

use super::UsageSummary;

/// One account's contribution to a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResult {
    pub panel_name: String,
    pub email: String,
    pub remaining: f64,
    pub used: f64,
    pub limit: f64,
    pub percentage: f64,
    pub next_reset: String,
}

impl AccountResult {
    #[must_use]
    pub fn from_summary(panel_name: &str, email: &str, summary: &UsageSummary) -> Self {
        Self {
            panel_name: panel_name.to_string(),
            email: email.to_string(),
            remaining: summary.remaining,
            used: summary.total_used,
            limit: summary.total_limit,
            percentage: summary.percentage,
            next_reset: summary.next_reset.clone(),
        }
    }
}

/// Aggregate of one panel. `remaining` is always the sum of `accounts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelResult {
    pub panel_name: String,
    pub panel_url: String,
    pub remaining: f64,
    pub accounts: Vec<AccountResult>,
}

impl PanelResult {
    #[must_use]
    pub fn new(panel: &PanelConfig, accounts: Vec<AccountResult>) -> Self {
        Self {
            panel_name: panel.name.clone(),
            panel_url: panel.base_url.clone(),
            remaining: accounts.iter().map(|a| a.remaining).sum(),
            accounts,
        }
    }

    /// Zero-valued result of a panel that yielded no accounts.
    #[must_use]
    pub fn empty(panel: &PanelConfig) -> Self {
        Self::new(panel, Vec::new())
    }
}

/// Point-in-time aggregate across all panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub total_remaining: f64,
    pub panel_details: Vec<PanelResult>,
}

impl Snapshot {
    #[must_use]
    pub fn new(timestamp: DateTime<Local>, panel_details: Vec<PanelResult>) -> Self {
        Self {
            timestamp,
            total_remaining: panel_details.iter().map(|p| p.remaining).sum(),
            panel_details,
        }
    }

    /// Number of accounts across all panels.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts().count()
    }

    #[must_use]
    pub fn has_accounts(&self) -> bool {
        self.account_count() > 0
    }

    #[must_use]
    pub fn panel(&self, name: &str) -> Option<&PanelResult> {
        self.panel_details.iter().find(|p| p.panel_name == name)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &AccountResult> {
        self.panel_details.iter().flat_map(|p| p.accounts.iter())
    }
}
