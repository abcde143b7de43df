//! 单次查询报告类型

use kiro_monitor_provider::UsageResponse;
use serde::Serialize;

use super::UsageOutcome;

/// Why an account was not queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    DownloadFailed,
    MissingToken,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Disabled => "disabled",
            Self::DownloadFailed => "failed to download auth file",
            Self::MissingToken => "no access_token in auth file",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountQueryStatus {
    Skipped {
        reason: SkipReason,
    },
    Queried {
        summary: UsageOutcome,
        raw_response: UsageResponse,
    },
}

/// One Kiro auth file in a balance report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    #[serde(rename = "filename")]
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub status: AccountQueryStatus,
}

impl AccountReport {
    #[must_use]
    pub fn outcome(&self) -> Option<&UsageOutcome> {
        match &self.status {
            AccountQueryStatus::Queried { summary, .. } => Some(summary),
            AccountQueryStatus::Skipped { .. } => None,
        }
    }

    /// Remaining credit, only for successful queries.
    #[must_use]
    pub fn remaining(&self) -> Option<f64> {
        self.outcome()
            .and_then(UsageOutcome::summary)
            .map(|s| s.remaining)
    }
}

/// Balance report of one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelQueryReport {
    pub panel_name: String,
    pub panel_url: String,
    /// Auth files of other providers, listed but ignored.
    pub other_provider_count: usize,
    pub accounts: Vec<AccountReport>,
    pub total_remaining: f64,
}

impl PanelQueryReport {
    #[must_use]
    pub fn new(
        panel_name: String,
        panel_url: String,
        other_provider_count: usize,
        accounts: Vec<AccountReport>,
    ) -> Self {
        Self {
            panel_name,
            panel_url,
            other_provider_count,
            total_remaining: accounts.iter().filter_map(AccountReport::remaining).sum(),
            accounts,
        }
    }

    /// No auth file of any provider was listed (or the listing failed).
    #[must_use]
    pub fn is_unreachable_or_empty(&self) -> bool {
        self.accounts.is_empty() && self.other_provider_count == 0
    }
}
