//! 用量汇总类型

use serde::{Deserialize, Serialize};

/// Usage of one resource type (one `usageBreakdownList` item).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDetail {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub used: f64,
    pub limit: f64,
    pub remaining: f64,
}

/// Normalized usage of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub email: String,
    /// Subscription title, e.g. `KIRO FREE`.
    pub subscription: String,
    pub total_used: f64,
    pub total_limit: f64,
    /// `max(0, total_limit - total_used)`
    pub remaining: f64,
    /// 0-100, 0 when the limit is 0.
    pub percentage: f64,
    /// Local `YYYY-MM-DD HH:MM:SS`, empty when unknown.
    pub next_reset: String,
    pub details: Vec<UsageDetail>,
}

/// Either a summary or the reason there is none.
///
/// Serializes as the summary object or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsageOutcome {
    Failure { error: String },
    Success(UsageSummary),
}

impl UsageOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            error: reason.into(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> Option<&UsageSummary> {
        match self {
            Self::Success(summary) => Some(summary),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success(_) => None,
        }
    }
}
