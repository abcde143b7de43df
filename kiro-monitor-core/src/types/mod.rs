//! 类型定义模块

mod query;
mod rate;
mod snapshot;
mod usage;

pub use query::{AccountQueryStatus, AccountReport, PanelQueryReport, SkipReason};
pub use rate::{PanelRate, RateInfo};
pub use snapshot::{AccountResult, PanelResult, Snapshot};
pub use usage::{UsageDetail, UsageOutcome, UsageSummary};

// Re-export provider 库的公共类型
pub use kiro_monitor_provider::{
    AuthFileEntry, CredentialRecord, CredentialStatus, PanelConfig, UsageResponse,
};
