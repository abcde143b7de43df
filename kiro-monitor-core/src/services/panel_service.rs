//! 单面板聚合服务

use std::sync::Arc;

use futures::future::join_all;
use kiro_monitor_provider::{CredentialRecord, PanelConfig};

use crate::services::{ServiceContext, UsageFormatter};
use crate::types::{AccountResult, PanelResult, UsageOutcome};

/// 单面板聚合服务
pub struct PanelService {
    ctx: Arc<ServiceContext>,
}

impl PanelService {
    /// 创建面板服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Aggregates the usage of every active Kiro account of one panel.
    ///
    /// Accounts are queried concurrently. Disabled accounts, failed
    /// downloads, missing tokens and failed usage queries are left out; the
    /// panel itself never fails.
    pub async fn query_panel(&self, panel: &PanelConfig) -> PanelResult {
        let credentials = self.ctx.credential_source.list_credentials(panel).await;
        if credentials.is_empty() {
            log::info!("[{}] No Kiro auth files", panel.name);
            return PanelResult::empty(panel);
        }

        let futures: Vec<_> = credentials
            .iter()
            .map(|credential| self.query_account(panel, credential))
            .collect();

        let accounts: Vec<AccountResult> = join_all(futures).await.into_iter().flatten().collect();

        log::debug!(
            "[{}] {}/{} account(s) reported usage",
            panel.name,
            accounts.len(),
            credentials.len()
        );

        PanelResult::new(panel, accounts)
    }

    async fn query_account(
        &self,
        panel: &PanelConfig,
        credential: &CredentialRecord,
    ) -> Option<AccountResult> {
        let (hydrated, response) = self.ctx.fetch_usage(panel, credential).await.ok()?;

        match UsageFormatter::format_summary(&response) {
            UsageOutcome::Success(summary) => Some(AccountResult::from_summary(
                &panel.name,
                &hydrated.email,
                &summary,
            )),
            UsageOutcome::Failure { error } => {
                log::warn!(
                    "[{}] Usage query failed for {}: {error}",
                    panel.name,
                    hydrated.email
                );
                None
            }
        }
    }
}
