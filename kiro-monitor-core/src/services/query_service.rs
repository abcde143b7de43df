//! 单次余额查询服务

use std::sync::Arc;

use futures::future::join_all;
use kiro_monitor_provider::{CredentialRecord, KIRO_PROVIDER, PanelConfig};

use crate::error::CoreResult;
use crate::services::{ServiceContext, UsageFormatter};
use crate::types::{AccountQueryStatus, AccountReport, PanelQueryReport};

/// 单次余额查询服务
///
/// Unlike the monitor, keeps skipped and failed accounts in the report,
/// together with the raw usage responses.
pub struct QueryService {
    ctx: Arc<ServiceContext>,
}

impl QueryService {
    /// 创建查询服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Queries every Kiro account of one panel.
    pub async fn query_panel(&self, panel: &PanelConfig) -> PanelQueryReport {
        let files = self.ctx.credential_source.list_auth_files(panel).await;
        let (kiro, other): (Vec<_>, Vec<_>) =
            files.iter().partition(|f| f.is_provider(KIRO_PROVIDER));

        if kiro.is_empty() && !other.is_empty() {
            log::warn!(
                "[{}] No Kiro auth files, {} file(s) of other providers",
                panel.name,
                other.len()
            );
        }

        let credentials: Vec<CredentialRecord> =
            kiro.into_iter().map(CredentialRecord::from_entry).collect();
        let futures: Vec<_> = credentials
            .iter()
            .map(|credential| self.query_account(panel, credential))
            .collect();
        let accounts = join_all(futures).await;

        PanelQueryReport::new(
            panel.name.clone(),
            panel.base_url.clone(),
            other.len(),
            accounts,
        )
    }

    /// Queries every panel concurrently, reports in panel order.
    pub async fn query_panels(&self, panels: &[PanelConfig]) -> Vec<PanelQueryReport> {
        join_all(panels.iter().map(|panel| self.query_panel(panel))).await
    }

    /// 保存查询报告
    pub async fn save_results(&self, reports: &[PanelQueryReport]) -> CoreResult<()> {
        self.ctx.result_repository.save_results(reports).await
    }

    async fn query_account(
        &self,
        panel: &PanelConfig,
        credential: &CredentialRecord,
    ) -> AccountReport {
        let status = match self.ctx.fetch_usage(panel, credential).await {
            Ok((_, response)) => AccountQueryStatus::Queried {
                summary: UsageFormatter::format_summary(&response),
                raw_response: response,
            },
            Err(reason) => AccountQueryStatus::Skipped { reason },
        };

        AccountReport {
            name: credential.name.clone(),
            email: credential.email.clone(),
            status,
        }
    }
}
