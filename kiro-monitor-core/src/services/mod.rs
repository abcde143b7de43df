//! 业务逻辑服务层

mod credential_format;
mod monitor_service;
mod panel_service;
mod query_service;
mod rate_estimator;
mod snapshot_service;
mod usage_formatter;

pub use credential_format::{
    Conversion, CredentialFormat, aiclient_to_cliproxy, cliproxy_to_aiclient, convert,
    detect_format,
};
pub use monitor_service::{MonitorEvent, MonitorService};
pub use panel_service::PanelService;
pub use query_service::QueryService;
pub use rate_estimator::calculate_rate;
pub use snapshot_service::{SnapshotRecord, SnapshotService, UsageHistory};
pub use usage_formatter::UsageFormatter;

use std::sync::Arc;

use kiro_monitor_provider::{CredentialRecord, CredentialSource, PanelConfig, UsageApi, UsageResponse};

use crate::traits::{HistoryRepository, ResultRepository};
use crate::types::SkipReason;

/// 服务上下文 - 持有所有依赖
///
/// 前端需要创建此上下文，并注入网络客户端与存储实现。
pub struct ServiceContext {
    /// 凭证来源（管理面板）
    pub credential_source: Arc<dyn CredentialSource>,
    /// 用量查询接口
    pub usage_api: Arc<dyn UsageApi>,
    /// 监控历史仓库
    pub history_repository: Arc<dyn HistoryRepository>,
    /// 查询结果仓库
    pub result_repository: Arc<dyn ResultRepository>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        credential_source: Arc<dyn CredentialSource>,
        usage_api: Arc<dyn UsageApi>,
        history_repository: Arc<dyn HistoryRepository>,
        result_repository: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            credential_source,
            usage_api,
            history_repository,
            result_repository,
        }
    }

    /// 查询单个凭证的用量
    ///
    /// Disabled credentials are never downloaded. The hydrated record is
    /// returned with the response so callers can report its identity.
    pub(crate) async fn fetch_usage(
        &self,
        panel: &PanelConfig,
        credential: &CredentialRecord,
    ) -> Result<(CredentialRecord, UsageResponse), SkipReason> {
        if credential.is_disabled() {
            log::debug!("[{}] {} is disabled, skipping", panel.name, credential.email);
            return Err(SkipReason::Disabled);
        }

        let Some(hydrated) = self.credential_source.hydrate(panel, credential).await else {
            log::warn!(
                "[{}] Failed to download auth file {}",
                panel.name,
                credential.name
            );
            return Err(SkipReason::DownloadFailed);
        };

        let Some(token) = hydrated.usable_token() else {
            log::warn!(
                "[{}] No access_token in auth file {}",
                panel.name,
                credential.name
            );
            return Err(SkipReason::MissingToken);
        };

        let response = self
            .usage_api
            .query_usage(token, &hydrated.region, panel.timeout_duration())
            .await;

        Ok((hydrated, response))
    }
}
