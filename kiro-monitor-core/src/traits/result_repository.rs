//! 单次查询结果持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::PanelQueryReport;

/// 查询结果仓库 Trait
///
/// 实现:
/// - CLI: `JsonResultRepository` (`kiro_balance_results.json`)
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// 保存一次余额查询的全部面板报告（含原始响应）
    async fn save_results(&self, reports: &[PanelQueryReport]) -> CoreResult<()>;
}
