//! 监控历史持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Snapshot;

/// 监控历史仓库 Trait
///
/// 实现:
/// - CLI: `JsonHistoryRepository` (`kiro_usage_history.json`)
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// 保存完整历史（整体覆盖，不追加）
    ///
    /// # Arguments
    /// * `history` - 当前历史，最早的快照在前
    async fn save_history(&self, history: &[Snapshot]) -> CoreResult<()>;
}
