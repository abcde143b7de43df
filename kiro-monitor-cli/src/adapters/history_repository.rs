//! JSON 文件监控历史仓库

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kiro_monitor_core::types::Snapshot;
use kiro_monitor_core::{CoreResult, HistoryRepository};

use super::write_json;

/// 历史文件名
pub const HISTORY_FILE: &str = "kiro_usage_history.json";

/// `[{timestamp, total_remaining, panel_details}, ...]` in `output_dir`.
pub struct JsonHistoryRepository {
    path: PathBuf,
}

impl JsonHistoryRepository {
    #[must_use]
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(HISTORY_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn save_history(&self, history: &[Snapshot]) -> CoreResult<()> {
        write_json(&self.path, &serde_json::to_value(history)?).await
    }
}
