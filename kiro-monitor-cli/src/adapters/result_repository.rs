//! JSON 文件查询结果仓库

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kiro_monitor_core::types::PanelQueryReport;
use kiro_monitor_core::{CoreResult, ResultRepository};

use super::write_json;

/// 查询结果文件名
pub const RESULTS_FILE: &str = "kiro_balance_results.json";

pub struct JsonResultRepository {
    path: PathBuf,
}

impl JsonResultRepository {
    #[must_use]
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(RESULTS_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultRepository for JsonResultRepository {
    async fn save_results(&self, reports: &[PanelQueryReport]) -> CoreResult<()> {
        write_json(&self.path, &serde_json::to_value(reports)?).await
    }
}
