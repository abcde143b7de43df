//! File adapters for the CLI
//!
//! - **`JsonHistoryRepository`**: rewrites `kiro_usage_history.json` with the
//!   full monitoring history after every tick and on shutdown.
//! - **`JsonResultRepository`**: writes the one-shot balance report, raw
//!   usage responses included, to `kiro_balance_results.json`.

mod history_repository;
mod result_repository;

pub use history_repository::JsonHistoryRepository;
pub use result_repository::JsonResultRepository;

use std::path::Path;

use kiro_monitor_core::{CoreError, CoreResult};
use serde_json::Value;

/// Pretty-prints `value` to `path`, creating the parent directory.
///
/// The file is written next to its final location and then renamed, so a
/// reader never sees a half-written dump.
pub(crate) async fn write_json(path: &Path, value: &Value) -> CoreResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| CoreError::StorageError(format!("{}: {e}", dir.display())))?;
    }

    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, text)
        .await
        .map_err(|e| CoreError::StorageError(format!("{}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| CoreError::StorageError(format!("{}: {e}", path.display())))?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_json(&path, &json!({"a": "中文"})).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("中文"));
        assert!(text.ends_with('\n'));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
