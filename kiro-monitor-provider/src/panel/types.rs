//! 管理面板 API 类型定义

use serde::Deserialize;

use crate::types::AuthFileEntry;

/// `GET /v0/management/auth-files` 响应
#[derive(Debug, Default, Deserialize)]
pub struct AuthFilesResponse {
    #[serde(default)]
    pub files: Vec<AuthFileEntry>,
}
