//! Management panel HTTP 请求方法

use reqwest::RequestBuilder;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::types::{AuthFileEntry, CredentialPayload, PanelConfig};

use super::{AUTH_FILE_DOWNLOAD_PATH, AUTH_FILES_PATH, AuthFilesResponse, PanelClient};

impl PanelClient {
    /// Builds an authenticated GET request against one panel.
    pub(crate) fn authorized_get(&self, panel: &PanelConfig, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", panel.base_url))
            .header("Authorization", format!("Bearer {}", panel.management_key))
            .header("Content-Type", "application/json")
            .timeout(panel.timeout_duration())
    }

    /// `GET /v0/management/auth-files`
    pub(crate) async fn fetch_auth_files(&self, panel: &PanelConfig) -> Result<Vec<AuthFileEntry>> {
        let request = self.authorized_get(panel, AUTH_FILES_PATH);
        let text =
            HttpUtils::execute_request(request, &panel.name, "GET", AUTH_FILES_PATH).await?;
        let response: AuthFilesResponse = HttpUtils::parse_json(&text, &panel.name)?;
        Ok(response.files)
    }

    /// `GET /v0/management/auth-files/download?name=<name>`
    pub(crate) async fn fetch_credential(
        &self,
        panel: &PanelConfig,
        name: &str,
    ) -> Result<CredentialPayload> {
        let request = self
            .authorized_get(panel, AUTH_FILE_DOWNLOAD_PATH)
            .query(&[("name", name)]);
        let text = HttpUtils::execute_request(
            request,
            &panel.name,
            "GET",
            &format!("{AUTH_FILE_DOWNLOAD_PATH}?name={name}"),
        )
        .await?;
        HttpUtils::parse_json(&text, &panel.name)
    }
}
