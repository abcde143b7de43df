use std::time::Duration;

use async_trait::async_trait;

use crate::kiro::DEFAULT_REGION;
use crate::panel::KIRO_PROVIDER;
use crate::types::{AuthFileEntry, CredentialPayload, CredentialRecord, PanelConfig, UsageResponse};

/// Source of stored credentials (a CLIProxyPlus management panel).
///
/// Implementations never fail the caller: transport and HTTP failures are
/// logged and surface as "no data" (an empty list, `None`).
///
/// 实现:
/// - [`PanelClient`](crate::PanelClient): `reqwest` against the management API
/// - test doubles in `kiro-monitor-core`
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Lists every auth file on the panel, whatever its provider.
    async fn list_auth_files(&self, panel: &PanelConfig) -> Vec<AuthFileEntry>;

    /// Downloads the full payload of one auth file.
    ///
    /// # Returns
    /// * `Some(payload)` - the file was downloaded (it may still lack a token)
    /// * `None` - the download failed
    async fn download_credential(
        &self,
        panel: &PanelConfig,
        name: &str,
    ) -> Option<CredentialPayload>;

    /// Lists the Kiro credentials of a panel (metadata only).
    async fn list_credentials(&self, panel: &PanelConfig) -> Vec<CredentialRecord> {
        self.list_auth_files(panel)
            .await
            .iter()
            .filter(|entry| entry.is_provider(KIRO_PROVIDER))
            .map(CredentialRecord::from_entry)
            .collect()
    }

    /// Fetches token and region for a listed credential.
    ///
    /// Returns `None` when the download fails. A downloaded file without a
    /// token yields a record whose `token` is `None`.
    async fn hydrate(
        &self,
        panel: &PanelConfig,
        credential: &CredentialRecord,
    ) -> Option<CredentialRecord> {
        let payload = self.download_credential(panel, &credential.name).await?;
        let region = payload
            .region
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Some(CredentialRecord {
            token: payload.access_token,
            region,
            ..credential.clone()
        })
    }
}

/// Usage-limits endpoint (AWS CodeWhisperer `getUsageLimits`).
#[async_trait]
pub trait UsageApi: Send + Sync {
    /// Queries the usage limits of one account.
    ///
    /// Never fails: transport errors, timeouts and non-2xx responses come back
    /// as [`UsageResponse::Error`]. An empty `region` means `us-east-1`.
    async fn query_usage(&self, token: &str, region: &str, timeout: Duration) -> UsageResponse;
}
