//! `CredentialSource` 实现

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::traits::CredentialSource;
use crate::types::{AuthFileEntry, CredentialPayload, PanelConfig};

use super::PanelClient;

/// Logs a non-fatal failure at a level matching how surprising it is.
fn log_failure(action: &str, error: &ProviderError) {
    if error.is_expected() {
        log::warn!("Failed to {action}: {error}");
    } else {
        log::error!("Failed to {action}: {error}");
    }
}

#[async_trait]
impl CredentialSource for PanelClient {
    async fn list_auth_files(&self, panel: &PanelConfig) -> Vec<AuthFileEntry> {
        match self.fetch_auth_files(panel).await {
            Ok(files) => {
                log::debug!("[{}] Listed {} auth file(s)", panel.name, files.len());
                files
            }
            Err(e) => {
                log_failure(&format!("list auth files from {}", panel.name), &e);
                Vec::new()
            }
        }
    }

    async fn download_credential(
        &self,
        panel: &PanelConfig,
        name: &str,
    ) -> Option<CredentialPayload> {
        match self.fetch_credential(panel, name).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                log_failure(&format!("download {name} from {}", panel.name), &e);
                None
            }
        }
    }
}
