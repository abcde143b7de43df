//! CLIProxyPlus management panel client

mod http;
mod source;
mod types;

use reqwest::Client;

pub(crate) use types::AuthFilesResponse;

/// Provider tag of Kiro auth files in the panel listing.
pub const KIRO_PROVIDER: &str = "kiro";

pub(crate) const AUTH_FILES_PATH: &str = "/v0/management/auth-files";
pub(crate) const AUTH_FILE_DOWNLOAD_PATH: &str = "/v0/management/auth-files/download";

/// Management API client.
///
/// Stateless apart from the shared connection pool: every call takes the
/// [`PanelConfig`](crate::PanelConfig) it targets, so one client serves all
/// configured panels.
#[derive(Debug, Clone)]
pub struct PanelClient {
    pub(crate) client: Client,
}

impl PanelClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}
