use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::log_sanitizer::mask_secret;

// ============ Panel ============

/// Connection settings for one CLIProxyPlus management panel.
///
/// Built once at startup from the configuration file and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Panel name, unique per configuration (matched case-insensitively).
    pub name: String,
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Management API key sent as a bearer token.
    pub management_key: String,
    /// Per-call timeout in seconds, applied to every request made for this panel.
    pub timeout: u64,
}

impl PanelConfig {
    pub fn new(
        name: impl Into<String>,
        base_url: impl AsRef<str>,
        management_key: impl Into<String>,
        timeout: u64,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            management_key: management_key.into(),
            timeout,
        }
    }

    /// Per-call timeout as a [`Duration`].
    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Whether `name` selects this panel (case-insensitive).
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

impl std::fmt::Display for PanelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.base_url)
    }
}

impl std::fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("management_key", &mask_secret(&self.management_key))
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============ Credentials ============

/// Whether a stored credential should be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Active,
    Disabled,
}

/// One entry of `GET /v0/management/auth-files`.
///
/// Only the fields the monitor reads are declared; the panel sends more.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthFileEntry {
    /// Auth file name, used as the download key.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form status string (`"disabled"` marks a disabled file).
    #[serde(default)]
    pub status: Option<String>,
    /// Explicit disabled flag written by newer panels.
    #[serde(default)]
    pub disabled: Option<bool>,
    /// Declared provider tag, e.g. `"kiro"`.
    #[serde(default)]
    pub provider: Option<String>,
}

impl AuthFileEntry {
    /// Display identity: the email when present and non-empty, else the file name.
    #[must_use]
    pub fn display_email(&self) -> &str {
        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(self.name.as_str())
    }

    #[must_use]
    pub fn status(&self) -> CredentialStatus {
        let status_disabled = self
            .status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("disabled"));
        if status_disabled || self.disabled == Some(true) {
            CredentialStatus::Disabled
        } else {
            CredentialStatus::Active
        }
    }

    /// Whether the entry declares `provider` (case-insensitive).
    #[must_use]
    pub fn is_provider(&self, provider: &str) -> bool {
        self.provider
            .as_deref()
            .is_some_and(|p| p.trim().eq_ignore_ascii_case(provider))
    }
}

/// A credential as seen by the monitor.
///
/// Listed with metadata only (`token == None`), hydrated by a second fetch,
/// and dropped right after its usage query.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub name: String,
    pub email: String,
    pub status: CredentialStatus,
    /// Access token, absent until downloaded.
    pub token: Option<String>,
    pub region: String,
}

impl CredentialRecord {
    /// Metadata-only record built from a listing entry.
    #[must_use]
    pub fn from_entry(entry: &AuthFileEntry) -> Self {
        Self {
            name: entry.name.clone(),
            email: entry.display_email().to_string(),
            status: entry.status(),
            token: None,
            region: crate::kiro::DEFAULT_REGION.to_string(),
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.status == CredentialStatus::Disabled
    }

    /// Token if present and non-empty.
    #[must_use]
    pub fn usable_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("status", &self.status)
            .field("token", &self.token.as_deref().map(mask_secret))
            .field("region", &self.region)
            .finish()
    }
}

/// Payload of `GET /v0/management/auth-files/download?name=<name>`.
///
/// The file holds more (refresh token, client id, ...); the monitor only needs
/// the access token and its region.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl std::fmt::Debug for CredentialPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPayload")
            .field("access_token", &self.access_token.as_deref().map(mask_secret))
            .field("region", &self.region)
            .finish()
    }
}

// ============ Usage ============

/// Outcome of one `getUsageLimits` call.
///
/// Serializes the way the upstream body looks: the verbatim JSON on success,
/// `{"error": "..."}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsageResponse {
    /// Transport failure, timeout or non-2xx status.
    Error { error: String },
    /// Parsed response body, structure owned by the upstream API.
    Data(Value),
}

impl UsageResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// The error message, including an `error` key inside a 2xx body.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Error { error } => Some(error.clone()),
            Self::Data(value) => value.get("error").map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn panel_config_trims_trailing_slash() {
        let panel = PanelConfig::new("main", "http://127.0.0.1:8080///", "key", 30);
        assert_eq!(panel.base_url, "http://127.0.0.1:8080");
        assert_eq!(panel.timeout_duration(), Duration::from_secs(30));
        assert_eq!(panel.to_string(), "main (http://127.0.0.1:8080)");
    }

    #[test]
    fn panel_config_matches_case_insensitively() {
        let panel = PanelConfig::new("Main-Panel", "http://x", "key", 30);
        assert!(panel.matches_name("main-panel"));
        assert!(panel.matches_name(" MAIN-PANEL "));
        assert!(!panel.matches_name("main"));
    }

    #[test]
    fn panel_config_debug_masks_key() {
        let panel = PanelConfig::new("main", "http://x", "super-secret-management-key", 30);
        let debug = format!("{panel:?}");
        assert!(!debug.contains("super-secret-management-key"));
    }

    #[test]
    fn auth_file_entry_email_defaults_to_name() {
        let entry: AuthFileEntry =
            serde_json::from_value(json!({"name": "kiro-1.json", "provider": "kiro"})).unwrap();
        assert_eq!(entry.display_email(), "kiro-1.json");

        let entry: AuthFileEntry =
            serde_json::from_value(json!({"name": "kiro-1.json", "email": ""})).unwrap();
        assert_eq!(entry.display_email(), "kiro-1.json");

        let entry: AuthFileEntry =
            serde_json::from_value(json!({"name": "kiro-1.json", "email": "a@b.c"})).unwrap();
        assert_eq!(entry.display_email(), "a@b.c");
    }

    #[test]
    fn auth_file_entry_status() {
        let active: AuthFileEntry = serde_json::from_value(json!({"name": "a"})).unwrap();
        assert_eq!(active.status(), CredentialStatus::Active);

        let by_status: AuthFileEntry =
            serde_json::from_value(json!({"name": "a", "status": "Disabled"})).unwrap();
        assert_eq!(by_status.status(), CredentialStatus::Disabled);

        let by_flag: AuthFileEntry =
            serde_json::from_value(json!({"name": "a", "status": "ready", "disabled": true}))
                .unwrap();
        assert_eq!(by_flag.status(), CredentialStatus::Disabled);
    }

    #[test]
    fn auth_file_entry_provider_match() {
        let entry: AuthFileEntry =
            serde_json::from_value(json!({"name": "a", "provider": "Kiro"})).unwrap();
        assert!(entry.is_provider("kiro"));
        assert!(!entry.is_provider("codex"));
        assert!(!AuthFileEntry::default().is_provider("kiro"));
    }

    #[test]
    fn credential_record_from_entry_has_no_token() {
        let entry: AuthFileEntry =
            serde_json::from_value(json!({"name": "a.json", "email": "a@b.c"})).unwrap();
        let record = CredentialRecord::from_entry(&entry);
        assert_eq!(record.email, "a@b.c");
        assert_eq!(record.region, "us-east-1");
        assert!(record.usable_token().is_none());
    }

    #[test]
    fn credential_record_blank_token_is_unusable() {
        let record = CredentialRecord {
            name: "a".into(),
            email: "a".into(),
            status: CredentialStatus::Active,
            token: Some("  ".into()),
            region: "us-east-1".into(),
        };
        assert!(record.usable_token().is_none());
    }

    #[test]
    fn usage_response_error_serializes_as_error_object() {
        let response = UsageResponse::error("timeout");
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"error": "timeout"}));
        assert_eq!(response.error_message().as_deref(), Some("timeout"));
    }

    #[test]
    fn usage_response_data_with_error_key_is_error() {
        let response = UsageResponse::Data(json!({"error": {"reason": "expired"}}));
        assert!(response.is_error());
        assert_eq!(
            response.error_message().as_deref(),
            Some(r#"{"reason":"expired"}"#)
        );
        assert!(!UsageResponse::Data(json!({"usageBreakdownList": []})).is_error());
    }
}
