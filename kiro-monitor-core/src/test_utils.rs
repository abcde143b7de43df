//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use kiro_monitor_provider::{
    AuthFileEntry, CredentialPayload, CredentialSource, PanelConfig, UsageApi, UsageResponse,
};
use serde_json::{Value, json};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{HistoryRepository, ResultRepository};
use crate::types::{AccountResult, PanelQueryReport, PanelResult, Snapshot};

// ===== MockCredentialSource =====

#[derive(Default)]
struct SourceState {
    /// panel name -> listing
    listings: HashMap<String, Vec<AuthFileEntry>>,
    /// (panel name, file name) -> payload; absent means the download fails
    payloads: HashMap<(String, String), CredentialPayload>,
    downloads: Vec<String>,
}

/// In-memory panels keyed by panel name. Unknown panels list nothing.
#[derive(Clone, Default)]
pub struct MockCredentialSource {
    state: Arc<Mutex<SourceState>>,
    delay: Duration,
}

impl MockCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn add_account(&self, panel: &str, entry: AuthFileEntry, token: Option<&str>) {
        let payload = CredentialPayload {
            access_token: token.map(str::to_string),
            region: None,
        };
        self.insert(panel, entry, Some(payload));
    }

    pub fn add_account_with_region(
        &self,
        panel: &str,
        entry: AuthFileEntry,
        token: &str,
        region: &str,
    ) {
        let payload = CredentialPayload {
            access_token: Some(token.to_string()),
            region: Some(region.to_string()),
        };
        self.insert(panel, entry, Some(payload));
    }

    /// Listed, but its download fails.
    pub fn add_listing_only(&self, panel: &str, entry: AuthFileEntry) {
        self.insert(panel, entry, None);
    }

    pub fn add_other_provider(&self, panel: &str, name: &str, provider: &str) {
        let entry = AuthFileEntry {
            name: name.to_string(),
            provider: Some(provider.to_string()),
            ..AuthFileEntry::default()
        };
        self.insert(panel, entry, None);
    }

    /// File names downloaded so far.
    pub fn downloads(&self) -> Vec<String> {
        self.state.lock().unwrap().downloads.clone()
    }

    fn insert(&self, panel: &str, entry: AuthFileEntry, payload: Option<CredentialPayload>) {
        let mut state = self.state.lock().unwrap();
        if let Some(payload) = payload {
            state
                .payloads
                .insert((panel.to_string(), entry.name.clone()), payload);
        }
        state
            .listings
            .entry(panel.to_string())
            .or_default()
            .push(entry);
    }
}

#[async_trait]
impl CredentialSource for MockCredentialSource {
    async fn list_auth_files(&self, panel: &PanelConfig) -> Vec<AuthFileEntry> {
        tokio::time::sleep(self.delay).await;
        self.state
            .lock()
            .unwrap()
            .listings
            .get(&panel.name)
            .cloned()
            .unwrap_or_default()
    }

    async fn download_credential(
        &self,
        panel: &PanelConfig,
        name: &str,
    ) -> Option<CredentialPayload> {
        tokio::time::sleep(self.delay).await;
        let mut state = self.state.lock().unwrap();
        state.downloads.push(name.to_string());
        state
            .payloads
            .get(&(panel.name.clone(), name.to_string()))
            .cloned()
    }
}

// ===== MockUsageApi =====

#[derive(Default)]
struct UsageState {
    responses: HashMap<String, UsageResponse>,
    requests: Vec<(String, String, Duration)>,
}

/// Usage responses keyed by token. Unknown tokens get an error response.
#[derive(Clone, Default)]
pub struct MockUsageApi {
    state: Arc<Mutex<UsageState>>,
    delay: Duration,
}

impl MockUsageApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_response(&self, token: &str, response: UsageResponse) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(token.to_string(), response);
    }

    /// Tokens queried so far.
    pub fn calls(&self) -> Vec<String> {
        self.requests().into_iter().map(|(token, _, _)| token).collect()
    }

    /// `(token, region, timeout)` of every query.
    pub fn requests(&self) -> Vec<(String, String, Duration)> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl UsageApi for MockUsageApi {
    async fn query_usage(&self, token: &str, region: &str, timeout: Duration) -> UsageResponse {
        tokio::time::sleep(self.delay).await;
        let mut state = self.state.lock().unwrap();
        state
            .requests
            .push((token.to_string(), region.to_string(), timeout));
        state
            .responses
            .get(token)
            .cloned()
            .unwrap_or_else(|| UsageResponse::error("unknown token"))
    }
}

// ===== MockHistoryRepository =====

#[derive(Default)]
struct HistoryState {
    saves: Vec<usize>,
    save_error: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockHistoryRepository {
    state: Arc<Mutex<HistoryState>>,
}

impl MockHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_save_error(&self, err: Option<String>) {
        self.state.lock().unwrap().save_error = err;
    }

    pub fn save_count(&self) -> usize {
        self.state.lock().unwrap().saves.len()
    }

    /// History length of the latest save.
    pub fn last_saved_len(&self) -> Option<usize> {
        self.state.lock().unwrap().saves.last().copied()
    }
}

#[async_trait]
impl HistoryRepository for MockHistoryRepository {
    async fn save_history(&self, history: &[Snapshot]) -> CoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.saves.push(history.len());
        match &state.save_error {
            Some(msg) => Err(CoreError::StorageError(msg.clone())),
            None => Ok(()),
        }
    }
}

// ===== MockResultRepository =====

#[derive(Clone, Default)]
pub struct MockResultRepository {
    saved: Arc<Mutex<Option<Value>>>,
}

impl MockResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest saved reports as JSON.
    pub fn saved(&self) -> Option<Value> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultRepository for MockResultRepository {
    async fn save_results(&self, reports: &[PanelQueryReport]) -> CoreResult<()> {
        *self.saved.lock().unwrap() = Some(serde_json::to_value(reports)?);
        Ok(())
    }
}

// ===== 工厂方法 =====

pub fn create_test_context(
    source: MockCredentialSource,
    usage: MockUsageApi,
) -> Arc<ServiceContext> {
    create_test_context_with_repos(
        source,
        usage,
        MockHistoryRepository::new(),
        MockResultRepository::new(),
    )
}

pub fn create_test_context_with_repos(
    source: MockCredentialSource,
    usage: MockUsageApi,
    history: MockHistoryRepository,
    results: MockResultRepository,
) -> Arc<ServiceContext> {
    Arc::new(ServiceContext::new(
        Arc::new(source),
        Arc::new(usage),
        Arc::new(history),
        Arc::new(results),
    ))
}

/// Active Kiro auth file entry.
pub fn active_entry(name: &str, email: &str) -> AuthFileEntry {
    AuthFileEntry {
        name: name.to_string(),
        email: Some(email.to_string()),
        status: Some("active".to_string()),
        disabled: None,
        provider: Some("kiro".to_string()),
    }
}

/// Minimal `getUsageLimits` body with one breakdown item.
pub fn usage_body(limit: f64, used: f64) -> UsageResponse {
    UsageResponse::Data(json!({
        "usageBreakdownList": [{
            "resourceType": "CREDIT",
            "displayName": "Credits",
            "usageLimitWithPrecision": limit,
            "currentUsageWithPrecision": used
        }],
        "userInfo": {"email": "upstream@example.com"},
        "subscriptionInfo": {"subscriptionTitle": "KIRO FREE"},
        "nextDateReset": 1_735_689_600_000_i64
    }))
}

/// Snapshot `offset_secs` after a fixed base time.
pub fn snapshot_at(offset_secs: i64, panels: Vec<PanelResult>) -> Snapshot {
    let base = Local.timestamp_opt(1_700_000_000, 0).unwrap();
    Snapshot::new(base + chrono::Duration::seconds(offset_secs), panels)
}

/// Snapshot with a single `main` panel holding one account per value.
pub fn snapshot_with_accounts(offset_secs: i64, remaining: &[f64]) -> Snapshot {
    let panel = PanelConfig::new("main", "http://panel", "k", 30);
    let accounts = remaining
        .iter()
        .enumerate()
        .map(|(i, r)| AccountResult {
            panel_name: "main".to_string(),
            email: format!("user{i}@example.com"),
            remaining: *r,
            used: 0.0,
            limit: *r,
            percentage: 0.0,
            next_reset: String::new(),
        })
        .collect();
    snapshot_at(offset_secs, vec![PanelResult::new(&panel, accounts)])
}
