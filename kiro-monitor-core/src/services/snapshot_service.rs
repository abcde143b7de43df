//! 跨面板快照服务与监控历史

use std::sync::Arc;

use chrono::Local;
use futures::future::join_all;
use kiro_monitor_provider::PanelConfig;

use crate::services::{PanelService, ServiceContext};
use crate::types::Snapshot;

/// Ordered snapshot history of one monitoring run, oldest first.
///
/// Append-only, except that a change in the total account count discards
/// every earlier snapshot: a rate is only meaningful across a stable set of
/// accounts.
#[derive(Debug, Clone, Default)]
pub struct UsageHistory {
    entries: Vec<Snapshot>,
}

impl UsageHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot, clearing the history first when the account count
    /// differs from the latest entry.
    ///
    /// # Returns
    /// * `true` - earlier snapshots were discarded
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        let reset = self
            .latest()
            .is_some_and(|last| last.account_count() != snapshot.account_count());
        if reset {
            log::info!(
                "Account count changed ({} -> {}), history reset",
                self.latest().map_or(0, Snapshot::account_count),
                snapshot.account_count()
            );
            self.entries.clear();
        }
        self.entries.push(snapshot);
        reset
    }

    #[must_use]
    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A snapshot as appended to the history.
#[derive(Debug, Clone)]
pub struct SnapshotRecord {
    pub snapshot: Snapshot,
    /// The append cleared earlier snapshots.
    pub history_reset: bool,
}

/// 跨面板快照服务
pub struct SnapshotService {
    panels: PanelService,
}

impl SnapshotService {
    /// 创建快照服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            panels: PanelService::new(ctx),
        }
    }

    /// Aggregates every panel concurrently into one snapshot.
    ///
    /// Waits for all panels; a panel that fails entirely contributes its
    /// zero-valued result. Panel order follows `panels`.
    pub async fn collect(&self, panels: &[PanelConfig]) -> Snapshot {
        let futures: Vec<_> = panels
            .iter()
            .map(|panel| self.panels.query_panel(panel))
            .collect();
        let results = join_all(futures).await;
        Snapshot::new(Local::now(), results)
    }

    /// Takes a snapshot and appends it to `history`.
    ///
    /// `history` is only touched after every panel has answered, so dropping
    /// this future mid-flight leaves it unchanged.
    pub async fn take_snapshot(
        &self,
        panels: &[PanelConfig],
        history: &mut UsageHistory,
    ) -> SnapshotRecord {
        let snapshot = self.collect(panels).await;
        let history_reset = history.record(snapshot.clone());
        SnapshotRecord {
            snapshot,
            history_reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;
    use crate::test_utils::{
        MockCredentialSource, MockUsageApi, active_entry, create_test_context, usage_body,
        snapshot_with_accounts,
    };

    #[test]
    fn history_appends_while_account_count_is_stable() {
        let mut history = UsageHistory::new();
        assert!(!history.record(snapshot_with_accounts(0, &[10.0, 5.0])));
        assert!(!history.record(snapshot_with_accounts(60, &[9.0, 5.0])));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn history_resets_on_account_count_change() {
        let mut history = UsageHistory::new();
        history.record(snapshot_with_accounts(0, &[10.0, 5.0]));
        history.record(snapshot_with_accounts(60, &[9.0, 5.0]));

        assert!(history.record(snapshot_with_accounts(120, &[9.0])));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().account_count(), 1);
    }

    #[test]
    fn empty_snapshot_after_accounts_resets() {
        let mut history = UsageHistory::new();
        history.record(snapshot_with_accounts(0, &[10.0]));
        assert!(history.record(snapshot_with_accounts(60, &[])));
        assert_eq!(history.len(), 1);
    }

    fn two_panels() -> Vec<PanelConfig> {
        vec![
            PanelConfig::new("alpha", "http://alpha", "k", 30),
            PanelConfig::new("beta", "http://beta", "k", 30),
        ]
    }

    #[tokio::test]
    async fn snapshot_covers_every_panel_in_order() {
        let source = MockCredentialSource::new();
        source.add_account("alpha", active_entry("a.json", "a@x"), Some("tok-a"));
        source.add_account("beta", active_entry("b1.json", "b1@x"), Some("tok-b1"));
        source.add_account("beta", active_entry("b2.json", "b2@x"), Some("tok-b2"));
        let usage = MockUsageApi::new();
        usage.set_response("tok-a", usage_body(100.0, 40.0));
        usage.set_response("tok-b1", usage_body(10.0, 0.0));
        usage.set_response("tok-b2", usage_body(10.0, 2.5));

        let service = SnapshotService::new(create_test_context(source, usage));
        let snapshot = service.collect(&two_panels()).await;

        let names: Vec<&str> = snapshot
            .panel_details
            .iter()
            .map(|p| p.panel_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert!((snapshot.total_remaining - 77.5).abs() < 1e-9);
        let sum: f64 = snapshot.panel_details.iter().map(|p| p.remaining).sum();
        assert!((snapshot.total_remaining - sum).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unreachable_panel_contributes_zero() {
        let source = MockCredentialSource::new();
        source.add_account("alpha", active_entry("a.json", "a@x"), Some("tok-a"));
        let usage = MockUsageApi::new();
        usage.set_response("tok-a", usage_body(10.0, 0.0));

        let service = SnapshotService::new(create_test_context(source, usage));
        let snapshot = service.collect(&two_panels()).await;

        assert_eq!(snapshot.panel_details.len(), 2);
        assert!(snapshot.panel("beta").unwrap().accounts.is_empty());
        assert!((snapshot.total_remaining - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn take_snapshot_reports_reset() {
        let source = MockCredentialSource::new();
        source.add_account("alpha", active_entry("a.json", "a@x"), Some("tok-a"));
        let usage = MockUsageApi::new();
        usage.set_response("tok-a", usage_body(10.0, 0.0));
        let service = SnapshotService::new(create_test_context(source, usage));

        let mut history = UsageHistory::new();
        history.record(Snapshot::new(
            Local.timestamp_opt(1_700_000_000, 0).unwrap(),
            vec![],
        ));

        let record = service.take_snapshot(&two_panels(), &mut history).await;
        assert!(record.history_reset);
        assert_eq!(history.len(), 1);
        assert_eq!(record.snapshot.account_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panels_are_aggregated_concurrently() {
        let source = MockCredentialSource::new().with_delay(Duration::from_secs(3));
        let usage = MockUsageApi::new().with_delay(Duration::from_secs(3));
        source.add_account("alpha", active_entry("a.json", "a@x"), Some("tok-a"));
        source.add_account("beta", active_entry("b.json", "b@x"), Some("tok-b"));
        usage.set_response("tok-a", usage_body(10.0, 0.0));
        usage.set_response("tok-b", usage_body(10.0, 0.0));

        let service = SnapshotService::new(create_test_context(source, usage));
        let started = tokio::time::Instant::now();
        let snapshot = service.collect(&two_panels()).await;

        assert_eq!(snapshot.account_count(), 2);
        // list + download + query = 9s per panel, sequential would be 18s
        assert!(started.elapsed() < Duration::from_secs(12));
    }
}
