//! 用量监控循环

use std::sync::Arc;
use std::time::Duration;

use kiro_monitor_provider::PanelConfig;
use tokio::sync::watch;

use crate::services::{ServiceContext, SnapshotService, UsageHistory, calculate_rate};
use crate::types::{RateInfo, Snapshot};

/// Progress reported by [`MonitorService::run`].
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A snapshot with at least one account was taken and persisted.
    Tick {
        snapshot: Snapshot,
        rate: RateInfo,
        history_reset: bool,
    },
    /// No panel reported any account; retried after `retry_in`.
    NoAccounts { retry_in: Duration },
    /// The loop was cancelled; history has been flushed.
    Stopped { rate: RateInfo },
}

/// 用量监控服务
///
/// Owns the history of one run; only this task mutates it, between ticks.
pub struct MonitorService {
    ctx: Arc<ServiceContext>,
    snapshots: SnapshotService,
    panels: Vec<PanelConfig>,
    history: UsageHistory,
}

impl MonitorService {
    /// 创建监控服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, panels: Vec<PanelConfig>) -> Self {
        Self {
            snapshots: SnapshotService::new(Arc::clone(&ctx)),
            ctx,
            panels,
            history: UsageHistory::new(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &UsageHistory {
        &self.history
    }

    /// Polls every `interval` until `shutdown` turns `true`.
    ///
    /// Cancellation drops the in-flight tick (snapshot or wait), flushes the
    /// history, emits [`MonitorEvent::Stopped`] and returns the final
    /// statistics. A closed `shutdown` channel never cancels.
    pub async fn run<F>(
        &mut self,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
        mut listener: F,
    ) -> RateInfo
    where
        F: FnMut(MonitorEvent),
    {
        log::info!(
            "Monitoring {} panel(s) every {}s",
            self.panels.len(),
            interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let record = tokio::select! {
                record = self.snapshots.take_snapshot(&self.panels, &mut self.history) => record,
                () = wait_for_shutdown(&mut shutdown) => break,
            };

            if record.snapshot.has_accounts() {
                let rate = calculate_rate(self.history.entries());
                listener(MonitorEvent::Tick {
                    snapshot: record.snapshot,
                    rate,
                    history_reset: record.history_reset,
                });
                self.persist().await;
            } else {
                log::warn!("No Kiro account data from any panel");
                listener(MonitorEvent::NoAccounts { retry_in: interval });
            }

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                () = wait_for_shutdown(&mut shutdown) => break,
            }
        }

        log::info!("Monitoring stopped after {} sample(s)", self.history.len());
        self.persist().await;

        let rate = calculate_rate(self.history.entries());
        listener(MonitorEvent::Stopped { rate: rate.clone() });
        rate
    }

    /// Writes the full history; failures are logged only.
    async fn persist(&self) {
        if let Err(e) = self
            .ctx
            .history_repository
            .save_history(self.history.entries())
            .await
        {
            if e.is_expected() {
                log::warn!("Failed to save monitoring history: {e}");
            } else {
                log::error!("Failed to save monitoring history: {e}");
            }
        }
    }
}

/// Resolves once `shutdown` holds `true`.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        // 发送端已关闭，不再可能收到停止信号
        std::future::pending::<()>().await;
    }
}
