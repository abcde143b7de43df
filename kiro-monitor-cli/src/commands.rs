//! Subcommand implementations

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kiro_monitor_core::AppConfig;
use kiro_monitor_core::config::select_panels;
use kiro_monitor_core::services::{
    CredentialFormat, MonitorEvent, MonitorService, QueryService, ServiceContext,
    convert as convert_credential,
};
use kiro_monitor_core::types::PanelConfig;
use kiro_monitor_provider::{KiroUsageClient, PanelClient, create_http_client};
use tokio::sync::watch;

use crate::adapters::{JsonHistoryRepository, JsonResultRepository};
use crate::display;

/// Loads the configuration and applies the `--panel` filter.
fn load_panels(config_path: &Path, filter: &[String]) -> Result<Vec<PanelConfig>> {
    let config = AppConfig::load(config_path)?;
    let panels = select_panels(config.panel_configs()?, filter)?;
    tracing::info!(
        "Using {} panel(s): {}",
        panels.len(),
        panels
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(panels)
}

/// One shared connection pool for every query of this process.
fn build_context(output_dir: &Path) -> Result<Arc<ServiceContext>> {
    let http = create_http_client().context("Failed to create HTTP client")?;
    Ok(Arc::new(ServiceContext::new(
        Arc::new(PanelClient::new(http.clone())),
        Arc::new(KiroUsageClient::new(http)),
        Arc::new(JsonHistoryRepository::new(output_dir)),
        Arc::new(JsonResultRepository::new(output_dir)),
    )))
}

fn print_panels(panels: &[PanelConfig]) {
    for panel in panels {
        println!("🌐 Panel: {panel}");
    }
}

pub async fn monitor(
    config_path: &Path,
    filter: &[String],
    output_dir: &Path,
    interval: u64,
) -> Result<ExitCode> {
    let panels = load_panels(config_path, filter)?;
    let ctx = build_context(output_dir)?;
    let history_path = JsonHistoryRepository::new(output_dir).path().to_path_buf();

    println!("{}", display::separator());
    println!("🔍 Kiro Usage Monitor");
    println!("{}", display::separator());
    println!("⏰ Interval: {interval} seconds");
    println!("📌 Press Ctrl+C to stop");
    print_panels(&panels);
    println!("📋 Fetching initial data...");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {e}"),
        }
    });

    let mut service = MonitorService::new(ctx, panels);
    service
        .run(Duration::from_secs(interval), shutdown_rx, |event| match event {
            MonitorEvent::Tick {
                snapshot,
                rate,
                history_reset,
            } => {
                println!();
                print!("{}", display::render_tick(&snapshot, &rate, history_reset));
            }
            MonitorEvent::NoAccounts { retry_in } => {
                print!("{}", display::render_no_accounts(retry_in));
            }
            MonitorEvent::Stopped { rate } => {
                println!("\n\n👋 Monitoring stopped");
                println!("💾 History saved to: {}", history_path.display());
                print!("{}", display::render_final(&rate));
            }
        })
        .await;

    Ok(ExitCode::SUCCESS)
}

pub async fn query(config_path: &Path, filter: &[String], output_dir: &Path) -> Result<ExitCode> {
    let panels = load_panels(config_path, filter)?;
    let ctx = build_context(output_dir)?;
    let results_path = JsonResultRepository::new(output_dir).path().to_path_buf();

    println!("{}", display::separator());
    println!("🔍 Kiro Balance Query");
    println!("{}", display::separator());
    print_panels(&panels);
    println!("📋 Fetching auth files...\n");

    let service = QueryService::new(ctx);
    let reports = service.query_panels(&panels).await;

    for report in &reports {
        print!("{}", display::render_query_report(report));
    }
    print!("{}", display::render_query_totals(&reports));

    service
        .save_results(&reports)
        .await
        .context("Failed to save results")?;
    println!("💾 Full results saved to: {}", results_path.display());

    // 所有面板都没有任何凭证文件时视为失败
    if reports.iter().all(|r| r.is_unreachable_or_empty()) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn convert(
    input: &Path,
    output: Option<&Path>,
    target: Option<CredentialFormat>,
) -> Result<ExitCode> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Input file not found or unreadable: {}", input.display()))?;
    let data: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", input.display()))?;

    let conversion = convert_credential(data, target)
        .with_context(|| format!("Cannot convert {}", input.display()))?;

    if conversion.is_noop() {
        eprintln!(
            "Input is already in {} format, nothing to convert",
            conversion.target
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = serde_json::to_string_pretty(&conversion.data)?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Converted ({} -> {}): {} -> {}",
                conversion.source,
                conversion.target,
                input.display(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(ExitCode::SUCCESS)
}
