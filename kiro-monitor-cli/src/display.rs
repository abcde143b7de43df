//! Console rendering
//!
//! Everything is rendered to a `String` first so the layout can be tested;
//! the caller prints it.

use std::fmt::Write as _;
use std::time::Duration;

use kiro_monitor_core::types::{
    AccountQueryStatus, AccountReport, PanelQueryReport, RateInfo, Snapshot, UsageOutcome,
};
use kiro_monitor_core::utils::datetime::{format_clock, format_duration, format_local};

const SEPARATOR_WIDTH: usize = 70;
const EMAIL_WIDTH: usize = 30;

pub fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// `[██████░░░░]` style bar; the percentage is clamped to 0-100.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let ratio = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let filled = ((width as f64) * ratio) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Depletion forecast, `∞` when there is none.
pub fn format_eta(seconds: Option<u64>) -> String {
    seconds.map_or_else(
        || "∞ (no consumption or not enough data)".to_string(),
        format_duration,
    )
}

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub fn render_tick(snapshot: &Snapshot, rate: &RateInfo, history_reset: bool) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "[{}] 💰 Total remaining: {:.2}",
        format_local(&snapshot.timestamp),
        snapshot.total_remaining
    );

    match rate.rate_per_hour {
        Some(per_hour) if rate.samples >= 2 => {
            let _ = writeln!(
                out,
                " | 📈 {per_hour:.2}/h | ⏱️ {}",
                format_eta(rate.time_until_empty)
            );
        }
        _ => {
            let _ = writeln!(out, " | sampling ({}/2)...", rate.samples);
        }
    }

    if history_reset {
        let _ = writeln!(out, "  ⚠️  Account count changed, rate history restarted");
    }

    let multi_panel = snapshot.panel_details.len() > 1;
    for panel in &snapshot.panel_details {
        if multi_panel {
            let panel_rate = rate.panels.iter().find(|p| p.panel_name == panel.panel_name);
            let _ = write!(out, "  ▸ {} ({:.2})", panel.panel_name, panel.remaining);
            match panel_rate {
                Some(p) if rate.has_rate() => {
                    let _ = writeln!(
                        out,
                        " | {:.2}/h | {}",
                        p.rate_per_hour,
                        format_eta(p.time_until_empty)
                    );
                }
                _ => out.push('\n'),
            }
        }
        for account in &panel.accounts {
            let _ = writeln!(
                out,
                "  [{}] {:5.1}% | {:7.2} | {}",
                progress_bar(account.percentage, 15),
                account.percentage,
                account.remaining,
                truncate_chars(&account.email, EMAIL_WIDTH)
            );
        }
    }

    out
}

pub fn render_no_accounts(retry_in: Duration) -> String {
    format!(
        "❌ No Kiro account data from any panel\n   Retrying in {} seconds...\n",
        retry_in.as_secs()
    )
}

pub fn render_final(rate: &RateInfo) -> String {
    let mut out = String::new();
    if rate.samples < 2 || !rate.has_rate() {
        return out;
    }
    let _ = writeln!(out, "\n📊 Final statistics:");
    let _ = writeln!(out, "   Samples: {}", rate.samples);
    let _ = writeln!(
        out,
        "   Duration: {}",
        rate.monitoring_duration
            .map_or_else(|| "N/A".to_string(), format_clock)
    );
    let _ = writeln!(
        out,
        "   Average consumption per hour: {:.2}",
        rate.rate_per_hour.unwrap_or(0.0)
    );
    out
}

fn render_account(out: &mut String, index: usize, total: usize, account: &AccountReport) {
    let _ = writeln!(out, "[{index}/{total}] 📄 {}", account.email);
    match &account.status {
        AccountQueryStatus::Skipped { reason } => {
            let _ = writeln!(out, "  ⏸️  Skipped ({reason})");
        }
        AccountQueryStatus::Queried {
            summary: UsageOutcome::Failure { error },
            ..
        } => {
            let _ = writeln!(out, "  ❌ Error: {error}");
        }
        AccountQueryStatus::Queried {
            summary: UsageOutcome::Success(summary),
            ..
        } => {
            let email = if summary.email.is_empty() {
                "N/A"
            } else {
                summary.email.as_str()
            };
            let plan = if summary.subscription.is_empty() {
                "Free"
            } else {
                summary.subscription.as_str()
            };
            let reset = if summary.next_reset.is_empty() {
                "N/A"
            } else {
                summary.next_reset.as_str()
            };
            let _ = writeln!(out, "  📧 Email: {email}");
            let _ = writeln!(out, "  📦 Plan: {plan}");
            let _ = writeln!(
                out,
                "  📊 Usage: {:.2} / {:.2} ({:.1}%)",
                summary.total_used, summary.total_limit, summary.percentage
            );
            let _ = writeln!(out, "  [{}]", progress_bar(summary.percentage, 30));
            let _ = writeln!(out, "  💰 Remaining: {:.2}", summary.remaining);
            let _ = writeln!(out, "  🔄 Reset: {reset}");
        }
    }
    out.push('\n');
}

pub fn render_query_report(report: &PanelQueryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🌐 {} ({})", report.panel_name, report.panel_url);

    if report.accounts.is_empty() {
        if report.other_provider_count == 0 {
            let _ = writeln!(out, "❌ No auth files found or failed to connect.\n");
        } else {
            let _ = writeln!(out, "⚠️  No Kiro auth files found.");
            let _ = writeln!(
                out,
                "   Found {} auth file(s) of other types.\n",
                report.other_provider_count
            );
        }
        return out;
    }

    let _ = writeln!(out, "✅ Found {} Kiro auth file(s)\n", report.accounts.len());
    let total = report.accounts.len();
    for (i, account) in report.accounts.iter().enumerate() {
        render_account(&mut out, i + 1, total, account);
    }
    out
}

pub fn render_query_totals(reports: &[PanelQueryReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n📊 Summary\n{}", separator(), separator());

    for report in reports {
        for account in &report.accounts {
            if let Some(remaining) = account.remaining() {
                let _ = writeln!(out, "  {}: {remaining:.2} remaining", account.email);
            }
        }
    }

    let total: f64 = reports.iter().map(|r| r.total_remaining).sum();
    if reports.len() > 1 {
        out.push('\n');
        for report in reports {
            let _ = writeln!(
                out,
                "  ▸ {}: {:.2}",
                report.panel_name, report.total_remaining
            );
        }
    }
    let _ = writeln!(out, "\n🎯 Total Remaining Credits: {total:.2}");
    out
}
