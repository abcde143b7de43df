//! 消耗速率估算
//!
//! Two-point estimate: only the first and the last snapshot are compared.

use crate::types::{PanelRate, PanelResult, RateInfo, Snapshot};
use crate::utils::math::round_to;

/// Computes consumption statistics over `history` (oldest first).
///
/// - fewer than 2 snapshots: only `samples` is set
/// - non-positive elapsed time: zero rates, no depletion forecast
#[must_use]
pub fn calculate_rate(history: &[Snapshot]) -> RateInfo {
    let samples = history.len();
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return RateInfo::insufficient(samples);
    };
    if samples < 2 {
        return RateInfo::insufficient(samples);
    }

    let elapsed = elapsed_seconds(first, last);
    if elapsed <= 0.0 {
        log::debug!("Non-positive monitoring window ({elapsed}s), rate suppressed");
        return RateInfo {
            samples,
            rate_per_minute: Some(0.0),
            rate_per_hour: Some(0.0),
            time_until_empty: None,
            monitoring_duration: None,
            panels: last.panel_details.iter().map(zero_panel_rate).collect(),
        };
    }

    let consumption = first.total_remaining - last.total_remaining;
    let rate_per_second = consumption / elapsed;

    RateInfo {
        samples,
        rate_per_minute: Some(round_to(rate_per_second * 60.0, 4)),
        rate_per_hour: Some(round_to(rate_per_second * 3600.0, 2)),
        time_until_empty: time_until_empty(consumption, last.total_remaining, elapsed),
        monitoring_duration: Some(whole_seconds(elapsed)),
        panels: last
            .panel_details
            .iter()
            .map(|panel| panel_rate(first, panel, elapsed))
            .collect(),
    }
}

fn panel_rate(first: &Snapshot, last_panel: &PanelResult, elapsed: f64) -> PanelRate {
    let Some(first_panel) = first.panel(&last_panel.panel_name) else {
        return zero_panel_rate(last_panel);
    };
    let consumption = first_panel.remaining - last_panel.remaining;

    PanelRate {
        panel_name: last_panel.panel_name.clone(),
        remaining: last_panel.remaining,
        rate_per_hour: round_to(consumption / elapsed * 3600.0, 2),
        time_until_empty: time_until_empty(consumption, last_panel.remaining, elapsed),
    }
}

fn zero_panel_rate(panel: &PanelResult) -> PanelRate {
    PanelRate {
        panel_name: panel.panel_name.clone(),
        remaining: panel.remaining,
        rate_per_hour: 0.0,
        time_until_empty: None,
    }
}

/// `remaining / rate_per_second`, written as `remaining * elapsed / consumption`
/// so exact inputs stay exact before truncation.
fn time_until_empty(consumption: f64, remaining: f64, elapsed: f64) -> Option<u64> {
    if consumption <= 0.0 || remaining <= 0.0 {
        return None;
    }
    let seconds = remaining * elapsed / consumption;
    seconds.is_finite().then(|| whole_seconds(seconds))
}

#[allow(clippy::cast_precision_loss)]
fn elapsed_seconds(first: &Snapshot, last: &Snapshot) -> f64 {
    (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(seconds: f64) -> u64 {
    seconds.max(0.0).trunc() as u64
}
