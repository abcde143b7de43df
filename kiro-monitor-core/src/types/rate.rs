//! 消耗速率类型

use serde::Serialize;

/// Two-point consumption rate of one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelRate {
    pub panel_name: String,
    /// Remaining credit in the latest snapshot.
    pub remaining: f64,
    pub rate_per_hour: f64,
    /// Seconds until the panel runs dry, `None` when it does not deplete.
    pub time_until_empty: Option<u64>,
}

/// Consumption statistics over a history.
///
/// With fewer than two samples every rate is `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RateInfo {
    pub samples: usize,
    pub rate_per_minute: Option<f64>,
    pub rate_per_hour: Option<f64>,
    /// Seconds until the total runs dry, `None` means no depletion forecast.
    pub time_until_empty: Option<u64>,
    /// Seconds between the first and the last sample.
    pub monitoring_duration: Option<u64>,
    pub panels: Vec<PanelRate>,
}

impl RateInfo {
    /// Result carrying only the sample count.
    #[must_use]
    pub fn insufficient(samples: usize) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }

    /// Whether enough samples exist for a rate.
    #[must_use]
    pub fn has_rate(&self) -> bool {
        self.rate_per_hour.is_some()
    }
}
