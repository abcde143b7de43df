//! 用量响应格式化

use serde::Deserialize;
use serde_json::Value;

use kiro_monitor_provider::UsageResponse;

use crate::types::{UsageDetail, UsageOutcome, UsageSummary};
use crate::utils::datetime::{format_local, from_epoch_millis};
use crate::utils::math::round_to;

const UNKNOWN_RESOURCE: &str = "UNKNOWN";

/// `getUsageLimits` response body, only the fields the summary reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageLimitsBody {
    #[serde(default)]
    usage_breakdown_list: Option<Vec<BreakdownItem>>,
    #[serde(default)]
    user_info: Option<UserInfo>,
    #[serde(default)]
    subscription_info: Option<SubscriptionInfo>,
    #[serde(default)]
    next_date_reset: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BreakdownItem {
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    usage_limit: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    usage_limit_with_precision: Option<Option<f64>>,
    #[serde(default)]
    current_usage: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    current_usage_with_precision: Option<Option<f64>>,
}

/// Keeps an explicit `null` apart from a missing key: `Some(None)` vs `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

impl BreakdownItem {
    // 高精度字段存在时优先，即使为 null（按 0 计）
    fn limit(&self) -> f64 {
        match self.usage_limit_with_precision {
            Some(precise) => precise.unwrap_or(0.0),
            None => self.usage_limit.unwrap_or(0.0),
        }
    }

    fn used(&self) -> f64 {
        match self.current_usage_with_precision {
            Some(precise) => precise.unwrap_or(0.0),
            None => self.current_usage.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct UserInfo {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionInfo {
    #[serde(default)]
    subscription_title: Option<String>,
}

/// 用量格式化器
pub struct UsageFormatter;

impl UsageFormatter {
    /// Normalizes a raw usage response.
    ///
    /// An error response, or a body carrying an `error` key, passes through
    /// as [`UsageOutcome::Failure`] with the message unchanged.
    #[must_use]
    pub fn format_summary(response: &UsageResponse) -> UsageOutcome {
        if let Some(error) = response.error_message() {
            return UsageOutcome::failure(error);
        }
        let UsageResponse::Data(value) = response else {
            return UsageOutcome::failure("empty usage response");
        };

        let body = match UsageLimitsBody::deserialize(value) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Malformed usage response: {e}");
                return UsageOutcome::failure(format!("malformed usage response: {e}"));
            }
        };

        let mut total_limit = 0.0;
        let mut total_used = 0.0;
        let mut details = Vec::new();

        for item in body.usage_breakdown_list.unwrap_or_default() {
            let limit = item.limit();
            let used = item.used();
            total_limit += limit;
            total_used += used;

            let resource_type = item
                .resource_type
                .unwrap_or_else(|| UNKNOWN_RESOURCE.to_string());
            details.push(UsageDetail {
                display_name: item.display_name.unwrap_or_else(|| resource_type.clone()),
                resource_type,
                used: round_to(used, 2),
                limit: round_to(limit, 2),
                remaining: round_to((limit - used).max(0.0), 2),
            });
        }

        let percentage = if total_limit > 0.0 {
            total_used / total_limit * 100.0
        } else {
            0.0
        };

        UsageOutcome::Success(UsageSummary {
            email: body.user_info.and_then(|u| u.email).unwrap_or_default(),
            subscription: body
                .subscription_info
                .and_then(|s| s.subscription_title)
                .unwrap_or_default(),
            total_used: round_to(total_used, 2),
            total_limit: round_to(total_limit, 2),
            remaining: round_to((total_limit - total_used).max(0.0), 2),
            percentage: round_to(percentage, 2),
            next_reset: body
                .next_date_reset
                .as_ref()
                .map(format_reset)
                .unwrap_or_default(),
            details,
        })
    }
}

/// Epoch milliseconds to local time; the raw value when it cannot be converted.
fn format_reset(raw: &Value) -> String {
    let millis = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match millis {
        Some(ms) if ms.abs() < f64::EPSILON => String::new(),
        Some(ms) => from_epoch_millis(ms).map_or_else(|| raw_string(raw), |dt| format_local(&dt)),
        None => match raw {
            Value::Null | Value::Bool(false) => String::new(),
            _ => raw_string(raw),
        },
    }
}

fn raw_string(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn summarize(value: Value) -> UsageSummary {
        match UsageFormatter::format_summary(&UsageResponse::Data(value)) {
            UsageOutcome::Success(summary) => summary,
            UsageOutcome::Failure { error } => panic!("unexpected failure: {error}"),
        }
    }

    #[test]
    fn sums_breakdown_items() {
        let summary = summarize(json!({
            "usageBreakdownList": [
                {"usageLimit": 100, "currentUsage": 30},
                {"usageLimit": 50, "currentUsage": 50}
            ]
        }));

        assert!((summary.total_limit - 150.0).abs() < 1e-9);
        assert!((summary.total_used - 80.0).abs() < 1e-9);
        assert!((summary.remaining - 70.0).abs() < 1e-9);
        assert!((summary.percentage - 53.33).abs() < 1e-9);
        assert_eq!(summary.details.len(), 2);
        assert_eq!(summary.details[0].resource_type, "UNKNOWN");
        assert_eq!(summary.details[0].display_name, "UNKNOWN");
        assert!(summary.details[1].remaining.abs() < 1e-9);
    }

    #[test]
    fn zero_limit_gives_zero_percentage() {
        let summary = summarize(json!({
            "usageBreakdownList": [{"usageLimit": 0, "currentUsage": 5}]
        }));
        assert!(summary.percentage.abs() < f64::EPSILON);
        assert!(summary.remaining.abs() < f64::EPSILON);

        let empty = summarize(json!({}));
        assert!(empty.percentage.abs() < f64::EPSILON);
        assert!(empty.details.is_empty());
    }

    #[test]
    fn error_passes_through_alone() {
        let outcome = UsageFormatter::format_summary(&UsageResponse::error("timeout"));
        assert_eq!(outcome, UsageOutcome::failure("timeout"));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "timeout"})
        );

        let in_body = UsageFormatter::format_summary(&UsageResponse::Data(
            json!({"error": "expired", "usageBreakdownList": []}),
        ));
        assert_eq!(in_body.error(), Some("expired"));
    }

    #[test]
    fn precision_fields_win() {
        let summary = summarize(json!({
            "usageBreakdownList": [{
                "resourceType": "CREDIT",
                "displayName": "Credits",
                "usageLimit": 500,
                "usageLimitWithPrecision": 500.5,
                "currentUsage": 12,
                "currentUsageWithPrecision": 12.345
            }]
        }));
        assert!((summary.total_limit - 500.5).abs() < 1e-9);
        assert!((summary.total_used - 12.35).abs() < 1e-9);
        assert_eq!(summary.details[0].display_name, "Credits");
        assert_eq!(summary.details[0].resource_type, "CREDIT");
    }

    #[test]
    fn display_name_defaults_to_resource_type() {
        let summary = summarize(json!({
            "usageBreakdownList": [{"resourceType": "AGENTIC_REQUEST", "usageLimit": 1}]
        }));
        assert_eq!(summary.details[0].display_name, "AGENTIC_REQUEST");
    }

    #[test]
    fn reads_identity_sections() {
        let summary = summarize(json!({
            "userInfo": {"email": "dev@example.com"},
            "subscriptionInfo": {"subscriptionTitle": "KIRO PRO"}
        }));
        assert_eq!(summary.email, "dev@example.com");
        assert_eq!(summary.subscription, "KIRO PRO");

        let anonymous = summarize(json!({"userInfo": {}}));
        assert_eq!(anonymous.email, "");
        assert_eq!(anonymous.subscription, "");
    }

    #[test]
    fn reset_time_formats_or_falls_back() {
        let formatted = summarize(json!({"nextDateReset": 1_735_689_600_000_i64}));
        assert_eq!(formatted.next_reset.len(), 19);
        assert!(formatted.next_reset.starts_with("20"));

        assert_eq!(summarize(json!({"nextDateReset": 0})).next_reset, "");
        assert_eq!(summarize(json!({"nextDateReset": null})).next_reset, "");
        assert_eq!(summarize(json!({})).next_reset, "");

        let out_of_range = summarize(json!({"nextDateReset": 1.0e20}));
        assert_eq!(out_of_range.next_reset, "1e+20");
    }

    #[test]
    fn null_precision_field_counts_as_zero() {
        let summary = summarize(json!({
            "usageBreakdownList": [
                {"usageLimitWithPrecision": null, "usageLimit": 100, "currentUsage": 10},
                {"usageLimit": 50, "currentUsageWithPrecision": null, "currentUsage": 5}
            ]
        }));
        assert!((summary.total_limit - 50.0).abs() < 1e-9);
        assert!((summary.total_used - 10.0).abs() < 1e-9);
        assert!(summary.details[0].limit.abs() < 1e-9);
        assert!(summary.details[1].used.abs() < 1e-9);
    }

    #[test]
    fn malformed_body_is_failure() {
        let outcome = UsageFormatter::format_summary(&UsageResponse::Data(json!({
            "usageBreakdownList": [{"usageLimit": "lots"}]
        })));
        assert!(outcome.error().unwrap().contains("malformed"));
    }
}
