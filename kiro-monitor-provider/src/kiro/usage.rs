//! `UsageApi` 实现

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::http_client::HttpUtils;
use crate::traits::UsageApi;
use crate::types::UsageResponse;

use super::{KiroUsageClient, SOURCE_NAME};

#[async_trait]
impl UsageApi for KiroUsageClient {
    async fn query_usage(&self, token: &str, region: &str, timeout: Duration) -> UsageResponse {
        let request = match self.build_request(token, region, timeout) {
            Ok(request) => request,
            Err(e) => return UsageResponse::error(e.to_string()),
        };

        let result = match HttpUtils::execute_request(
            request,
            SOURCE_NAME,
            "GET",
            &format!("getUsageLimits ({region})"),
        )
        .await
        {
            Ok(text) => HttpUtils::parse_json::<Value>(&text, SOURCE_NAME),
            Err(e) => Err(e),
        };

        match result {
            Ok(body) => UsageResponse::Data(body),
            Err(e) => {
                if e.is_expected() {
                    log::debug!("Usage query failed: {e}");
                } else {
                    log::warn!("Usage query failed: {e}");
                }
                UsageResponse::error(e.to_string())
            }
        }
    }
}
