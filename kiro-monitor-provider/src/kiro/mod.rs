//! Kiro (AWS CodeWhisperer) usage-limits client

mod usage;

use reqwest::{Client, RequestBuilder};

use crate::error::{ProviderError, Result};

/// Region used when a credential does not carry one.
pub const DEFAULT_REGION: &str = "us-east-1";

const SOURCE_NAME: &str = "kiro";

const USAGE_QUERY: &str = "isEmailRequired=true&origin=AI_EDITOR&resourceType=AGENTIC_REQUEST";

const KIRO_USER_AGENT: &str = "aws-sdk-js/1.0.0 ua/2.1 os/windows lang/python api/codewhispererruntime#1.0.0 m/E KiroIDE-0.8.140-BalanceQuery";
const KIRO_AMZ_USER_AGENT: &str = "aws-sdk-js/1.0.0 KiroIDE-0.8.140-BalanceQuery";

/// `getUsageLimits` client.
///
/// The upstream service identifies the caller by these exact headers, so the
/// request mimics the Kiro IDE one for one.
#[derive(Debug, Clone)]
pub struct KiroUsageClient {
    client: Client,
}

impl KiroUsageClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Usage endpoint of a region.
    ///
    /// The region becomes part of the host name, so anything but ASCII
    /// letters, digits and `-` is rejected. An empty region means
    /// [`DEFAULT_REGION`].
    pub(crate) fn endpoint(region: &str) -> Result<String> {
        let region = match region.trim() {
            "" => DEFAULT_REGION,
            r => r,
        };
        if !region
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ProviderError::InvalidParameter {
                source_name: SOURCE_NAME.to_string(),
                param: "region".to_string(),
                detail: format!("'{region}' is not a valid AWS region"),
            });
        }
        Ok(format!(
            "https://codewhisperer.{region}.amazonaws.com/getUsageLimits?{USAGE_QUERY}"
        ))
    }

    pub(crate) fn build_request(
        &self,
        token: &str,
        region: &str,
        timeout: std::time::Duration,
    ) -> Result<RequestBuilder> {
        let url = Self::endpoint(region)?;
        Ok(self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("amz-sdk-request", "attempt=1; max=1")
            .header("x-amzn-kiro-agent-mode", "vibe")
            .header("x-amz-user-agent", KIRO_AMZ_USER_AGENT)
            .header("User-Agent", KIRO_USER_AGENT)
            .header("Connection", "close")
            .timeout(timeout))
    }
}
