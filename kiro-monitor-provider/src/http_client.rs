//! Generic HTTP client tools
//!
//! Shared request flow for the panel and usage clients: send once, log,
//! classify the failure, read the body. Each client still builds its own
//! `RequestBuilder` (URL, headers, timeout).

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Creates the HTTP client (connection pool) shared by every query of a run.
///
/// Only the connect timeout is set here; request timeouts are per call because
/// every panel configures its own.
pub fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            source_name: "http".to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request exactly once and returns the response text.
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, timeout)
    /// * `source_name` - remote name (for logging and errors)
    /// * `method_name` - request method name (such as "GET", used for logs)
    /// * `url_or_action` - URL or action name (for logging)
    ///
    /// # Returns
    /// * `Ok(response_text)` - 2xx response body
    /// * `Err(ProviderError::Timeout)` - the per-call timeout elapsed
    /// * `Err(ProviderError::NetworkError)` - transport failure
    /// * `Err(ProviderError::HttpStatus)` - non-2xx status
    pub async fn execute_request(
        request_builder: RequestBuilder,
        source_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<String> {
        log::debug!("[{source_name}] {method_name} {url_or_action}");

        let response = request_builder
            .send()
            .await
            .map_err(|e| transport_error(&e, source_name))?;

        let status = response.status();
        log::debug!("[{source_name}] Response Status: {}", status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::debug!(
                "[{source_name}] Error Body: {}",
                truncate_for_log(&body)
            );
            return Err(ProviderError::HttpStatus {
                source_name: source_name.to_string(),
                status: status.as_u16(),
                body: Some(truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| transport_error(&e, source_name))?;

        log::debug!(
            "[{source_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok(response_text)
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ProviderError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str, source_name: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{source_name}] JSON parse failed: {e}");
            log::error!(
                "[{source_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                source_name: source_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

/// Maps a `reqwest` transport error onto `Timeout` or `NetworkError`.
fn transport_error(error: &reqwest::Error, source_name: &str) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout {
            source_name: source_name.to_string(),
            detail: error.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            source_name: source_name.to_string(),
            detail: error.to_string(),
        }
    }
}
