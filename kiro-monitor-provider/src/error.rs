use serde::{Deserialize, Serialize};

/// Unified error type for the panel and usage clients.
///
/// Each variant carries a `source_name` identifying which remote produced the
/// error (a panel name, or `kiro` for the usage API), plus variant-specific
/// context. All variants are serializable for structured error reporting.
///
/// None of these errors is retried: callers degrade the affected account or
/// panel to "no data".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Remote that produced the error.
        source_name: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Remote that produced the error.
        source_name: String,
        /// Error details.
        detail: String,
    },

    /// The remote answered with a non-2xx status code.
    HttpStatus {
        /// Remote that produced the error.
        source_name: String,
        /// HTTP status code.
        status: u16,
        /// Response body (truncated for logging), if any.
        body: Option<String>,
    },

    /// Failed to parse the remote's response.
    ParseError {
        /// Remote that produced the error.
        source_name: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// A request parameter is invalid (e.g., a region that cannot form a host name).
    InvalidParameter {
        /// Remote that produced the error.
        source_name: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（凭证失效、参数错误等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => matches!(status, 401 | 403 | 404),
            Self::InvalidParameter { .. } => true,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::ParseError { .. } => false,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError {
                source_name,
                detail,
            } => {
                write!(f, "[{source_name}] Network error: {detail}")
            }
            Self::Timeout {
                source_name,
                detail,
            } => {
                write!(f, "[{source_name}] Request timeout: {detail}")
            }
            Self::HttpStatus {
                source_name,
                status,
                body,
            } => {
                if let Some(body) = body.as_deref().filter(|b| !b.is_empty()) {
                    write!(f, "[{source_name}] HTTP {status}: {body}")
                } else {
                    write!(f, "[{source_name}] HTTP {status}")
                }
            }
            Self::ParseError {
                source_name,
                detail,
            } => {
                write!(f, "[{source_name}] Parse error: {detail}")
            }
            Self::InvalidParameter {
                source_name,
                param,
                detail,
            } => {
                write!(f, "[{source_name}] Invalid parameter '{param}': {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
