//! # kiro-monitor-provider
//!
//! HTTP clients for the two remote systems the Kiro usage monitor talks to:
//!
//! | Client | Remote API | Auth Method |
//! |--------|-----------|-------------|
//! | [`PanelClient`] | CLIProxyPlus management API (`/v0/management/auth-files`) | Bearer management key |
//! | [`KiroUsageClient`] | AWS CodeWhisperer `getUsageLimits` | Bearer access token |
//!
//! Both clients are thin: every call is attempted exactly once, carries an
//! explicit per-call timeout, and degrades to "no data" instead of failing the
//! caller. Their behaviour is exposed through the [`CredentialSource`] and
//! [`UsageApi`] traits so higher layers can be tested with in-memory fakes.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use kiro_monitor_provider::{
//!     create_http_client, CredentialSource, KiroUsageClient, PanelClient, PanelConfig, UsageApi,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // One connection pool shared by every query of this run
//!     let http = create_http_client()?;
//!     let panels = PanelClient::new(http.clone());
//!     let usage = KiroUsageClient::new(http);
//!
//!     let panel = PanelConfig::new("main", "http://127.0.0.1:8080", "management-key", 30);
//!     for entry in panels.list_credentials(&panel).await {
//!         let Some(credential) = panels.hydrate(&panel, &entry).await else {
//!             continue;
//!         };
//!         let Some(token) = credential.token.as_deref() else {
//!             continue;
//!         };
//!         let response = usage
//!             .query_usage(token, &credential.region, Duration::from_secs(30))
//!             .await;
//!         println!("{}: {}", credential.email, response.is_error());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Low-level helpers return [`Result<T, ProviderError>`](ProviderError). The
//! trait methods themselves never fail: a failed listing is an empty list, a
//! failed download is `None`, and a failed usage query is
//! [`UsageResponse::Error`].

mod error;
mod http_client;
mod kiro;
mod panel;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export clients
pub use http_client::create_http_client;
pub use kiro::{KiroUsageClient, DEFAULT_REGION};
pub use panel::{PanelClient, KIRO_PROVIDER};

// Re-export traits
pub use traits::{CredentialSource, UsageApi};

// Re-export types
pub use types::{
    AuthFileEntry, CredentialPayload, CredentialRecord, CredentialStatus, PanelConfig,
    UsageResponse,
};

// Re-export utils module
pub use utils::log_sanitizer;
