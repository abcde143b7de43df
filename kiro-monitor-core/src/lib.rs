//! Kiro Monitor Core Library
//!
//! Platform-independent logic of the Kiro usage monitor:
//! - Usage summarizer (raw `getUsageLimits` body -> normalized summary)
//! - Panel aggregator and cross-panel snapshot engine (concurrent fan-out)
//! - Usage history with reset-on-topology-change and the rate estimator
//! - Monitor loop, one-shot balance query and credential format converter
//!
//! Network access goes through the `kiro-monitor-provider` traits and
//! persistence through the [`HistoryRepository`] / [`ResultRepository`]
//! traits, so front ends inject their own implementations.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::AppConfig;
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{HistoryRepository, ResultRepository};
