//! Unified error type definition

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Configuration file does not exist
    #[error(
        "Configuration file not found: {}\nCopy config.example.yaml to config.yaml and fill in your values.",
        .0.display()
    )]
    ConfigNotFound(PathBuf),

    /// Configuration file has no content
    #[error("Configuration file is empty: {}", .0.display())]
    ConfigEmpty(PathBuf),

    /// Malformed or semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The panel filter matched nothing
    #[error("No panel matches {requested:?} (available: {available:?})")]
    NoPanelsSelected {
        requested: Vec<String>,
        available: Vec<String>,
    },

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Credential file is neither camelCase nor snake_case layout
    #[error("Unrecognized credential file format")]
    UnknownCredentialFormat,
}

impl CoreError {
    /// Whether it is expected behavior (user input, missing file), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ConfigNotFound(_)
            | Self::ConfigEmpty(_)
            | Self::InvalidConfig(_)
            | Self::NoPanelsSelected { .. }
            | Self::UnknownCredentialFormat => true,
            Self::StorageError(_) | Self::SerializationError(_) => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
