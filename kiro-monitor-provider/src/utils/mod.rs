//! Utility modules.

/// Log sanitization utilities to prevent secret exposure.
pub mod log_sanitizer;
