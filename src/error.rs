//! Error types for Memkeep
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Memkeep operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, session storage, and request validation.
#[derive(Error, Debug)]
pub enum MemkeepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required request field is missing or empty
    #[error("Validation error: {0}")]
    Validation(String),

    /// Load was asked for a key that was never saved
    #[error("Session not found")]
    SessionNotFound,

    /// Session storage errors (unreadable files, enumeration failures)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Memkeep operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
