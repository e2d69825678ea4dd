//! Error types for opskit.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for opskit operations.
#[derive(Error, Debug)]
pub enum OpskitError {
    /// Query service errors (submission rejected, query failed, bad status payloads).
    #[error("Query error: {0}")]
    Query(String),

    /// Object storage errors (missing objects, unreadable bodies, bad locations).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Schedule errors (malformed expressions, rule lookups, hour tokens).
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// Notification delivery errors.
    #[error("Notification error: {0}")]
    Notify(String),

    /// Configuration errors (invalid config file, missing token, bad overrides).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OpskitError {
    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a storage error with the given message.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Creates a schedule error with the given message.
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::Schedule(msg.into())
    }

    /// Creates a notification error with the given message.
    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Query(_) => "Query Error",
            Self::Storage(_) => "Storage Error",
            Self::Schedule(_) => "Schedule Error",
            Self::Notify(_) => "Notification Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using OpskitError.
pub type Result<T> = std::result::Result<T, OpskitError>;
