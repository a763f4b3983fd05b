//! Error types and handling for `signal_catalog`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Accepts `anyhow` errors through `Other` for ad-hoc context
//! - Provides recovery hints for user-facing errors
//! - Maps every variant to a stable code and exit code (see [`structured`])
//!
//! Not-found on close/reopen/update is deliberately *not* surfaced as an
//! error by the commands: they print a message and exit successfully.

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `signal_catalog` operations.
#[derive(Error, Debug)]
pub enum SignalError {
    // === Storage Errors ===
    /// Database file could not be opened at the resolved path.
    #[error("Cannot open database at '{path}': {reason}")]
    DatabaseOpen { path: PathBuf, reason: String },

    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// PostgreSQL database error.
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] postgres::Error),

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid severity value.
    #[error("Invalid severity: {severity}")]
    InvalidSeverity { severity: String },

    // === Configuration Errors ===
    /// Configuration error (backend, DSN, table name, config files).
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SignalError {
    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DatabaseOpen { .. } => Some("Check --db or run: sigcat init"),
            Self::InvalidSeverity { .. } => Some("Valid severities: low, medium, high, critical"),
            Self::InvalidStatus { .. } => Some("Valid statuses: open, closed"),
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type using `SignalError`.
pub type Result<T> = std::result::Result<T, SignalError>;
