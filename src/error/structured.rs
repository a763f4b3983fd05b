//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::SignalError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Database Errors (exit code 2) ===
    /// Database could not be opened
    DatabaseUnavailable,
    /// Database operation failed
    DatabaseError,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Invalid status value
    InvalidStatus,
    /// Invalid severity value
    InvalidSeverity,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,
    /// Config parse error
    ConfigParseError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidSeverity => "INVALID_SEVERITY",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ConfigParseError => "CONFIG_PARSE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether fixing the input and retrying could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::InvalidStatus | Self::InvalidSeverity
        )
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Database errors
    /// - 4: Validation errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DatabaseUnavailable | Self::DatabaseError => 2,
            Self::ValidationFailed | Self::InvalidStatus | Self::InvalidSeverity => 4,
            Self::ConfigError | Self::ConfigParseError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `SignalError`.
    #[must_use]
    pub fn from_error(err: &SignalError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &SignalError) -> (ErrorCode, Option<Value>) {
        match err {
            SignalError::DatabaseOpen { path, .. } => (
                ErrorCode::DatabaseUnavailable,
                Some(json!({"path": path.display().to_string()})),
            ),
            SignalError::Database(_) => (ErrorCode::DatabaseError, None),
            #[cfg(feature = "postgres")]
            SignalError::Postgres(_) => (ErrorCode::DatabaseError, None),
            SignalError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            SignalError::InvalidStatus { status } => (
                ErrorCode::InvalidStatus,
                Some(json!({"status": status, "valid_values": ["open", "closed"]})),
            ),
            SignalError::InvalidSeverity { severity } => (
                ErrorCode::InvalidSeverity,
                Some(json!({
                    "severity": severity,
                    "valid_values": ["low", "medium", "high", "critical"],
                })),
            ),
            SignalError::Config(_) => (ErrorCode::ConfigError, None),
            SignalError::Yaml(_) => (ErrorCode::ConfigParseError, None),
            SignalError::Io(_) => (ErrorCode::IoError, None),
            SignalError::Json(_) => (ErrorCode::JsonError, None),
            SignalError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    fn generate_hint(err: &SignalError) -> Option<String> {
        match err {
            SignalError::InvalidSeverity { severity } => detect_severity_intent(severity)
                .map_or_else(
                    || err.suggestion().map(str::to_string),
                    |detected| Some(format!("Did you mean --severity {detected}?")),
                ),
            _ => err.suggestion().map(str::to_string),
        }
    }
}

/// Severity synonyms for intent detection.
static SEVERITY_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("urgent", "critical"),
        ("blocker", "critical"),
        ("crit", "critical"),
        ("p0", "critical"),
        ("major", "high"),
        ("hi", "high"),
        ("p1", "high"),
        ("normal", "medium"),
        ("med", "medium"),
        ("moderate", "medium"),
        ("p2", "medium"),
        ("minor", "low"),
        ("trivial", "low"),
        ("lo", "low"),
        ("p3", "low"),
    ]
    .into_iter()
    .collect()
});

/// Map a common synonym to a valid severity.
#[must_use]
pub fn detect_severity_intent(input: &str) -> Option<&'static str> {
    SEVERITY_SYNONYMS
        .get(input.trim().to_lowercase().as_str())
        .copied()
}
