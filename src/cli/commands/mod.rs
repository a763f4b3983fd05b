//! Command implementations.
//!
//! Each command resolves configuration, opens the configured store, and
//! prints either human output or JSON (`--json`).

pub mod activity;
pub mod add;
pub mod audit;
pub mod calendar;
pub mod close;
pub mod digest;
pub mod export;
pub mod init;
pub mod list;
pub mod metrics;
pub mod reopen;
pub mod stale;
pub mod summary;
pub mod trend;
pub mod triage;
pub mod update;
pub mod workload;

use crate::config::{self, CliOverrides, ResolvedConfig};
use crate::error::{Result, SignalError};
use crate::model::{Severity, Signal, Status};
use crate::storage::{SignalFilter, SignalStore, open_store};
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// Resolved configuration plus an open store.
pub struct CommandContext {
    pub config: ResolvedConfig,
    pub store: Box<dyn SignalStore>,
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("config", &self.config)
            .field("store", &self.store.location())
            .finish()
    }
}

impl CommandContext {
    /// Load configuration and open the store it names.
    ///
    /// # Errors
    ///
    /// Returns a config error for bad settings, or the backend's error.
    pub fn open(cli: &CliOverrides) -> Result<Self> {
        let config = config::load_config(cli)?;
        let store = open_store(&config.store)?;
        Ok(Self { config, store })
    }

    /// Every signal, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn all_signals(&mut self) -> Result<Vec<Signal>> {
        self.store.list_signals(&SignalFilter::all())
    }
}

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write a rendered report to `out`, or print it when no path is given.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn emit_report(rendered: &str, out: Option<&Path>, label: &str) -> Result<()> {
    match out {
        Some(path) => {
            crate::util::write_output_file(path, rendered)?;
            println!("Wrote {label} to {}.", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Report an unknown id. Not an error: nothing is mutated and the exit code is 0.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn print_not_found(id: i64, json: bool) -> Result<()> {
    tracing::info!(id, "Signal not found");
    if json {
        return print_json(&json!({ "id": id, "found": false }));
    }
    println!("Signal {id} not found.");
    Ok(())
}

/// Reject negative day counts.
///
/// # Errors
///
/// Returns a validation error naming `field`.
pub fn non_negative(value: i64, field: &str) -> Result<i64> {
    if value < 0 {
        return Err(SignalError::validation(field, "must be >= 0"));
    }
    Ok(value)
}

/// Parse an optional user-supplied severity.
///
/// # Errors
///
/// Returns an invalid-severity error for unknown levels.
pub fn parse_severity(value: Option<&str>) -> Result<Option<Severity>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse::<Severity>)
        .transpose()
}

/// Parse an optional user-supplied status.
///
/// # Errors
///
/// Returns an invalid-status error for anything but open/closed.
pub fn parse_status(value: Option<&str>) -> Result<Option<Status>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse::<Status>)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_rejects_negative_days() {
        assert_eq!(non_negative(0, "days").unwrap(), 0);
        let err = non_negative(-1, "days").unwrap_err();
        assert!(matches!(err, SignalError::Validation { .. }));
    }

    #[test]
    fn parse_helpers_ignore_blank() {
        assert_eq!(parse_severity(None).unwrap(), None);
        assert_eq!(parse_severity(Some("  ")).unwrap(), None);
        assert_eq!(parse_severity(Some("HIGH")).unwrap(), Some(Severity::High));
        assert!(parse_severity(Some("urgent")).is_err());
        assert_eq!(parse_status(Some("closed")).unwrap(), Some(Status::Closed));
        assert!(parse_status(Some("done")).is_err());
    }
}
