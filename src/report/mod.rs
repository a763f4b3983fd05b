//! Report engine.
//!
//! Every report is a pure function of already-loaded signals, an explicit
//! `today` (UTC date) and explicit windows/limits. Timestamps are truncated to
//! their UTC date before any window comparison, and windows are inclusive.

pub mod activity;
pub mod audit;
pub mod calendar;
pub mod digest;
pub mod metrics;
pub mod stale;
pub mod summary;
pub mod trend;
pub mod triage;
pub mod workload;

use crate::model::Signal;
use crate::util::time::days_between;
use chrono::NaiveDate;

/// Where a due date falls relative to today and a due-soon window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    /// Due before today.
    Overdue,
    /// Due today or within `window` days.
    DueSoon,
    /// Due after the window.
    DueLater,
    NoDueDate,
}

/// Classify a due date. The window is inclusive of both today and its last day.
#[must_use]
pub fn classify_due(due: Option<NaiveDate>, today: NaiveDate, window: i64) -> DueState {
    match due {
        None => DueState::NoDueDate,
        Some(d) if d < today => DueState::Overdue,
        Some(d) if days_between(today, d) <= window => DueState::DueSoon,
        Some(_) => DueState::DueLater,
    }
}

/// Open signals, preserving input order.
#[must_use]
pub fn open_signals(signals: &[Signal]) -> Vec<&Signal> {
    signals.iter().filter(|s| s.is_open()).collect()
}

/// First day of a trailing window of `days` ending today.
#[must_use]
pub fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    today - chrono::Duration::days(days)
}

/// One-line summary used in lists: `[id] title (category, severity) - owner - due X`.
#[must_use]
pub fn signal_line(signal: &Signal) -> String {
    format!(
        "[{}] {} ({}, {}) - {} - due {}",
        signal.id,
        signal.title,
        signal.category_label(),
        signal.effective_severity(),
        signal.owner_label(),
        signal.due_label()
    )
}

/// Underlined section title used by text reports.
#[must_use]
pub fn heading(title: &str) -> String {
    format!("{title}\n{}", "-".repeat(title.chars().count()))
}
