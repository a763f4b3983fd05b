//! Core data types for `signal_catalog`.
//!
//! - `Signal` - one tracked issue row
//! - `Status` - open/closed lifecycle
//! - `Severity` - triage severity with its scoring weight
//! - `NewSignal` - validated input for the add operation
//! - `SignalUpdate` - field changes applied by update/close/reopen

use crate::error::SignalError;
use crate::util::time;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signal lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Lenient decoding for stored rows. Anything other than `closed` is open.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "closed" => Self::Closed,
            _ => Self::Open,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(SignalError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Signal severity.
///
/// Unknown stored values survive as `Custom` and score like `Medium`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    #[serde(untagged)]
    Custom(String),
}

impl Severity {
    /// All recognised levels, most severe first.
    pub const LEVELS: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Custom(value) => value,
        }
    }

    /// Triage multiplier: low=1, medium=2, high=3, critical=4.
    #[must_use]
    pub const fn weight(&self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Medium | Self::Custom(_) => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    #[must_use]
    pub const fn is_high_or_critical(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    /// Decode a stored column value. Empty text is treated as unset.
    #[must_use]
    pub fn from_stored(value: Option<String>) -> Option<Self> {
        let value = value?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(
            trimmed
                .parse()
                .unwrap_or_else(|_| Self::Custom(trimmed.to_string())),
        )
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(SignalError::InvalidSeverity {
                severity: other.to_string(),
            }),
        }
    }
}

/// One tracked signal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Signal {
    /// Severity used for scoring; unset means medium.
    #[must_use]
    pub fn effective_severity(&self) -> Severity {
        self.severity.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }

    #[must_use]
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.map(|dt| dt.date_naive())
    }

    #[must_use]
    pub fn closed_date(&self) -> Option<NaiveDate> {
        self.closed_at.map(|dt| dt.date_naive())
    }

    /// Last-update date, falling back to creation for rows never updated.
    #[must_use]
    pub fn updated_date(&self) -> Option<NaiveDate> {
        self.updated_at.or(self.created_at).map(|dt| dt.date_naive())
    }

    /// Whole days since creation (UTC dates), 0 when creation is unknown.
    #[must_use]
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        self.created_date()
            .map_or(0, |created| time::days_between(created, today))
    }

    #[must_use]
    pub fn owner_label(&self) -> &str {
        self.owner.as_deref().unwrap_or("Unassigned")
    }

    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Unspecified")
    }

    #[must_use]
    pub fn due_label(&self) -> String {
        self.due_date
            .map_or_else(|| "No due date".to_string(), |d| d.to_string())
    }

    /// Individual tags from the comma-separated column.
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Validated input for creating a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSignal {
    pub title: String,
    pub category: Option<String>,
    pub severity: Severity,
    pub owner: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub tags: Option<String>,
}

impl NewSignal {
    /// Build a new signal, trimming text and dropping empty optionals.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the title is empty.
    pub fn new(title: &str) -> crate::Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SignalError::validation("title", "cannot be empty"));
        }
        Ok(Self {
            title: title.to_string(),
            ..Self::default()
        })
    }
}

/// Field changes for an update.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalUpdate {
    pub title: Option<String>,
    pub category: Option<Option<String>>,
    pub severity: Option<Severity>,
    pub owner: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub source: Option<Option<String>>,
    pub tags: Option<Option<String>>,
    pub status: Option<Status>,
    pub closed_at: Option<Option<DateTime<Utc>>>,
    /// Text appended to notes on its own line.
    pub append_note: Option<String>,
}

impl SignalUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.severity.is_none()
            && self.owner.is_none()
            && self.due_date.is_none()
            && self.source.is_none()
            && self.tags.is_none()
            && self.status.is_none()
            && self.closed_at.is_none()
            && self.append_note.is_none()
    }

    /// Close the signal at `now`, optionally recording a note.
    #[must_use]
    pub fn close(now: DateTime<Utc>, note: Option<&str>) -> Self {
        Self {
            status: Some(Status::Closed),
            closed_at: Some(Some(now)),
            append_note: tagged_note("Closed", note),
            ..Self::default()
        }
    }

    /// Reopen the signal, clearing `closed_at`.
    #[must_use]
    pub fn reopen(note: Option<&str>) -> Self {
        Self {
            status: Some(Status::Open),
            closed_at: Some(None),
            append_note: tagged_note("Reopened", note),
            ..Self::default()
        }
    }
}

fn tagged_note(tag: &str, note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("[{tag}] {n}"))
}

/// Join an appended note onto existing notes.
#[must_use]
pub fn append_notes(existing: Option<&str>, addition: &str) -> String {
    match existing.filter(|e| !e.is_empty()) {
        Some(existing) => format!("{existing}\n{addition}"),
        None => addition.to_string(),
    }
}

/// Normalise a comma-separated tag list: trim entries, drop empties.
///
/// Returns `None` when nothing remains.
#[must_use]
pub fn normalize_tags(raw: &str) -> Option<String> {
    let tags: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

/// Trim optional text, mapping blank input to `None`.
#[must_use]
pub fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
