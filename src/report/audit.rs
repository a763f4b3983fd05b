//! Data-quality audit over open signals.

use crate::model::Signal;
use crate::report::{heading, open_signals};
use chrono::NaiveDate;
use serde::Serialize;

/// An independent data-quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditCheck {
    MissingOwner,
    MissingDueDate,
    MissingCategory,
    MissingSeverity,
    MissingTags,
    MissingSource,
    Aging,
    Overdue,
}

impl AuditCheck {
    pub const ALL: [Self; 8] = [
        Self::MissingOwner,
        Self::MissingDueDate,
        Self::MissingCategory,
        Self::MissingSeverity,
        Self::MissingTags,
        Self::MissingSource,
        Self::Aging,
        Self::Overdue,
    ];

    #[must_use]
    pub fn label(self, stale_days: i64) -> String {
        match self {
            Self::MissingOwner => "Missing owner".to_string(),
            Self::MissingDueDate => "Missing due date".to_string(),
            Self::MissingCategory => "Missing category".to_string(),
            Self::MissingSeverity => "Missing severity".to_string(),
            Self::MissingTags => "Missing tags".to_string(),
            Self::MissingSource => "Missing source".to_string(),
            Self::Aging => format!("Aging ({stale_days}+ days old)"),
            Self::Overdue => "Overdue".to_string(),
        }
    }

    #[must_use]
    pub fn matches(self, signal: &Signal, today: NaiveDate, stale_days: i64) -> bool {
        match self {
            Self::MissingOwner => signal.owner.is_none(),
            Self::MissingDueDate => signal.due_date.is_none(),
            Self::MissingCategory => signal.category.is_none(),
            Self::MissingSeverity => signal.severity.is_none(),
            Self::MissingTags => signal.tag_list().is_empty(),
            Self::MissingSource => signal.source.is_none(),
            Self::Aging => signal.age_days(today) >= stale_days,
            Self::Overdue => signal.due_date.is_some_and(|d| d < today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFinding<'a> {
    pub check: AuditCheck,
    pub signals: Vec<&'a Signal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Audit<'a> {
    pub open: usize,
    pub stale_days: i64,
    /// One finding per check, in [`AuditCheck::ALL`] order.
    pub findings: Vec<AuditFinding<'a>>,
}

#[must_use]
pub fn audit(signals: &[Signal], today: NaiveDate, stale_days: i64) -> Audit<'_> {
    let open = open_signals(signals);
    let findings = AuditCheck::ALL
        .iter()
        .map(|check| AuditFinding {
            check: *check,
            signals: open
                .iter()
                .copied()
                .filter(|s| check.matches(s, today, stale_days))
                .collect(),
        })
        .collect();

    Audit {
        open: open.len(),
        stale_days,
        findings,
    }
}

impl Audit<'_> {
    #[must_use]
    pub fn count(&self, check: AuditCheck) -> usize {
        self.findings
            .iter()
            .find(|f| f.check == check)
            .map_or(0, |f| f.signals.len())
    }

    /// Counts per check, each followed by up to `limit` examples.
    #[must_use]
    pub fn render(&self, limit: usize) -> String {
        let mut lines = vec![
            heading("Data Quality Audit"),
            format!("Open signals: {}", self.open),
        ];
        for finding in &self.findings {
            lines.push(String::new());
            lines.push(format!(
                "{}: {}",
                finding.check.label(self.stale_days),
                finding.signals.len()
            ));
            for signal in finding.signals.iter().take(limit) {
                lines.push(format!("  - [{}] {}", signal.id, signal.title));
            }
        }
        lines.join("\n")
    }
}
