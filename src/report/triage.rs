//! Triage scoring.
//!
//! Score = severity weight x 10, plus adjustments:
//!
//! | condition                         | points              | reason        |
//! |-----------------------------------|---------------------|---------------|
//! | due before today                  | +15                 | `overdue`     |
//! | due within the window             | +8                  | `due soon`    |
//! | no due date                       | +2                  | `no due date` |
//! | no owner                          | +3                  | `unassigned`  |
//! | 14+ days old                      | +min(12, age / 7)   | `aging`       |
//!
//! A signal with no reasons is shown as `recent`.

use crate::format::Table;
use crate::model::Signal;
use crate::report::{DueState, classify_due, heading, open_signals};
use chrono::NaiveDate;
use serde::Serialize;

/// Age at which the aging bonus starts.
pub const AGING_THRESHOLD_DAYS: i64 = 14;

/// Upper bound of the aging bonus.
pub const MAX_AGING_BONUS: i64 = 12;

pub const REASON_OVERDUE: &str = "overdue";
pub const REASON_DUE_SOON: &str = "due soon";
pub const REASON_NO_DUE_DATE: &str = "no due date";
pub const REASON_UNASSIGNED: &str = "unassigned";
pub const REASON_AGING: &str = "aging";

/// One scored signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageEntry<'a> {
    pub signal: &'a Signal,
    pub score: i64,
    pub age_days: i64,
    pub reasons: Vec<&'static str>,
}

impl TriageEntry<'_> {
    /// Reasons joined with `, `, or `recent` when there are none.
    #[must_use]
    pub fn reason_label(&self) -> String {
        if self.reasons.is_empty() {
            "recent".to_string()
        } else {
            self.reasons.join(", ")
        }
    }

    #[must_use]
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reasons.iter().any(|r| *r == reason)
    }
}

/// Score a single signal.
#[must_use]
pub fn score_signal(signal: &Signal, today: NaiveDate, window: i64) -> TriageEntry<'_> {
    let age_days = signal.age_days(today);
    let mut score = signal.effective_severity().weight() * 10;
    let mut reasons = Vec::new();

    match classify_due(signal.due_date, today, window) {
        DueState::Overdue => {
            score += 15;
            reasons.push(REASON_OVERDUE);
        }
        DueState::DueSoon => {
            score += 8;
            reasons.push(REASON_DUE_SOON);
        }
        DueState::NoDueDate => {
            score += 2;
            reasons.push(REASON_NO_DUE_DATE);
        }
        DueState::DueLater => {}
    }

    if signal.owner.is_none() {
        score += 3;
        reasons.push(REASON_UNASSIGNED);
    }

    if age_days >= AGING_THRESHOLD_DAYS {
        score += (age_days / 7).min(MAX_AGING_BONUS);
        reasons.push(REASON_AGING);
    }

    TriageEntry {
        signal,
        score,
        age_days,
        reasons,
    }
}

/// Aggregate reason counts over the whole ranked set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriageCounts {
    pub overdue: usize,
    pub due_soon: usize,
    pub unassigned: usize,
    pub no_due_date: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageReport<'a> {
    pub window: i64,
    pub entries: Vec<TriageEntry<'a>>,
    pub counts: TriageCounts,
}

/// Rank open signals by descending (score, age).
///
/// The sort is stable, so remaining ties keep input order.
#[must_use]
pub fn triage(signals: &[Signal], today: NaiveDate, window: i64) -> TriageReport<'_> {
    let mut entries: Vec<TriageEntry<'_>> = open_signals(signals)
        .into_iter()
        .map(|signal| score_signal(signal, today, window))
        .collect();
    entries.sort_by(|a, b| (b.score, b.age_days).cmp(&(a.score, a.age_days)));

    let count = |reason: &str| entries.iter().filter(|e| e.has_reason(reason)).count();
    let counts = TriageCounts {
        overdue: count(REASON_OVERDUE),
        due_soon: count(REASON_DUE_SOON),
        unassigned: count(REASON_UNASSIGNED),
        no_due_date: count(REASON_NO_DUE_DATE),
    };

    TriageReport {
        window,
        entries,
        counts,
    }
}

impl TriageReport<'_> {
    /// Ranked table of the first `limit` entries.
    #[must_use]
    pub fn to_table(&self, limit: usize) -> Table {
        let mut table = Table::new(&[
            "ID", "Title", "Severity", "Owner", "Due", "Age(d)", "Score", "Reason",
        ]);
        for entry in self.entries.iter().take(limit) {
            let signal = entry.signal;
            table.push_row(vec![
                signal.id.to_string(),
                signal.title.clone(),
                signal.effective_severity().to_string(),
                signal.owner_label().to_string(),
                signal.due_label(),
                entry.age_days.to_string(),
                entry.score.to_string(),
                entry.reason_label(),
            ]);
        }
        table
    }

    /// Snapshot counts followed by the ranked table.
    #[must_use]
    pub fn render(&self, limit: usize) -> String {
        let mut lines = vec![
            heading("Triage Snapshot"),
            format!("Open signals: {}", self.entries.len()),
            format!("Overdue: {}", self.counts.overdue),
            format!("Due soon (next {} days): {}", self.window, self.counts.due_soon),
            format!("Unassigned: {}", self.counts.unassigned),
            format!("No due date: {}", self.counts.no_due_date),
            String::new(),
        ];
        lines.push(self.to_table(limit).render(crate::format::RenderFormat::Table));
        lines.join("\n")
    }
}
