//! Markdown digest: snapshot counts, overdue, due soon, and recent signals.

use crate::format::markdown::bullet_list;
use crate::model::Signal;
use crate::report::{DueState, classify_due, signal_line, window_start};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest<'a> {
    pub days: i64,
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    /// Open signals due before today.
    pub overdue: Vec<&'a Signal>,
    /// Open signals due within `days` days (today included).
    pub due_soon: Vec<&'a Signal>,
    /// Signals of any status created within the trailing `days` days.
    pub recent: Vec<&'a Signal>,
}

/// Build a digest over `signals`, which keep their store order in each list.
#[must_use]
pub fn digest(signals: &[Signal], today: NaiveDate, days: i64) -> Digest<'_> {
    let open = signals.iter().filter(|s| s.is_open()).count();

    let mut overdue = Vec::new();
    let mut due_soon = Vec::new();
    for signal in signals.iter().filter(|s| s.is_open()) {
        match classify_due(signal.due_date, today, days) {
            DueState::Overdue => overdue.push(signal),
            DueState::DueSoon => due_soon.push(signal),
            DueState::DueLater | DueState::NoDueDate => {}
        }
    }

    let cutoff = window_start(today, days);
    let recent = signals
        .iter()
        .filter(|s| s.created_date().is_some_and(|d| d >= cutoff))
        .collect();

    Digest {
        days,
        total: signals.len(),
        open,
        closed: signals.len() - open,
        overdue,
        due_soon,
        recent,
    }
}

impl Digest<'_> {
    /// Render as Markdown; each section lists at most `limit` signals.
    #[must_use]
    pub fn render(&self, limit: usize) -> String {
        let section = |signals: &[&Signal]| -> Vec<String> {
            let items: Vec<String> = signals
                .iter()
                .take(limit)
                .map(|s| signal_line(s))
                .collect();
            bullet_list(&items, "None")
        };

        let mut lines = vec![
            "# Signal Digest".to_string(),
            String::new(),
            "## Snapshot".to_string(),
            format!("- Total signals: {}", self.total),
            format!("- Open: {}", self.open),
            format!("- Closed: {}", self.closed),
            format!("- Overdue (open): {}", self.overdue.len()),
            format!("- Due soon (next {} days): {}", self.days, self.due_soon.len()),
            String::new(),
            "## Overdue Signals".to_string(),
        ];
        lines.extend(section(&self.overdue));
        lines.push(String::new());
        lines.push("## Due Soon".to_string());
        lines.extend(section(&self.due_soon));
        lines.push(String::new());
        lines.push(format!("## Recent Signals (last {} days)", self.days));
        lines.extend(section(&self.recent));

        lines.join("\n")
    }
}
