//! Due-date calendar of open signals.
//!
//! Buckets, in display order: overdue, due today, one bucket per Monday-keyed
//! week for dates inside the horizon, beyond the horizon, and no due date.

use crate::format::markdown::bullet_list;
use crate::format::{RenderFormat, Table};
use crate::model::Signal;
use crate::report::{heading, open_signals};
use crate::util::time::{days_between, week_start};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum BucketKind {
    Overdue,
    DueToday,
    /// Keyed by the Monday on or before the due dates it holds.
    Week(NaiveDate),
    BeyondHorizon,
    NoDueDate,
}

impl BucketKind {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Overdue => "Overdue".to_string(),
            Self::DueToday => "Due today".to_string(),
            Self::Week(monday) => format!("Week of {monday}"),
            Self::BeyondHorizon => "Later".to_string(),
            Self::NoDueDate => "No due date".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarBucket<'a> {
    pub kind: BucketKind,
    /// Ordered by due date ascending, then id.
    pub signals: Vec<&'a Signal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calendar<'a> {
    pub horizon: i64,
    /// Non-empty buckets in display order.
    pub buckets: Vec<CalendarBucket<'a>>,
}

/// Bucket for one due date.
#[must_use]
pub fn bucket_for(due: Option<NaiveDate>, today: NaiveDate, horizon: i64) -> BucketKind {
    match due {
        None => BucketKind::NoDueDate,
        Some(d) if d < today => BucketKind::Overdue,
        Some(d) if d == today => BucketKind::DueToday,
        Some(d) if days_between(today, d) <= horizon => BucketKind::Week(week_start(d)),
        Some(_) => BucketKind::BeyondHorizon,
    }
}

#[must_use]
pub fn calendar(signals: &[Signal], today: NaiveDate, horizon: i64) -> Calendar<'_> {
    let mut grouped: BTreeMap<BucketKind, Vec<&Signal>> = BTreeMap::new();
    for signal in open_signals(signals) {
        grouped
            .entry(bucket_for(signal.due_date, today, horizon))
            .or_default()
            .push(signal);
    }

    let buckets = grouped
        .into_iter()
        .map(|(kind, mut signals)| {
            signals.sort_by_key(|s| (s.due_date.unwrap_or(NaiveDate::MAX), s.id));
            CalendarBucket { kind, signals }
        })
        .collect();

    Calendar { horizon, buckets }
}

impl Calendar<'_> {
    #[must_use]
    pub fn count(&self, kind: BucketKind) -> usize {
        self.buckets
            .iter()
            .find(|b| b.kind == kind)
            .map_or(0, |b| b.signals.len())
    }

    /// One row per signal, each bucket truncated to `limit`.
    #[must_use]
    pub fn to_table(&self, limit: usize) -> Table {
        let mut table = Table::new(&["Bucket", "ID", "Title", "Severity", "Owner", "Due"]);
        for bucket in &self.buckets {
            for signal in bucket.signals.iter().take(limit) {
                table.push_row(vec![
                    bucket.kind.label(),
                    signal.id.to_string(),
                    signal.title.clone(),
                    signal.effective_severity().to_string(),
                    signal.owner_label().to_string(),
                    signal.due_label(),
                ]);
            }
        }
        table
    }

    fn bucket_counts(&self) -> Vec<String> {
        self.buckets
            .iter()
            .map(|b| format!("{}: {}", b.kind.label(), b.signals.len()))
            .collect()
    }

    #[must_use]
    pub fn render(&self, format: RenderFormat, limit: usize) -> String {
        let title = format!("Due Calendar (next {} days)", self.horizon);
        let table = self.to_table(limit);
        match format {
            RenderFormat::Table => {
                let mut lines = vec![heading(&title)];
                lines.extend(self.bucket_counts());
                lines.push(String::new());
                lines.push(table.render(format));
                lines.join("\n")
            }
            RenderFormat::Markdown => {
                let mut lines = vec![format!("# {title}"), String::new(), "## Buckets".to_string()];
                lines.extend(bullet_list(&self.bucket_counts(), "None"));
                lines.push(String::new());
                lines.push(table.render(format));
                lines.join("\n")
            }
            RenderFormat::Csv => table.render(format),
        }
    }
}
