//! Recent activity counts and feed.

use crate::format::{RenderFormat, Table};
use crate::model::Signal;
use crate::report::{DueState, classify_due, heading, open_signals, window_start};
use crate::util::time::format_timestamp;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Which timestamp put a signal in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Created,
    Updated,
    Closed,
}

impl ActivityKind {
    /// Precedence on equal timestamps: closed, then created, then updated.
    /// A row written once has `updated_at == created_at` and reads as created.
    const fn tie_rank(self) -> u8 {
        match self {
            Self::Updated => 0,
            Self::Created => 1,
            Self::Closed => 2,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Closed => "closed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEvent<'a> {
    pub at: DateTime<Utc>,
    pub kind: ActivityKind,
    pub signal: &'a Signal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity<'a> {
    pub days: i64,
    pub created: usize,
    pub updated_or_closed: usize,
    pub closed: usize,
    pub open_overdue: usize,
    pub open_due_soon: usize,
    /// Most recent first, already truncated.
    pub feed: Vec<ActivityEvent<'a>>,
}

fn within(ts: Option<DateTime<Utc>>, cutoff: NaiveDate) -> Option<DateTime<Utc>> {
    ts.filter(|t| t.date_naive() >= cutoff)
}

/// Latest in-window timestamp of a signal, if any.
fn latest_event(signal: &Signal, cutoff: NaiveDate) -> Option<ActivityEvent<'_>> {
    [
        (within(signal.created_at, cutoff), ActivityKind::Created),
        (within(signal.updated_at, cutoff), ActivityKind::Updated),
        (within(signal.closed_at, cutoff), ActivityKind::Closed),
    ]
    .into_iter()
    .filter_map(|(at, kind)| at.map(|at| (at, kind)))
    .max_by_key(|&(at, kind)| (at, kind.tie_rank()))
    .map(|(at, kind)| ActivityEvent { at, kind, signal })
}

#[must_use]
pub fn activity(signals: &[Signal], today: NaiveDate, days: i64, limit: usize) -> Activity<'_> {
    let cutoff = window_start(today, days);

    let created = signals
        .iter()
        .filter(|s| within(s.created_at, cutoff).is_some())
        .count();
    let updated_or_closed = signals
        .iter()
        .filter(|s| within(s.updated_at, cutoff).or(within(s.closed_at, cutoff)).is_some())
        .count();
    let closed = signals
        .iter()
        .filter(|s| !s.is_open() && within(s.closed_at, cutoff).is_some())
        .count();

    let open = open_signals(signals);
    let due_states: Vec<DueState> = open
        .iter()
        .map(|s| classify_due(s.due_date, today, days))
        .collect();

    let mut feed: Vec<ActivityEvent<'_>> = signals
        .iter()
        .filter_map(|s| latest_event(s, cutoff))
        .collect();
    feed.sort_by(|a, b| b.at.cmp(&a.at).then_with(|| b.signal.id.cmp(&a.signal.id)));
    feed.truncate(limit);

    Activity {
        days,
        created,
        updated_or_closed,
        closed,
        open_overdue: due_states.iter().filter(|d| **d == DueState::Overdue).count(),
        open_due_soon: due_states.iter().filter(|d| **d == DueState::DueSoon).count(),
        feed,
    }
}

impl Activity<'_> {
    fn count_lines(&self) -> Vec<String> {
        vec![
            format!("Signals created: {}", self.created),
            format!("Signals updated/closed: {}", self.updated_or_closed),
            format!("Signals closed: {}", self.closed),
            format!("Open overdue: {}", self.open_overdue),
            format!(
                "Open due soon (next {} days): {}",
                self.days, self.open_due_soon
            ),
        ]
    }

    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(&["When", "Event", "ID", "Title", "Status", "Owner"]);
        for event in &self.feed {
            table.push_row(vec![
                format_timestamp(&event.at),
                event.kind.to_string(),
                event.signal.id.to_string(),
                event.signal.title.clone(),
                event.signal.status.as_str().to_string(),
                event.signal.owner_label().to_string(),
            ]);
        }
        table
    }

    #[must_use]
    pub fn render(&self, format: RenderFormat) -> String {
        let title = format!("Signal Activity (last {} days)", self.days);
        let empty = format!("No activity in the last {} days.", self.days);
        match format {
            RenderFormat::Csv => self.to_table().render(RenderFormat::Csv),
            RenderFormat::Markdown => {
                let counts: Vec<String> =
                    self.count_lines().into_iter().map(|l| format!("- {l}")).collect();
                let feed = if self.feed.is_empty() {
                    format!("- {empty}")
                } else {
                    self.to_table().render(RenderFormat::Markdown)
                };
                format!(
                    "# {title}\n\n## Snapshot\n{}\n\n## Recent activity\n{feed}",
                    counts.join("\n")
                )
            }
            RenderFormat::Table => {
                let mut lines = vec![heading(&title)];
                lines.extend(self.count_lines());
                lines.push(String::new());
                if self.feed.is_empty() {
                    lines.push(empty);
                } else {
                    lines.push(self.to_table().render(RenderFormat::Table));
                }
                lines.join("\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::report::fixtures::{days_ago, due_in, signal, today};

    fn scenario() -> Vec<Signal> {
        let mut fresh = signal(1);
        fresh.created_at = Some(days_ago(2));
        fresh.updated_at = Some(days_ago(2));

        let mut overdue = signal(2);
        overdue.created_at = Some(days_ago(3));
        overdue.updated_at = Some(days_ago(1));
        overdue.due_date = due_in(-1);

        let mut closed = signal(3);
        closed.status = Status::Closed;
        closed.created_at = Some(days_ago(30));
        closed.closed_at = Some(days_ago(1));
        closed.updated_at = Some(days_ago(1));

        let mut quiet = signal(4);
        quiet.created_at = Some(days_ago(40));
        quiet.updated_at = Some(days_ago(40));
        quiet.due_date = due_in(3);

        vec![fresh, overdue, closed, quiet]
    }

    #[test]
    fn counts_match_scenario() {
        let signals = scenario();
        let report = activity(&signals, today(), 7, 10);
        assert_eq!(report.created, 2);
        assert_eq!(report.updated_or_closed, 3);
        assert_eq!(report.closed, 1);
        assert_eq!(report.open_overdue, 1);
        assert_eq!(report.open_due_soon, 1);
    }

    #[test]
    fn feed_order_and_kinds() {
        let signals = scenario();
        let report = activity(&signals, today(), 7, 10);
        let feed: Vec<(i64, ActivityKind)> =
            report.feed.iter().map(|e| (e.signal.id, e.kind)).collect();
        assert_eq!(
            feed,
            vec![
                (3, ActivityKind::Closed),
                (2, ActivityKind::Updated),
                (1, ActivityKind::Created),
            ]
        );

        let limited = activity(&signals, today(), 7, 1);
        assert_eq!(limited.feed.len(), 1);
        assert_eq!(limited.created, 2);
    }

    #[test]
    fn untouched_signal_reads_as_created() {
        let signals = [signal(1)];
        let report = activity(&signals, today(), 7, 10);
        assert_eq!(report.feed[0].kind, ActivityKind::Created);
    }

    #[test]
    fn equal_instants_prefer_closed_then_created() {
        let mut closed_at_once = signal(1);
        closed_at_once.status = Status::Closed;
        closed_at_once.closed_at = closed_at_once.created_at;

        let mut edited = signal(2);
        edited.created_at = Some(days_ago(3));
        edited.updated_at = Some(days_ago(1));
        edited.closed_at = None;

        let signals = [closed_at_once, edited];
        let report = activity(&signals, today(), 7, 10);
        let kinds: Vec<(i64, ActivityKind)> =
            report.feed.iter().map(|e| (e.signal.id, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![(1, ActivityKind::Closed), (2, ActivityKind::Updated)]
        );
    }

    #[test]
    fn render_text_and_empty() {
        let signals = scenario();
        let text = activity(&signals, today(), 7, 10).render(RenderFormat::Table);
        assert!(text.contains("Signals updated/closed: 3"));
        assert!(text.contains("Open due soon (next 7 days): 1"));
        assert!(text.contains("When"));

        let empty = activity(&[], today(), 7, 10);
        assert!(
            empty
                .render(RenderFormat::Table)
                .contains("No activity in the last 7 days.")
        );
        let md = empty.render(RenderFormat::Markdown);
        assert!(md.contains("## Snapshot\n- Signals created: 0"));
        assert!(md.contains("## Recent activity\n- No activity in the last 7 days."));
    }
}
