//! Operational metrics over the whole table.

use crate::model::{Severity, Signal};
use crate::report::stale::idle_days;
use crate::report::{DueState, classify_due, heading, open_signals};
use crate::util::time::{fractional_days, round1};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub unassigned: usize,
    /// Open signals not updated in `stale_days` or more.
    pub stale: usize,
    pub window: i64,
    pub stale_days: i64,
    pub open_age_mean: Option<f64>,
    pub open_age_median: Option<f64>,
    pub cycle_mean: Option<f64>,
    pub cycle_median: Option<f64>,
    /// Open signals per severity label.
    pub severity_mix: Vec<(String, usize)>,
    /// `(id, title, age_days)` of the oldest open signals.
    pub oldest_open: Vec<(i64, String, i64)>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(f64::midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Severity histogram: the four levels first, then other labels, then `unspecified`.
fn severity_mix(open: &[&Signal]) -> Vec<(String, usize)> {
    let mut known = [0_usize; 4];
    let mut custom: BTreeMap<String, usize> = BTreeMap::new();
    let mut unspecified = 0;
    for signal in open {
        match &signal.severity {
            None => unspecified += 1,
            Some(Severity::Custom(label)) => *custom.entry(label.clone()).or_default() += 1,
            Some(level) => {
                if let Some(i) = Severity::LEVELS.iter().position(|l| l == level) {
                    known[i] += 1;
                }
            }
        }
    }

    let mut mix: Vec<(String, usize)> = Severity::LEVELS
        .iter()
        .zip(known)
        .map(|(level, count)| (level.to_string(), count))
        .collect();
    mix.extend(custom);
    mix.push(("unspecified".to_string(), unspecified));
    mix
}

#[must_use]
pub fn metrics(
    signals: &[Signal],
    today: NaiveDate,
    window: i64,
    stale_days: i64,
    limit: usize,
) -> Metrics {
    let open = open_signals(signals);

    let mut overdue = 0;
    let mut due_soon = 0;
    for signal in &open {
        match classify_due(signal.due_date, today, window) {
            DueState::Overdue => overdue += 1,
            DueState::DueSoon => due_soon += 1,
            DueState::DueLater | DueState::NoDueDate => {}
        }
    }

    let ages: Vec<f64> = open
        .iter()
        .filter(|s| s.created_at.is_some())
        .map(|s| s.age_days(today) as f64)
        .collect();
    let cycles: Vec<f64> = signals
        .iter()
        .filter(|s| !s.is_open())
        .filter_map(|s| Some(fractional_days(s.created_at?, s.closed_at?)))
        .collect();

    let mut oldest: Vec<&Signal> = open.clone();
    oldest.sort_by(|a, b| {
        b.age_days(today)
            .cmp(&a.age_days(today))
            .then_with(|| a.id.cmp(&b.id))
    });

    Metrics {
        total: signals.len(),
        open: open.len(),
        closed: signals.len() - open.len(),
        overdue,
        due_soon,
        unassigned: open.iter().filter(|s| s.owner.is_none()).count(),
        stale: open
            .iter()
            .filter(|s| idle_days(s, today).is_some_and(|idle| idle >= stale_days))
            .count(),
        window,
        stale_days,
        open_age_mean: mean(&ages).map(round1),
        open_age_median: median(&ages).map(round1),
        cycle_mean: mean(&cycles).map(round1),
        cycle_median: median(&cycles).map(round1),
        severity_mix: severity_mix(&open),
        oldest_open: oldest
            .into_iter()
            .take(limit)
            .map(|s| (s.id, s.title.clone(), s.age_days(today)))
            .collect(),
    }
}

fn days_label(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1} days"))
}

impl Metrics {
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![
            heading("Signal Metrics"),
            format!("Total signals: {}", self.total),
            format!("Open: {}", self.open),
            format!("Closed: {}", self.closed),
            format!("Overdue: {}", self.overdue),
            format!("Due soon (next {} days): {}", self.window, self.due_soon),
            format!("Unassigned: {}", self.unassigned),
            format!(
                "Stale (no update in {}+ days): {}",
                self.stale_days, self.stale
            ),
            String::new(),
            format!("Open age mean: {}", days_label(self.open_age_mean)),
            format!("Open age median: {}", days_label(self.open_age_median)),
            format!("Cycle time mean: {}", days_label(self.cycle_mean)),
            format!("Cycle time median: {}", days_label(self.cycle_median)),
            String::new(),
            "Open by severity:".to_string(),
        ];
        for (label, count) in &self.severity_mix {
            lines.push(format!("  {label}: {count}"));
        }
        lines.push(String::new());
        lines.push("Oldest open signals:".to_string());
        if self.oldest_open.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (id, title, age) in &self.oldest_open {
            lines.push(format!("  [{id}] {title} ({age}d)"));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::report::fixtures::{days_ago, due_in, signal, today};
    use chrono::Duration;

    #[test]
    fn counts_and_averages() {
        let mut a = signal(1);
        a.created_at = Some(days_ago(10));
        a.updated_at = Some(days_ago(20));
        a.due_date = due_in(-1);
        let mut b = signal(2);
        b.created_at = Some(days_ago(4));
        b.owner = None;
        b.due_date = due_in(2);
        let mut c = signal(3);
        c.created_at = Some(days_ago(1));
        c.severity = None;
        let mut closed = signal(4);
        closed.status = Status::Closed;
        closed.created_at = Some(days_ago(6));
        closed.closed_at = Some(days_ago(6) + Duration::hours(36));

        let signals = vec![a, b, c, closed];
        let m = metrics(&signals, today(), 7, 14, 2);

        assert_eq!((m.total, m.open, m.closed), (4, 3, 1));
        assert_eq!((m.overdue, m.due_soon, m.unassigned, m.stale), (1, 1, 1, 1));
        assert_eq!(m.open_age_mean, Some(5.0));
        assert_eq!(m.open_age_median, Some(4.0));
        assert_eq!(m.cycle_mean, Some(1.5));
        assert_eq!(m.cycle_median, Some(1.5));
        assert_eq!(
            m.oldest_open,
            vec![(1, "Signal 1".to_string(), 10), (2, "Signal 2".to_string(), 4)]
        );
    }

    #[test]
    fn severity_mix_order() {
        let mut custom = signal(1);
        custom.severity = Some(Severity::Custom("urgent".to_string()));
        let mut critical = signal(2);
        critical.severity = Some(Severity::Critical);
        let mut none = signal(3);
        none.severity = None;

        let signals = vec![custom, critical, none];
        let mix = metrics(&signals, today(), 7, 14, 5).severity_mix;
        let labels: Vec<&str> = mix.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            vec!["critical", "high", "medium", "low", "urgent", "unspecified"]
        );
        assert_eq!(mix[0].1, 1);
        assert_eq!(mix[4].1, 1);
        assert_eq!(mix[5].1, 1);
    }

    #[test]
    fn empty_input_renders_na() {
        let m = metrics(&[], today(), 7, 14, 5);
        let text = m.render();
        assert!(text.contains("Total signals: 0"));
        assert!(text.contains("Open age mean: n/a"));
        assert!(text.contains("Cycle time median: n/a"));
        assert!(text.contains("Oldest open signals:\n  (none)"));
    }

    #[test]
    fn median_of_even_count() {
        assert_eq!(median(&[1.0, 4.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
