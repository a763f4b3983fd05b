//! Open workload per owner.

use crate::format::{RenderFormat, Table};
use crate::model::Signal;
use crate::report::{DueState, classify_due, open_signals};
use crate::util::time::round1;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerLoad {
    /// Owner name, or `Unassigned`.
    pub owner: String,
    pub open: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub due_later: usize,
    pub no_due_date: usize,
    /// Mean age in days, rounded to one decimal.
    pub avg_age_days: f64,
    pub high_critical: usize,
}

/// Group open signals by owner.
///
/// Sorted by descending (overdue, open, high/critical), then owner name.
#[must_use]
pub fn workload(signals: &[Signal], today: NaiveDate, window: i64) -> Vec<OwnerLoad> {
    let mut groups: HashMap<&str, Vec<&Signal>> = HashMap::new();
    for signal in open_signals(signals) {
        groups.entry(signal.owner_label()).or_default().push(signal);
    }

    let mut loads: Vec<OwnerLoad> = groups
        .into_iter()
        .map(|(owner, members)| {
            let mut load = OwnerLoad {
                owner: owner.to_string(),
                open: members.len(),
                overdue: 0,
                due_soon: 0,
                due_later: 0,
                no_due_date: 0,
                avg_age_days: 0.0,
                high_critical: 0,
            };
            let mut total_age = 0_i64;
            let mut aged = 0_usize;
            for signal in &members {
                match classify_due(signal.due_date, today, window) {
                    DueState::Overdue => load.overdue += 1,
                    DueState::DueSoon => load.due_soon += 1,
                    DueState::DueLater => load.due_later += 1,
                    DueState::NoDueDate => load.no_due_date += 1,
                }
                if signal.effective_severity().is_high_or_critical() {
                    load.high_critical += 1;
                }
                if signal.created_at.is_some() {
                    total_age += signal.age_days(today);
                    aged += 1;
                }
            }
            if aged > 0 {
                load.avg_age_days = round1(total_age as f64 / aged as f64);
            }
            load
        })
        .collect();

    loads.sort_by(|a, b| {
        (b.overdue, b.open, b.high_critical)
            .cmp(&(a.overdue, a.open, a.high_critical))
            .then_with(|| a.owner.cmp(&b.owner))
    });
    loads
}

#[must_use]
pub fn to_table(loads: &[OwnerLoad]) -> Table {
    let mut table = Table::new(&[
        "Owner",
        "Open",
        "Overdue",
        "Due soon",
        "Due later",
        "No due",
        "Avg age (d)",
        "High/Critical",
    ]);
    for load in loads {
        table.push_row(vec![
            load.owner.clone(),
            load.open.to_string(),
            load.overdue.to_string(),
            load.due_soon.to_string(),
            load.due_later.to_string(),
            load.no_due_date.to_string(),
            format!("{:.1}", load.avg_age_days),
            load.high_critical.to_string(),
        ]);
    }
    table
}

#[must_use]
pub fn render(loads: &[OwnerLoad], window: i64, format: RenderFormat) -> String {
    let title = format!("Workload by Owner (due soon = next {window} days)");
    let table = to_table(loads).render(format);
    match format {
        RenderFormat::Table => format!("{title}\n\n{table}"),
        RenderFormat::Markdown => format!("# {title}\n\n{table}"),
        RenderFormat::Csv => table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, Status};
    use crate::report::fixtures::{days_ago, due_in, signal, today};

    fn owned(id: i64, owner: Option<&str>) -> Signal {
        let mut s = signal(id);
        s.owner = owner.map(ToString::to_string);
        s
    }

    #[test]
    fn buckets_partition_open_signals() {
        let mut a = owned(1, Some("Leah"));
        a.due_date = due_in(-1);
        let mut b = owned(2, Some("Leah"));
        b.due_date = due_in(3);
        let mut c = owned(3, Some("Leah"));
        c.due_date = due_in(40);
        let d = owned(4, Some("Leah"));
        let mut closed = owned(5, Some("Leah"));
        closed.status = Status::Closed;

        let signals = vec![a, b, c, d, closed];
        let loads = workload(&signals, today(), 14);
        assert_eq!(loads.len(), 1);
        let leah = &loads[0];
        assert_eq!(leah.open, 4);
        assert_eq!(
            leah.overdue + leah.due_soon + leah.due_later + leah.no_due_date,
            leah.open
        );
        assert_eq!((leah.overdue, leah.due_soon, leah.due_later, leah.no_due_date), (1, 1, 1, 1));
    }

    #[test]
    fn average_age_is_rounded_mean() {
        let mut a = owned(1, Some("Diego"));
        a.created_at = Some(days_ago(1));
        let mut b = owned(2, Some("Diego"));
        b.created_at = Some(days_ago(2));
        let mut c = owned(3, Some("Diego"));
        c.created_at = Some(days_ago(2));

        let signals = vec![a, b, c];
        let loads = workload(&signals, today(), 14);
        assert!((loads[0].avg_age_days - 1.7).abs() < f64::EPSILON);
    }

    #[test]
    fn average_age_skips_unknown_creation() {
        let mut dated = owned(1, Some("Diego"));
        dated.created_at = Some(days_ago(4));
        let mut undated = owned(2, Some("Diego"));
        undated.created_at = None;
        let mut only_undated = owned(3, Some("Priya"));
        only_undated.created_at = None;

        let signals = vec![dated, undated, only_undated];
        let loads = workload(&signals, today(), 14);
        let diego = loads.iter().find(|l| l.owner == "Diego").unwrap();
        assert_eq!(diego.open, 2);
        assert!((diego.avg_age_days - 4.0).abs() < f64::EPSILON);
        let priya = loads.iter().find(|l| l.owner == "Priya").unwrap();
        assert!(priya.avg_age_days.abs() < f64::EPSILON);
    }

    #[test]
    fn sort_order_and_unassigned_label() {
        let mut overdue = owned(1, Some("Zoe"));
        overdue.due_date = due_in(-3);
        let busy_a = owned(2, None);
        let busy_b = owned(3, None);
        let mut critical = owned(4, Some("Avery"));
        critical.severity = Some(Severity::Critical);
        let plain = owned(5, Some("Blake"));

        let signals = vec![overdue, busy_a, busy_b, critical, plain];
        let owners: Vec<String> = workload(&signals, today(), 14)
            .into_iter()
            .map(|l| l.owner)
            .collect();
        assert_eq!(owners, vec!["Zoe", "Unassigned", "Avery", "Blake"]);
    }

    #[test]
    fn render_formats() {
        let signals = vec![owned(1, Some("Leah"))];
        let loads = workload(&signals, today(), 14);
        let md = render(&loads, 14, RenderFormat::Markdown);
        assert!(md.starts_with("# Workload by Owner"));
        assert!(md.contains("| Leah | 1 | 0 | 0 | 0 | 1 | 0.0 | 0 |"));
        let csv = render(&loads, 14, RenderFormat::Csv);
        assert!(csv.starts_with("Owner,Open,Overdue"));
    }
}
