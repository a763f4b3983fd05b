//! Open signals without recent updates.

use crate::format::{RenderFormat, Table};
use crate::model::Signal;
use crate::report::open_signals;
use crate::util::time::days_between;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleEntry<'a> {
    pub signal: &'a Signal,
    /// Days since the last update (creation when never updated).
    pub idle_days: i64,
}

/// Days since `signal` was last touched, if known.
#[must_use]
pub fn idle_days(signal: &Signal, today: NaiveDate) -> Option<i64> {
    signal.updated_date().map(|d| days_between(d, today))
}

/// Open signals idle for at least `days`, most idle first (ties by id).
#[must_use]
pub fn stale(signals: &[Signal], today: NaiveDate, days: i64) -> Vec<StaleEntry<'_>> {
    let mut entries: Vec<StaleEntry<'_>> = open_signals(signals)
        .into_iter()
        .filter_map(|signal| {
            idle_days(signal, today)
                .filter(|idle| *idle >= days)
                .map(|idle_days| StaleEntry { signal, idle_days })
        })
        .collect();
    entries.sort_by(|a, b| {
        b.idle_days
            .cmp(&a.idle_days)
            .then_with(|| a.signal.id.cmp(&b.signal.id))
    });
    entries
}

#[must_use]
pub fn to_table(entries: &[StaleEntry<'_>], limit: usize) -> Table {
    let mut table = Table::new(&["ID", "Title", "Owner", "Severity", "Last update", "Idle(d)"]);
    for entry in entries.iter().take(limit) {
        let signal = entry.signal;
        table.push_row(vec![
            signal.id.to_string(),
            signal.title.clone(),
            signal.owner_label().to_string(),
            signal.effective_severity().to_string(),
            signal
                .updated_date()
                .map(|d| d.to_string())
                .unwrap_or_default(),
            entry.idle_days.to_string(),
        ]);
    }
    table
}

#[must_use]
pub fn render(entries: &[StaleEntry<'_>], days: i64, limit: usize) -> String {
    format!(
        "Stale signals ({} not updated in {days}+ days)\n\n{}",
        entries.len(),
        to_table(entries, limit).render(RenderFormat::Table)
    )
}
