//! Weekly created/closed trend.

use crate::format::{RenderFormat, Table};
use crate::model::Signal;
use crate::util::time::week_start;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendWeek {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub created: usize,
    pub closed: usize,
    pub net: i64,
    /// Signals created by the week's Sunday and not yet closed then.
    pub open_at_end: usize,
}

impl TrendWeek {
    #[must_use]
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }
}

fn in_week(date: Option<NaiveDate>, start: NaiveDate, end: NaiveDate) -> bool {
    date.is_some_and(|d| d >= start && d <= end)
}

fn open_at(signal: &Signal, end: NaiveDate) -> bool {
    let Some(created) = signal.created_date() else {
        return false;
    };
    if created > end {
        return false;
    }
    match signal.closed_date() {
        Some(closed) => closed > end,
        // Closed with no recorded time counts as closed throughout.
        None => signal.is_open(),
    }
}

fn signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// `weeks` Monday-anchored buckets ending with the week containing `as_of`,
/// oldest first. At least one week is always produced.
#[must_use]
pub fn trend(signals: &[Signal], as_of: NaiveDate, weeks: usize) -> Vec<TrendWeek> {
    let last = week_start(as_of);
    let weeks = i64::try_from(weeks.max(1)).unwrap_or(i64::MAX);

    (0..weeks)
        .rev()
        .map(|back| {
            let start = last - Duration::weeks(back);
            let end = start + Duration::days(6);
            let created = signals
                .iter()
                .filter(|s| in_week(s.created_date(), start, end))
                .count();
            let closed = signals
                .iter()
                .filter(|s| in_week(s.closed_date(), start, end))
                .count();
            TrendWeek {
                week_start: start,
                created,
                closed,
                net: signed(created) - signed(closed),
                open_at_end: signals.iter().filter(|s| open_at(s, end)).count(),
            }
        })
        .collect()
}

#[must_use]
pub fn to_table(weeks: &[TrendWeek]) -> Table {
    let mut table = Table::new(&["Week", "Created", "Closed", "Net", "Open at end"]);
    for week in weeks {
        table.push_row(vec![
            week.week_start.to_string(),
            week.created.to_string(),
            week.closed.to_string(),
            week.net.to_string(),
            week.open_at_end.to_string(),
        ]);
    }
    table
}

#[must_use]
pub fn render(weeks: &[TrendWeek], as_of: NaiveDate, format: RenderFormat) -> String {
    let title = format!("Signal Trend ({} weeks ending {as_of})", weeks.len());
    let table = to_table(weeks).render(format);
    match format {
        RenderFormat::Table => format!("{title}\n\n{table}"),
        RenderFormat::Markdown => format!("# {title}\n\n{table}"),
        RenderFormat::Csv => table,
    }
}
