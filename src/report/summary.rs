//! Count rollups by status, category, severity and owner.

use crate::model::Signal;
use crate::report::heading;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySection {
    pub label: &'static str,
    pub counts: Vec<(String, usize)>,
}

fn rollup<F>(signals: &[Signal], label: &'static str, key: F) -> SummarySection
where
    F: Fn(&Signal) -> Option<String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for signal in signals {
        let value = key(signal).unwrap_or_else(|| "Unspecified".to_string());
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    SummarySection { label, counts }
}

#[must_use]
pub fn summary(signals: &[Signal]) -> Vec<SummarySection> {
    vec![
        rollup(signals, "By status", |s| Some(s.status.as_str().to_string())),
        rollup(signals, "By category", |s| s.category.clone()),
        rollup(signals, "By severity", |s| {
            s.severity.as_ref().map(ToString::to_string)
        }),
        rollup(signals, "By owner", |s| s.owner.clone()),
    ]
}

#[must_use]
pub fn render(sections: &[SummarySection]) -> String {
    sections
        .iter()
        .map(|section| {
            let mut lines = vec![heading(section.label)];
            if section.counts.is_empty() {
                lines.push("(none)".to_string());
            }
            for (label, count) in &section.counts {
                lines.push(format!("{label}: {count}"));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
