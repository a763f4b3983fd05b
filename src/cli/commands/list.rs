//! List command implementation.

use crate::cli::commands::{CommandContext, parse_severity, parse_status, print_json};
use crate::cli::{FilterArgs, ListArgs};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::{RenderFormat, Table};
use crate::model::Signal;
use crate::storage::SignalFilter;

/// Build a store filter from shared CLI filter flags.
///
/// # Errors
///
/// Returns an error for an unknown status or severity.
pub fn build_filter(status: Option<&str>, args: &FilterArgs) -> Result<SignalFilter> {
    Ok(SignalFilter {
        status: parse_status(status)?,
        category: args.category.clone(),
        owner: args.owner.clone(),
        severity: parse_severity(args.severity.as_deref())?,
        search: args.search.clone(),
        limit: args.limit.filter(|l| *l > 0),
    })
}

fn to_table(signals: &[Signal]) -> Table {
    let mut table = Table::new(&[
        "ID", "Title", "Category", "Severity", "Owner", "Due", "Status", "Tags",
    ]);
    for signal in signals {
        table.push_row(vec![
            signal.id.to_string(),
            signal.title.clone(),
            signal.category.clone().unwrap_or_default(),
            signal
                .severity
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            signal.owner.clone().unwrap_or_default(),
            signal.due_date.map(|d| d.to_string()).unwrap_or_default(),
            signal.status.to_string(),
            signal.tags.clone().unwrap_or_default(),
        ]);
    }
    table
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if filters are invalid or the query fails.
pub fn execute(args: &ListArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing list command");
    let status = if args.all {
        None
    } else {
        Some(args.status.as_str())
    };
    let filter = build_filter(status, &args.filter)?;
    tracing::debug!(?filter, "List filter");

    let mut ctx = CommandContext::open(cli)?;
    let signals = ctx.store.list_signals(&filter)?;

    if json {
        return print_json(&signals);
    }
    if signals.is_empty() {
        println!("No signals found.");
        return Ok(());
    }
    println!("{}", to_table(&signals).render(RenderFormat::Table));
    Ok(())
}
