//! Triage command implementation.

use crate::cli::TriageArgs;
use crate::cli::commands::{CommandContext, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::triage;
use crate::storage::SignalFilter;
use crate::util::time::today_utc;

/// Execute the triage command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(args: &TriageArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing triage command");
    let mut ctx = CommandContext::open(cli)?;
    let defaults = ctx.config.defaults;
    let days = non_negative(args.days.unwrap_or(defaults.triage_days), "days")?;
    let limit = args.limit.unwrap_or(defaults.triage_limit);

    let signals = ctx.store.list_signals(&SignalFilter::open())?;
    let mut report = triage::triage(&signals, today_utc(), days);
    tracing::debug!(open = report.entries.len(), days, "Scored open signals");

    if json {
        report.entries.truncate(limit);
        return print_json(&report);
    }
    if report.entries.is_empty() {
        println!("No open signals found.");
        return Ok(());
    }
    println!("{}", report.render(limit));
    Ok(())
}
