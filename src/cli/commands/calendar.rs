//! Calendar command implementation.

use crate::cli::CalendarArgs;
use crate::cli::commands::{CommandContext, emit_report, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::calendar;
use crate::storage::SignalFilter;
use crate::util::time::today_utc;

/// Execute the calendar command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the output file written.
pub fn execute(args: &CalendarArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing calendar command");
    let mut ctx = CommandContext::open(cli)?;
    let defaults = ctx.config.defaults;
    let days = non_negative(args.days.unwrap_or(defaults.calendar_days), "days")?;
    let limit = args.limit.unwrap_or(defaults.calendar_limit);

    let signals = ctx.store.list_signals(&SignalFilter::open())?;
    let report = calendar::calendar(&signals, today_utc(), days);

    if json {
        return print_json(&report);
    }
    if signals.is_empty() {
        println!("No open signals found.");
        return Ok(());
    }
    emit_report(
        &report.render(args.format, limit),
        args.out.as_deref(),
        "calendar",
    )
}
