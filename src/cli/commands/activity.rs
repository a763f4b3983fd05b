//! Activity command implementation.

use crate::cli::ActivityArgs;
use crate::cli::commands::{CommandContext, emit_report, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::activity;
use crate::util::time::today_utc;

/// Execute the activity command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the output file written.
pub fn execute(args: &ActivityArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing activity command");
    let mut ctx = CommandContext::open(cli)?;
    let defaults = ctx.config.defaults;
    let days = non_negative(args.days.unwrap_or(defaults.activity_days), "days")?;
    let limit = args.limit.unwrap_or(defaults.activity_limit);

    let signals = ctx.all_signals()?;
    let report = activity::activity(&signals, today_utc(), days, limit);

    if json {
        return print_json(&report);
    }
    if signals.is_empty() {
        println!("No signals found.");
        return Ok(());
    }
    emit_report(
        &report.render(args.format),
        args.out.as_deref(),
        "activity report",
    )
}
