//! Workload command implementation.

use crate::cli::WorkloadArgs;
use crate::cli::commands::{CommandContext, emit_report, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::workload;
use crate::storage::SignalFilter;
use crate::util::time::today_utc;

/// Execute the workload command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the output file written.
pub fn execute(args: &WorkloadArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing workload command");
    let mut ctx = CommandContext::open(cli)?;
    let days = non_negative(args.days.unwrap_or(ctx.config.defaults.workload_days), "days")?;

    let signals = ctx.store.list_signals(&SignalFilter::open())?;
    let loads = workload::workload(&signals, today_utc(), days);

    if json {
        return print_json(&loads);
    }
    if loads.is_empty() {
        println!("No open signals found.");
        return Ok(());
    }
    emit_report(
        &workload::render(&loads, days, args.format),
        args.out.as_deref(),
        "workload report",
    )
}
