//! Audit command implementation.

use crate::cli::AuditArgs;
use crate::cli::commands::{CommandContext, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::audit;
use crate::storage::SignalFilter;
use crate::util::time::today_utc;

/// Execute the audit command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(args: &AuditArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing audit command");
    let mut ctx = CommandContext::open(cli)?;
    let defaults = ctx.config.defaults;
    let stale_days = non_negative(args.stale_days.unwrap_or(defaults.stale_days), "stale-days")?;
    let limit = args.limit.unwrap_or(defaults.audit_limit);

    let signals = ctx.store.list_signals(&SignalFilter::open())?;
    let report = audit::audit(&signals, today_utc(), stale_days);

    if json {
        return print_json(&report);
    }
    if report.open == 0 {
        println!("No open signals found.");
        return Ok(());
    }
    println!("{}", report.render(limit));
    Ok(())
}
