//! Stale command implementation.

use crate::cli::StaleArgs;
use crate::cli::commands::{CommandContext, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::stale;
use crate::storage::SignalFilter;
use crate::util::time::today_utc;

/// Execute the stale command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(args: &StaleArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing stale command");
    let mut ctx = CommandContext::open(cli)?;
    let defaults = ctx.config.defaults;
    let days = non_negative(args.days.unwrap_or(defaults.stale_days), "days")?;
    let limit = args.limit.unwrap_or(defaults.stale_limit);

    let signals = ctx.store.list_signals(&SignalFilter::open())?;
    let mut entries = stale::stale(&signals, today_utc(), days);

    if json {
        entries.truncate(limit);
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No stale signals found (none idle for {days}+ days).");
        return Ok(());
    }
    println!("{}", stale::render(&entries, days, limit));
    Ok(())
}
