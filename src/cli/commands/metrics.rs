//! Metrics command implementation.

use crate::cli::MetricsArgs;
use crate::cli::commands::{CommandContext, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::metrics;
use crate::util::time::today_utc;

/// Execute the metrics command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(args: &MetricsArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing metrics command");
    let mut ctx = CommandContext::open(cli)?;
    let defaults = ctx.config.defaults;
    let days = non_negative(args.days.unwrap_or(defaults.metrics_days), "days")?;
    let stale_days = non_negative(args.stale_days.unwrap_or(defaults.stale_days), "stale-days")?;
    let limit = args.limit.unwrap_or(defaults.metrics_limit);

    let signals = ctx.all_signals()?;
    let report = metrics::metrics(&signals, today_utc(), days, stale_days, limit);

    if json {
        return print_json(&report);
    }
    if signals.is_empty() {
        println!("No signals found.");
        return Ok(());
    }
    println!("{}", report.render());
    Ok(())
}
