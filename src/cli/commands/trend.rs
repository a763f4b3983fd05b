//! Trend command implementation.

use crate::cli::TrendArgs;
use crate::cli::commands::{CommandContext, emit_report, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::trend;
use crate::util::time::{parse_date_arg, today_utc};

/// Execute the trend command.
///
/// # Errors
///
/// Returns a validation error for a malformed `--as-of`, or an error if the
/// store cannot be read or the output file written.
pub fn execute(args: &TrendArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing trend command");
    let as_of = args
        .as_of
        .as_deref()
        .map(|d| parse_date_arg(d, "as-of"))
        .transpose()?
        .unwrap_or_else(today_utc);

    let mut ctx = CommandContext::open(cli)?;
    let weeks = args.weeks.unwrap_or(ctx.config.defaults.trend_weeks);

    let signals = ctx.all_signals()?;
    let rows = trend::trend(&signals, as_of, weeks);

    if json {
        return print_json(&rows);
    }
    if signals.is_empty() {
        println!("No signals found.");
        return Ok(());
    }
    emit_report(
        &trend::render(&rows, as_of, args.format),
        args.out.as_deref(),
        "trend report",
    )
}
