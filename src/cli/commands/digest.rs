//! Digest command implementation.

use crate::cli::DigestArgs;
use crate::cli::commands::{CommandContext, emit_report, non_negative, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::digest;
use crate::util::time::today_utc;

/// Execute the digest command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the output file written.
pub fn execute(args: &DigestArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing digest command");
    let mut ctx = CommandContext::open(cli)?;
    let defaults = ctx.config.defaults;
    let days = non_negative(args.days.unwrap_or(defaults.digest_days), "days")?;
    let limit = args.limit.unwrap_or(defaults.digest_limit);

    let signals = ctx.all_signals()?;
    let report = digest::digest(&signals, today_utc(), days);

    if json {
        return print_json(&report);
    }
    if signals.is_empty() {
        println!("No signals found.");
        return Ok(());
    }
    emit_report(&report.render(limit), args.out.as_deref(), "digest")
}
