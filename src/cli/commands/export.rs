//! Export command implementation.

use crate::cli::ExportArgs;
use crate::cli::commands::list::build_filter;
use crate::cli::commands::{CommandContext, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::csv;
use crate::util::write_output_file;

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if filters are invalid, the query fails, or the output
/// file cannot be written.
pub fn execute(args: &ExportArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing export command");
    let filter = build_filter(args.status.as_deref(), &args.filter)?;

    let mut ctx = CommandContext::open(cli)?;
    let signals = ctx.store.list_signals(&filter)?;

    if json {
        return print_json(&signals);
    }
    if signals.is_empty() {
        println!("No signals found to export.");
        return Ok(());
    }

    let rendered = csv::format_signals(&signals);
    match &args.out {
        Some(path) => {
            write_output_file(path, &rendered)?;
            tracing::info!(count = signals.len(), path = %path.display(), "Exported signals");
            println!("Exported {} signals to {}.", signals.len(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
