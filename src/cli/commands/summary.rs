//! Summary command implementation.

use crate::cli::commands::{CommandContext, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report::summary;

/// Execute the summary command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing summary command");
    let mut ctx = CommandContext::open(cli)?;
    let signals = ctx.all_signals()?;
    let sections = summary::summary(&signals);

    if json {
        return print_json(&sections);
    }
    println!("{}", summary::render(&sections));
    Ok(())
}
