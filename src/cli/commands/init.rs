//! Init command implementation.

use crate::cli::commands::{CommandContext, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use serde_json::json;

/// Create (or migrate) the signal table in the configured store.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the store cannot be opened.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing init command");
    let ctx = CommandContext::open(cli)?;
    let location = ctx.store.location();

    if json {
        return print_json(&json!({
            "initialized": true,
            "backend": ctx.config.store.backend.as_str(),
            "table": ctx.config.store.table,
            "location": location,
        }));
    }
    println!("Initialized database at {location}.");
    Ok(())
}
