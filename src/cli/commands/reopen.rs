//! Reopen command implementation.

use crate::cli::NoteArgs;
use crate::cli::commands::{CommandContext, print_json, print_not_found};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::SignalUpdate;
use chrono::Utc;

/// Execute the reopen command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the update fails.
pub fn execute(args: &NoteArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!(id = args.id, "Executing reopen command");
    let mut ctx = CommandContext::open(cli)?;

    let Some(current) = ctx.store.get_signal(args.id)? else {
        return print_not_found(args.id, json);
    };
    if current.is_open() {
        if json {
            return print_json(&current);
        }
        println!("Signal {} is already open.", args.id);
        return Ok(());
    }

    let update = SignalUpdate::reopen(args.note.as_deref());
    let Some(reopened) = ctx.store.update_signal(args.id, &update, Utc::now())? else {
        return print_not_found(args.id, json);
    };
    tracing::info!(id = reopened.id, "Reopened signal");

    if json {
        return print_json(&reopened);
    }
    println!("Reopened signal {}.", reopened.id);
    Ok(())
}
