//! Close command implementation.

use crate::cli::NoteArgs;
use crate::cli::commands::{CommandContext, print_json, print_not_found};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::SignalUpdate;
use chrono::Utc;

/// Execute the close command.
///
/// Closing an already-closed signal leaves it untouched.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the update fails.
pub fn execute(args: &NoteArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!(id = args.id, "Executing close command");
    let mut ctx = CommandContext::open(cli)?;

    let Some(current) = ctx.store.get_signal(args.id)? else {
        return print_not_found(args.id, json);
    };
    if !current.is_open() {
        tracing::debug!(id = args.id, "Signal already closed");
        if json {
            return print_json(&current);
        }
        println!("Signal {} is already closed.", args.id);
        return Ok(());
    }

    let now = Utc::now();
    let update = SignalUpdate::close(now, args.note.as_deref());
    let Some(closed) = ctx.store.update_signal(args.id, &update, now)? else {
        return print_not_found(args.id, json);
    };
    tracing::info!(id = closed.id, "Closed signal");

    if json {
        return print_json(&closed);
    }
    println!("Closed signal {}.", closed.id);
    Ok(())
}
