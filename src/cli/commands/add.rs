//! Add command implementation.

use crate::cli::AddArgs;
use crate::cli::commands::{CommandContext, parse_severity, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::{NewSignal, clean_text, normalize_tags};
use crate::util::time::parse_date_arg;
use chrono::Utc;

/// Validate CLI input into a [`NewSignal`].
///
/// # Errors
///
/// Returns a validation error for an empty title, an unknown severity, or a
/// malformed due date.
pub fn build_signal(args: &AddArgs) -> Result<NewSignal> {
    let mut signal = NewSignal::new(&args.title)?;
    signal.category = clean_text(args.category.as_deref());
    signal.severity = parse_severity(args.severity.as_deref())?.unwrap_or_default();
    signal.owner = clean_text(args.owner.as_deref());
    signal.due_date = clean_text(args.due.as_deref())
        .map(|due| parse_date_arg(&due, "due"))
        .transpose()?;
    signal.notes = clean_text(args.notes.as_deref());
    signal.source = clean_text(args.source.as_deref());
    signal.tags = args.tags.as_deref().and_then(normalize_tags);
    Ok(signal)
}

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if validation fails or the insert fails.
pub fn execute(args: &AddArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!("Executing add command");
    let signal = build_signal(args)?;

    let mut ctx = CommandContext::open(cli)?;
    let id = ctx.store.create_signal(&signal, Utc::now())?;
    tracing::info!(id, title = %signal.title, "Added signal");

    if json {
        return print_json(&ctx.store.get_signal(id)?);
    }
    println!("Added signal {id}.");
    Ok(())
}
