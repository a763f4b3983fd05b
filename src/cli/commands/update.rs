//! Update command implementation.

use crate::cli::UpdateArgs;
use crate::cli::commands::{CommandContext, parse_severity, print_json, print_not_found};
use crate::config::CliOverrides;
use crate::error::{Result, SignalError};
use crate::model::{SignalUpdate, clean_text, normalize_tags};
use crate::util::time::parse_date_arg;
use chrono::Utc;

/// Resolve a `--<field>` / `--clear-<field>` pair.
///
/// A blank value clears the field.
fn set_or_clear(field: &str, value: Option<&str>, clear: bool) -> Result<Option<Option<String>>> {
    match (value, clear) {
        (Some(_), true) => Err(SignalError::validation(
            field,
            format!("cannot combine --{field} with --clear-{field}"),
        )),
        (Some(v), false) => Ok(Some(clean_text(Some(v)))),
        (None, true) => Ok(Some(None)),
        (None, false) => Ok(None),
    }
}

/// Validate CLI flags into a [`SignalUpdate`].
///
/// # Errors
///
/// Returns a validation error for conflicting set/clear flags, an empty
/// title, an unknown severity, or a malformed due date.
pub fn build_update(args: &UpdateArgs) -> Result<SignalUpdate> {
    let title = match args.title.as_deref().map(str::trim) {
        Some("") => return Err(SignalError::validation("title", "cannot be empty")),
        other => other.map(str::to_string),
    };

    let due_date = set_or_clear("due", args.due.as_deref(), args.clear_due)?
        .map(|due| due.map(|d| parse_date_arg(&d, "due")).transpose())
        .transpose()?;
    let tags = set_or_clear("tags", args.tags.as_deref(), args.clear_tags)?
        .map(|tags| tags.as_deref().and_then(normalize_tags));

    Ok(SignalUpdate {
        title,
        category: set_or_clear("category", args.category.as_deref(), args.clear_category)?,
        severity: parse_severity(args.severity.as_deref())?,
        owner: set_or_clear("owner", args.owner.as_deref(), args.clear_owner)?,
        due_date,
        source: set_or_clear("source", args.source.as_deref(), args.clear_source)?,
        tags,
        append_note: clean_text(args.append_note.as_deref()),
        ..SignalUpdate::default()
    })
}

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if validation fails or the update fails.
pub fn execute(args: &UpdateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    tracing::info!(id = args.id, "Executing update command");
    let update = build_update(args)?;

    let mut ctx = CommandContext::open(cli)?;
    if update.is_empty() {
        let Some(current) = ctx.store.get_signal(args.id)? else {
            return print_not_found(args.id, json);
        };
        if json {
            return print_json(&current);
        }
        println!("No changes for signal {}.", args.id);
        return Ok(());
    }

    let Some(updated) = ctx.store.update_signal(args.id, &update, Utc::now())? else {
        return print_not_found(args.id, json);
    };
    tracing::info!(id = updated.id, "Updated signal");

    if json {
        return print_json(&updated);
    }
    println!("Updated signal {}.", updated.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args() -> UpdateArgs {
        UpdateArgs {
            id: 1,
            ..UpdateArgs::default()
        }
    }

    #[test]
    fn set_and_clear_conflict() {
        let mut input = args();
        input.owner = Some("Leah".to_string());
        input.clear_owner = true;
        let err = build_update(&input).unwrap_err();
        assert!(err.to_string().contains("--clear-owner"));
    }

    #[test]
    fn clear_and_set_map_to_nested_options() {
        let mut input = args();
        input.clear_category = true;
        input.due = Some("2026-03-01".to_string());
        input.tags = Some(" a , b ".to_string());
        let update = build_update(&input).unwrap();
        assert_eq!(update.category, Some(None));
        assert_eq!(update.due_date, Some(NaiveDate::from_ymd_opt(2026, 3, 1)));
        assert_eq!(update.tags, Some(Some("a,b".to_string())));
        assert_eq!(update.owner, None);
    }

    #[test]
    fn empty_flags_mean_no_changes() {
        assert!(build_update(&args()).unwrap().is_empty());
    }

    #[test]
    fn rejects_blank_title_and_bad_due() {
        let mut blank = args();
        blank.title = Some("  ".to_string());
        assert!(build_update(&blank).is_err());

        let mut due = args();
        due.due = Some("soon".to_string());
        assert!(build_update(&due).is_err());
    }
}
