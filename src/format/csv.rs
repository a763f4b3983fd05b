//! CSV formatting for `signal_catalog`.
//!
//! Writes report tables and signal exports, and reads exports back. Fields
//! containing commas, quotes, or line breaks are quoted with inner quotes
//! doubled.

use crate::error::{Result, SignalError};
use crate::format::Table;
use crate::model::Signal;
use crate::storage::RawSignal;
use crate::util::time::format_timestamp;

/// Export columns, in order.
pub const EXPORT_FIELDS: &[&str] = &[
    "id",
    "title",
    "category",
    "severity",
    "owner",
    "due_date",
    "status",
    "notes",
    "source",
    "tags",
    "created_at",
    "closed_at",
    "updated_at",
];

/// Escape a CSV field value.
///
/// Wraps in double quotes if the value contains commas, quotes, or newlines.
/// Doubles any existing quotes within the value.
#[must_use]
pub fn escape_field(value: &str) -> String {
    let needs_quoting = value.contains(',')
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');

    if needs_quoting {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

fn format_record(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render a table as CSV, header first, without a trailing newline.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(format_record(&table.headers));
    for row in &table.rows {
        lines.push(format_record(row));
    }
    lines.join("\n")
}

/// Get a field value from a signal by export column name.
#[must_use]
pub fn get_field_value(signal: &Signal, field: &str) -> String {
    match field {
        "id" => signal.id.to_string(),
        "title" => signal.title.clone(),
        "category" => signal.category.clone().unwrap_or_default(),
        "severity" => signal
            .severity
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        "owner" => signal.owner.clone().unwrap_or_default(),
        "due_date" => signal.due_date.map(|d| d.to_string()).unwrap_or_default(),
        "status" => signal.status.as_str().to_string(),
        "notes" => signal.notes.clone().unwrap_or_default(),
        "source" => signal.source.clone().unwrap_or_default(),
        "tags" => signal.tags.clone().unwrap_or_default(),
        "created_at" => signal
            .created_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        "closed_at" => signal
            .closed_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        "updated_at" => signal
            .updated_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Export signals as CSV with [`EXPORT_FIELDS`] columns.
#[must_use]
pub fn format_signals(signals: &[Signal]) -> String {
    let mut table = Table::new(EXPORT_FIELDS);
    for signal in signals {
        table.push_row(
            EXPORT_FIELDS
                .iter()
                .map(|field| get_field_value(signal, field))
                .collect(),
        );
    }
    render_table(&table)
}

/// Split CSV text into records.
///
/// Accepts `\n` and `\r\n` record separators and quoted fields spanning lines.
///
/// # Errors
///
/// Returns a validation error for an unterminated quoted field or stray text
/// after a closing quote.
pub fn parse_records(input: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                    after_quote = true;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !after_quote => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
                after_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                after_quote = false;
            }
            _ if after_quote => {
                return Err(SignalError::validation(
                    "csv",
                    format!("unexpected '{c}' after closing quote"),
                ));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(SignalError::validation("csv", "unterminated quoted field"));
    }
    if !field.is_empty() || !record.is_empty() || after_quote {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

/// Read signals back from an export.
///
/// Columns are matched by header name; missing columns read as absent.
///
/// # Errors
///
/// Returns a validation error for malformed CSV, a missing `id`/`title`
/// header, or a non-numeric id.
pub fn parse_signals(input: &str) -> Result<Vec<Signal>> {
    let mut records = parse_records(input)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let column = |name: &str| header.iter().position(|h| h == name);
    let (Some(id_col), Some(title_col)) = (column("id"), column("title")) else {
        return Err(SignalError::validation("csv", "missing id or title column"));
    };

    let mut signals = Vec::new();
    for record in records {
        let get = |name: &str| {
            column(name)
                .and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .cloned()
        };
        let id_text = record.get(id_col).map_or("", String::as_str);
        let id = id_text.trim().parse::<i64>().map_err(|_| {
            SignalError::validation("csv", format!("invalid id '{id_text}'"))
        })?;

        signals.push(Signal::from(RawSignal {
            id,
            title: record.get(title_col).cloned().unwrap_or_default(),
            category: get("category"),
            severity: get("severity"),
            owner: get("owner"),
            due_date: get("due_date"),
            status: get("status"),
            notes: get("notes"),
            source: get("source"),
            tags: get("tags"),
            created_at: get("created_at"),
            closed_at: get("closed_at"),
            updated_at: get("updated_at"),
        }));
    }

    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, Status};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_signal(id: i64, title: &str) -> Signal {
        Signal {
            id,
            title: title.to_string(),
            category: Some("partner".to_string()),
            severity: Some(Severity::High),
            owner: None,
            due_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            status: Status::Open,
            notes: None,
            source: None,
            tags: Some("fafsa,backlog".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap()),
            closed_at: None,
            updated_at: Some(Utc.with_ymd_and_hms(2026, 2, 2, 9, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("simple"), "simple");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_export_header_order() {
        let csv = format_signals(&[make_signal(1, "Partner delay")]);
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "id,title,category,severity,owner,due_date,status,notes,source,tags,created_at,closed_at,updated_at"
        );
        assert!(csv.contains("1,Partner delay,partner,high,,2026-03-01,open,,,\"fafsa,backlog\",2026-02-01T09:00:00Z,,2026-02-02T09:00:00Z"));
    }

    #[test]
    fn test_parse_records_quotes_and_crlf() {
        let records = parse_records("a,b\r\n\"x,\"\"y\"\"\",\"multi\nline\"\r\n").unwrap();
        assert_eq!(
            records,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["x,\"y\"".to_string(), "multi\nline".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_records_rejects_unterminated() {
        assert!(parse_records("\"open").is_err());
        assert!(parse_records("\"a\"b,c").is_err());
    }

    #[test]
    fn test_export_then_read_back() {
        let mut tricky = make_signal(2, "Comma, \"quoted\" title");
        tricky.notes = Some("first\n[Closed] done".to_string());
        tricky.status = Status::Closed;
        tricky.closed_at = Some(Utc.with_ymd_and_hms(2026, 2, 3, 0, 0, 0).unwrap());
        let signals = vec![tricky, make_signal(1, "Plain")];

        let parsed = parse_signals(&format_signals(&signals)).unwrap();
        assert_eq!(parsed, signals);
    }

    #[test]
    fn test_parse_signals_empty_input() {
        assert!(parse_signals("").unwrap().is_empty());
        assert!(parse_signals("id,title\n").unwrap().is_empty());
    }
}
