//! Storage layer for signals.
//!
//! - [`SignalStore`] is the backend-neutral contract used by commands
//! - [`SqliteStorage`] is the default adapter
//! - `PostgresStorage` is available with the `postgres` feature
//!
//! Backends share the statement text built here and differ only in
//! placeholder style and value binding.

pub mod filter;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod schema;
pub mod sqlite;

pub use filter::{Dialect, SignalFilter};
#[cfg(feature = "postgres")]
pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;

use crate::config::{Backend, StoreConfig};
use crate::error::{Result, SignalError};
use crate::model::{NewSignal, Severity, Signal, SignalUpdate, Status, append_notes};
use crate::util::time::{self, format_timestamp};
use chrono::{DateTime, Utc};

/// Column list shared by every `SELECT`, in row-decoding order.
pub const SIGNAL_COLUMNS: &str = "id, title, category, severity, owner, due_date, status, notes, source, tags, created_at, closed_at, updated_at";

/// Backend-neutral signal storage.
pub trait SignalStore {
    /// Human-readable location of the store, used in command output.
    fn location(&self) -> String;

    /// Insert a new open signal and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn create_signal(&mut self, signal: &NewSignal, now: DateTime<Utc>) -> Result<i64>;

    /// Fetch one signal by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_signal(&mut self, id: i64) -> Result<Option<Signal>>;

    /// List signals matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_signals(&mut self, filter: &SignalFilter) -> Result<Vec<Signal>>;

    /// Apply `update` in one transaction, refreshing `updated_at`.
    ///
    /// Returns `None` when no signal has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    fn update_signal(
        &mut self,
        id: i64,
        update: &SignalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Signal>>;
}

/// Open the configured backend, creating or migrating the schema.
///
/// # Errors
///
/// Returns a configuration error for an unusable backend selection, or the
/// backend's error if the connection or schema setup fails.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn SignalStore>> {
    tracing::debug!(backend = %config.backend, table = %config.table, "Opening store");
    match config.backend {
        Backend::Sqlite => Ok(Box::new(SqliteStorage::open(&config.db_path, &config.table)?)),
        Backend::Postgres => open_postgres(config),
    }
}

#[cfg(feature = "postgres")]
fn open_postgres(config: &StoreConfig) -> Result<Box<dyn SignalStore>> {
    let dsn = config
        .dsn
        .as_deref()
        .ok_or_else(|| SignalError::config("postgres backend requires a DSN (--dsn or SIGCAT_DSN)"))?;
    Ok(Box::new(PostgresStorage::connect(dsn, &config.table)?))
}

#[cfg(not(feature = "postgres"))]
fn open_postgres(_config: &StoreConfig) -> Result<Box<dyn SignalStore>> {
    Err(SignalError::config(
        "postgres backend is not available in this build (enable the 'postgres' feature)",
    ))
}

/// A row as read from the database, every column still text.
#[derive(Debug, Clone, Default)]
pub struct RawSignal {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub tags: Option<String>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    pub updated_at: Option<String>,
}

fn empty_to_none(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

fn lenient_timestamp(id: i64, column: &str, value: Option<String>) -> Option<DateTime<Utc>> {
    let value = empty_to_none(value)?;
    let parsed = time::parse_timestamp(&value);
    if parsed.is_none() {
        tracing::warn!(id, column, value = %value, "Unparseable timestamp treated as absent");
    }
    parsed
}

impl From<RawSignal> for Signal {
    fn from(raw: RawSignal) -> Self {
        let id = raw.id;
        let due_date = empty_to_none(raw.due_date).and_then(|value| {
            let parsed = time::parse_date(&value);
            if parsed.is_none() {
                tracing::warn!(id, value = %value, "Unparseable due date treated as absent");
            }
            parsed
        });

        Self {
            id,
            title: raw.title,
            category: empty_to_none(raw.category),
            severity: Severity::from_stored(raw.severity),
            owner: empty_to_none(raw.owner),
            due_date,
            status: Status::from_stored(raw.status.as_deref()),
            notes: empty_to_none(raw.notes),
            source: empty_to_none(raw.source),
            tags: empty_to_none(raw.tags),
            created_at: lenient_timestamp(id, "created_at", raw.created_at),
            closed_at: lenient_timestamp(id, "closed_at", raw.closed_at),
            updated_at: lenient_timestamp(id, "updated_at", raw.updated_at),
        }
    }
}

/// A column and the text value bound to it.
pub type Assignment = (&'static str, Option<String>);

/// Column values for inserting a new signal.
#[must_use]
pub fn insert_assignments(signal: &NewSignal, now: DateTime<Utc>) -> Vec<Assignment> {
    let stamp = format_timestamp(&now);
    vec![
        ("title", Some(signal.title.clone())),
        ("category", signal.category.clone()),
        ("severity", Some(signal.severity.as_str().to_string())),
        ("owner", signal.owner.clone()),
        ("due_date", signal.due_date.map(|d| d.to_string())),
        ("status", Some(Status::Open.as_str().to_string())),
        ("notes", signal.notes.clone()),
        ("source", signal.source.clone()),
        ("tags", signal.tags.clone()),
        ("created_at", Some(stamp.clone())),
        ("updated_at", Some(stamp)),
    ]
}

/// Column values for applying `update` to `current`.
///
/// Always ends with `updated_at = now`.
#[must_use]
pub fn update_assignments(
    current: &Signal,
    update: &SignalUpdate,
    now: DateTime<Utc>,
) -> Vec<Assignment> {
    let mut set: Vec<Assignment> = Vec::new();

    if let Some(title) = &update.title {
        set.push(("title", Some(title.clone())));
    }
    if let Some(category) = &update.category {
        set.push(("category", category.clone()));
    }
    if let Some(severity) = &update.severity {
        set.push(("severity", Some(severity.as_str().to_string())));
    }
    if let Some(owner) = &update.owner {
        set.push(("owner", owner.clone()));
    }
    if let Some(due) = &update.due_date {
        set.push(("due_date", due.map(|d| d.to_string())));
    }
    if let Some(source) = &update.source {
        set.push(("source", source.clone()));
    }
    if let Some(tags) = &update.tags {
        set.push(("tags", tags.clone()));
    }
    if let Some(status) = update.status {
        set.push(("status", Some(status.as_str().to_string())));
    }
    if let Some(closed_at) = &update.closed_at {
        set.push(("closed_at", closed_at.as_ref().map(format_timestamp)));
    }
    if let Some(note) = &update.append_note {
        set.push(("notes", Some(append_notes(current.notes.as_deref(), note))));
    }

    set.push(("updated_at", Some(format_timestamp(&now))));
    set
}

/// `INSERT` statement for the given assignments.
#[must_use]
pub fn insert_sql(table: &str, assignments: &[Assignment], dialect: Dialect) -> String {
    let columns: Vec<&str> = assignments.iter().map(|(column, _)| *column).collect();
    let placeholders: Vec<String> = (1..=assignments.len())
        .map(|n| dialect.placeholder(n))
        .collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE ... WHERE id = <last placeholder>` for the given assignments.
#[must_use]
pub fn update_sql(table: &str, assignments: &[Assignment], dialect: Dialect) -> String {
    let set: Vec<String> = assignments
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = {}", dialect.placeholder(i + 1)))
        .collect();
    format!(
        "UPDATE {table} SET {} WHERE id = {}",
        set.join(", "),
        dialect.placeholder(assignments.len() + 1)
    )
}

/// `SELECT` for one id.
#[must_use]
pub fn select_by_id_sql(table: &str, dialect: Dialect) -> String {
    format!(
        "SELECT {SIGNAL_COLUMNS} FROM {table} WHERE id = {}",
        dialect.placeholder(1)
    )
}

/// Filtered `SELECT`, newest first, with its bound parameters.
#[must_use]
pub fn list_sql(table: &str, filter: &SignalFilter, dialect: Dialect) -> (String, Vec<String>) {
    let fragment = filter::render_where(&filter.predicates(), dialect, 1);
    let mut sql = format!(
        "SELECT {SIGNAL_COLUMNS} FROM {table}{} ORDER BY created_at DESC, id DESC",
        fragment.clause
    );
    if let Some(limit) = filter.limit.filter(|l| *l > 0) {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    (sql, fragment.params)
}
