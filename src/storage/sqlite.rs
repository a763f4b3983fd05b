//! `SQLite` storage implementation.

use crate::error::{Result, SignalError};
use crate::model::{NewSignal, Signal, SignalUpdate};
use crate::storage::filter::{Dialect, SignalFilter};
use crate::storage::schema::apply_schema;
use crate::storage::{
    RawSignal, SignalStore, insert_assignments, insert_sql, list_sql, select_by_id_sql,
    update_assignments, update_sql,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, ToSql, Transaction, params_from_iter};
use std::fs;
use std::path::{Path, PathBuf};

/// Default signal table name.
pub const DEFAULT_TABLE: &str = "signals";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    table: String,
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Open (creating if needed) the database at `path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or schema application fails.
    pub fn open(path: &Path, table: &str) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SignalError::DatabaseOpen {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        let conn = Connection::open(path).map_err(|e| SignalError::DatabaseOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        apply_schema(&conn, table)?;
        tracing::debug!(path = %path.display(), table, "Opened SQLite store");
        Ok(Self {
            conn,
            table: table.to_string(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn, DEFAULT_TABLE)?;
        Ok(Self {
            conn,
            table: DEFAULT_TABLE.to_string(),
            path: None,
        })
    }

    /// Run `f` inside an immediate transaction, committing on success.
    ///
    /// # Errors
    ///
    /// Returns the error from `f` or the database; the transaction is rolled back.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &str) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let result = f(&tx, &self.table)?;
        tx.commit()?;
        tracing::debug!(op, "Committed mutation");
        Ok(result)
    }

    /// Execute raw SQL against the connection.
    ///
    /// Used by tests to seed rows the public API would never write.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn execute_test_sql(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Name of the signal table this store reads and writes.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

fn signal_from_row(row: &rusqlite::Row) -> rusqlite::Result<Signal> {
    Ok(Signal::from(RawSignal {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        category: row.get(2)?,
        severity: row.get(3)?,
        owner: row.get(4)?,
        due_date: row.get(5)?,
        status: row.get(6)?,
        notes: row.get(7)?,
        source: row.get(8)?,
        tags: row.get(9)?,
        created_at: row.get(10)?,
        closed_at: row.get(11)?,
        updated_at: row.get(12)?,
    }))
}

fn fetch_signal(conn: &Connection, table: &str, id: i64) -> Result<Option<Signal>> {
    let signal = conn
        .query_row(&select_by_id_sql(table, Dialect::Sqlite), [id], signal_from_row)
        .optional()?;
    Ok(signal)
}

impl SignalStore for SqliteStorage {
    fn location(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string())
    }

    fn create_signal(&mut self, signal: &NewSignal, now: DateTime<Utc>) -> Result<i64> {
        self.mutate("create", |tx, table| {
            let values = insert_assignments(signal, now);
            let sql = insert_sql(table, &values, Dialect::Sqlite);
            tx.execute(&sql, params_from_iter(values.iter().map(|(_, v)| v)))?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn get_signal(&mut self, id: i64) -> Result<Option<Signal>> {
        fetch_signal(&self.conn, &self.table, id)
    }

    fn list_signals(&mut self, filter: &SignalFilter) -> Result<Vec<Signal>> {
        let (sql, params) = list_sql(&self.table, filter, Dialect::Sqlite);
        tracing::debug!(sql = %sql, params = ?params, "Listing signals");
        let mut stmt = self.conn.prepare(&sql)?;
        let signals = stmt
            .query_map(params_from_iter(params.iter()), signal_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(signals)
    }

    fn update_signal(
        &mut self,
        id: i64,
        update: &SignalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Signal>> {
        self.mutate("update", |tx, table| {
            let Some(current) = fetch_signal(tx, table, id)? else {
                return Ok(None);
            };
            let values = update_assignments(&current, update, now);
            let sql = update_sql(table, &values, Dialect::Sqlite);
            let mut bound: Vec<&dyn ToSql> = values.iter().map(|(_, v)| v as &dyn ToSql).collect();
            bound.push(&id);
            tx.execute(&sql, bound.as_slice())?;
            fetch_signal(tx, table, id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, Status};
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 8, 12, 0, 0).unwrap()
    }

    fn new_signal(title: &str) -> NewSignal {
        NewSignal::new(title).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut input = new_signal("Partner data delay");
        input.severity = Severity::High;
        input.owner = Some("Leah".to_string());

        let id = storage.create_signal(&input, now()).unwrap();
        let signal = storage.get_signal(id).unwrap().unwrap();

        assert_eq!(signal.title, "Partner data delay");
        assert_eq!(signal.status, Status::Open);
        assert_eq!(signal.severity, Some(Severity::High));
        assert_eq!(signal.created_at, Some(now()));
        assert_eq!(signal.updated_at, Some(now()));
        assert_eq!(signal.closed_at, None);
    }

    #[test]
    fn test_get_missing_is_none() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.get_signal(99).unwrap().is_none());
    }

    #[test]
    fn test_close_then_reopen() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = storage.create_signal(&new_signal("a"), now()).unwrap();

        let later = now() + Duration::hours(2);
        let closed = storage
            .update_signal(id, &SignalUpdate::close(later, Some("fixed")), later)
            .unwrap()
            .unwrap();
        assert_eq!(closed.status, Status::Closed);
        assert_eq!(closed.closed_at, Some(later));
        assert_eq!(closed.updated_at, Some(later));
        assert_eq!(closed.notes.as_deref(), Some("[Closed] fixed"));

        let even_later = later + Duration::hours(1);
        let reopened = storage
            .update_signal(id, &SignalUpdate::reopen(Some("regressed")), even_later)
            .unwrap()
            .unwrap();
        assert_eq!(reopened.status, Status::Open);
        assert_eq!(reopened.closed_at, None);
        assert_eq!(reopened.updated_at, Some(even_later));
        assert_eq!(
            reopened.notes.as_deref(),
            Some("[Closed] fixed\n[Reopened] regressed")
        );
    }

    #[test]
    fn test_update_missing_mutates_nothing() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_signal(&new_signal("a"), now()).unwrap();
        let result = storage
            .update_signal(42, &SignalUpdate::reopen(None), now())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_list_filters_and_order() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut a = new_signal("Alpha backlog");
        a.owner = Some("Leah".to_string());
        storage.create_signal(&a, now() - Duration::days(2)).unwrap();
        storage
            .create_signal(&new_signal("Beta"), now() - Duration::days(1))
            .unwrap();
        let mut c = new_signal("Gamma");
        c.notes = Some("big backlog here".to_string());
        storage.create_signal(&c, now()).unwrap();

        let all = storage.list_signals(&SignalFilter::all()).unwrap();
        let titles: Vec<&str> = all.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Gamma", "Beta", "Alpha backlog"]);

        let search = SignalFilter {
            search: Some("backlog".to_string()),
            ..SignalFilter::default()
        };
        assert_eq!(storage.list_signals(&search).unwrap().len(), 2);

        let owned = SignalFilter {
            owner: Some("Leah".to_string()),
            ..SignalFilter::default()
        };
        assert_eq!(storage.list_signals(&owned).unwrap().len(), 1);

        let limited = SignalFilter {
            limit: Some(1),
            ..SignalFilter::default()
        };
        assert_eq!(storage.list_signals(&limited).unwrap()[0].title, "Gamma");
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_signal(&new_signal("100% done"), now()).unwrap();
        storage.create_signal(&new_signal("1000 done"), now()).unwrap();

        let filter = SignalFilter {
            search: Some("0%".to_string()),
            ..SignalFilter::default()
        };
        let found = storage.list_signals(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "100% done");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("signals.db");
        let storage = SqliteStorage::open(&path, "signals").unwrap();
        assert!(path.exists());
        assert_eq!(storage.location(), path.display().to_string());
    }

    #[test]
    fn test_malformed_rows_read_as_absent() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage
            .execute_test_sql(
                "INSERT INTO signals (title, status, due_date, created_at, updated_at)
                 VALUES ('odd', 'open', 'next week', 'not a date', '')",
            )
            .unwrap();
        let signals = storage.list_signals(&SignalFilter::open()).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].due_date, None);
        assert_eq!(signals[0].created_at, None);
        assert_eq!(signals[0].updated_at, None);
    }
}
