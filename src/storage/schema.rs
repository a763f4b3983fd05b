//! Database schema and additive migrations.

use crate::error::Result;
use crate::storage::filter::Dialect;
use rusqlite::Connection;

/// Nullable columns added to tables created by older releases.
pub const MIGRATABLE_COLUMNS: [&str; 4] = ["source", "tags", "updated_at", "closed_at"];

/// `CREATE TABLE IF NOT EXISTS` for the signal table.
#[must_use]
pub fn create_table_sql(table: &str, dialect: Dialect) -> String {
    let id = match dialect {
        Dialect::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        Dialect::Postgres => "id BIGSERIAL PRIMARY KEY",
    };
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            {id},
            title TEXT NOT NULL,
            category TEXT,
            severity TEXT,
            owner TEXT,
            due_date TEXT,
            status TEXT NOT NULL,
            notes TEXT,
            source TEXT,
            tags TEXT,
            created_at TEXT NOT NULL,
            closed_at TEXT,
            updated_at TEXT
        )"
    )
}

/// Indexes for the common list/report access paths.
#[must_use]
pub fn index_sql(table: &str) -> Vec<String> {
    vec![
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_status ON {table}(status)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table}(created_at)"),
    ]
}

/// Statements bringing a table with `existing` columns up to date.
///
/// Adding `updated_at` also backfills it from `closed_at`, then `created_at`.
#[must_use]
pub fn migration_sql(table: &str, existing: &[String]) -> Vec<String> {
    let mut statements = Vec::new();
    for column in MIGRATABLE_COLUMNS {
        if existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            continue;
        }
        statements.push(format!("ALTER TABLE {table} ADD COLUMN {column} TEXT"));
        if column == "updated_at" {
            statements.push(format!(
                "UPDATE {table} SET updated_at = COALESCE(closed_at, created_at) WHERE updated_at IS NULL"
            ));
        }
    }
    statements
}

/// Create or migrate the signal table in a `SQLite` database.
///
/// Idempotent: every statement is `IF NOT EXISTS` or guarded by a column check.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn apply_schema(conn: &Connection, table: &str) -> Result<()> {
    conn.execute_batch(&create_table_sql(table, Dialect::Sqlite))?;

    let existing = table_columns(conn, table)?;
    let migrations = migration_sql(table, &existing);
    if !migrations.is_empty() {
        tracing::info!(table, count = migrations.len(), "Migrating signal table");
    }
    for statement in migrations {
        tracing::debug!(sql = %statement, "Applying migration");
        conn.execute(&statement, [])?;
    }

    for statement in index_sql(table) {
        conn.execute(&statement, [])?;
    }

    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}
