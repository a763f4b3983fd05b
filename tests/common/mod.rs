#![allow(dead_code)]

use signal_catalog::storage::SqliteStorage;
use std::path::Path;
use std::sync::Once;
use std::time::Instant;
use tracing::info;

pub mod cli;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        signal_catalog::logging::init_test_logging();
    });
}

pub struct TestLogGuard {
    name: String,
    start: Instant,
}

impl TestLogGuard {
    fn new(name: &str) -> Self {
        init_test_logging();
        info!("{name}: starting");
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for TestLogGuard {
    fn drop(&mut self) {
        info!(
            "{}: assertions passed (elapsed {:?})",
            self.name,
            self.start.elapsed()
        );
    }
}

pub fn test_log(name: &str) -> TestLogGuard {
    TestLogGuard::new(name)
}

pub fn test_db() -> SqliteStorage {
    init_test_logging();
    SqliteStorage::open_memory().expect("Failed to create test database")
}

/// Insert [`SeedRow`]s directly, bypassing the command layer.
pub fn seed_rows(db_path: &Path, rows: &[SeedRow]) {
    init_test_logging();
    let storage = SqliteStorage::open(db_path, "signals").expect("open seed db");
    for row in rows {
        storage
            .execute_test_sql(&row.insert_sql(storage.table()))
            .expect("seed row");
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeedRow {
    pub title: &'static str,
    pub status: &'static str,
    pub owner: Option<&'static str>,
    pub severity: Option<&'static str>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
    pub due_date: Option<String>,
}

impl SeedRow {
    pub fn open(title: &'static str, created_at: &str) -> Self {
        Self {
            title,
            status: "open",
            created_at: Some(created_at.to_string()),
            updated_at: Some(created_at.to_string()),
            ..Self::default()
        }
    }

    pub fn closed(title: &'static str, created_at: &str, closed_at: &str) -> Self {
        Self {
            title,
            status: "closed",
            created_at: Some(created_at.to_string()),
            updated_at: Some(closed_at.to_string()),
            closed_at: Some(closed_at.to_string()),
            ..Self::default()
        }
    }

    fn insert_sql(&self, table: &str) -> String {
        fn lit(value: Option<&str>) -> String {
            value.map_or_else(|| "NULL".to_string(), |v| format!("'{}'", v.replace('\'', "''")))
        }
        format!(
            "INSERT INTO {table} (title, status, owner, severity, created_at, updated_at, closed_at, due_date)
             VALUES ({}, {}, {}, {}, {}, {}, {}, {})",
            lit(Some(self.title)),
            lit(Some(self.status)),
            lit(self.owner),
            lit(self.severity),
            lit(Some(self.created_at.as_deref().unwrap_or(""))),
            lit(self.updated_at.as_deref()),
            lit(self.closed_at.as_deref()),
            lit(self.due_date.as_deref()),
        )
    }
}
