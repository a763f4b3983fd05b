//! PostgreSQL storage implementation (feature `postgres`).

use crate::error::Result;
use crate::model::{NewSignal, Signal, SignalUpdate};
use crate::storage::filter::{Dialect, SignalFilter};
use crate::storage::schema::{create_table_sql, index_sql, migration_sql};
use crate::storage::{
    RawSignal, SignalStore, insert_assignments, insert_sql, list_sql, select_by_id_sql,
    update_assignments, update_sql,
};
use chrono::{DateTime, Utc};
use postgres::types::ToSql;
use postgres::{Client, GenericClient, NoTls, Row};

/// PostgreSQL-based storage backend.
pub struct PostgresStorage {
    client: Client,
    table: String,
}

impl std::fmt::Debug for PostgresStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl PostgresStorage {
    /// Connect with `dsn` and create or migrate the signal table.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema setup fails.
    pub fn connect(dsn: &str, table: &str) -> Result<Self> {
        let mut client = Client::connect(dsn, NoTls)?;
        apply_schema(&mut client, table)?;
        tracing::debug!(table, "Connected to PostgreSQL store");
        Ok(Self {
            client,
            table: table.to_string(),
        })
    }
}

fn apply_schema(client: &mut Client, table: &str) -> Result<()> {
    client.batch_execute(&create_table_sql(table, Dialect::Postgres))?;

    let existing: Vec<String> = client
        .query(
            "SELECT column_name FROM information_schema.columns
             WHERE table_schema = current_schema() AND table_name = $1",
            &[&table.to_lowercase()],
        )?
        .iter()
        .map(|row| row.try_get::<_, String>(0))
        .collect::<std::result::Result<_, _>>()?;

    for statement in migration_sql(table, &existing) {
        tracing::debug!(sql = %statement, "Applying migration");
        client.batch_execute(&statement)?;
    }
    for statement in index_sql(table) {
        client.batch_execute(&statement)?;
    }
    Ok(())
}

fn signal_from_row(row: &Row) -> Result<Signal> {
    Ok(Signal::from(RawSignal {
        id: row.try_get(0)?,
        title: row.try_get::<_, Option<String>>(1)?.unwrap_or_default(),
        category: row.try_get(2)?,
        severity: row.try_get(3)?,
        owner: row.try_get(4)?,
        due_date: row.try_get(5)?,
        status: row.try_get(6)?,
        notes: row.try_get(7)?,
        source: row.try_get(8)?,
        tags: row.try_get(9)?,
        created_at: row.try_get(10)?,
        closed_at: row.try_get(11)?,
        updated_at: row.try_get(12)?,
    }))
}

fn fetch_signal(client: &mut impl GenericClient, table: &str, id: i64) -> Result<Option<Signal>> {
    client
        .query_opt(&select_by_id_sql(table, Dialect::Postgres), &[&id])?
        .as_ref()
        .map(signal_from_row)
        .transpose()
}

impl SignalStore for PostgresStorage {
    fn location(&self) -> String {
        format!("postgres table '{}'", self.table)
    }

    fn create_signal(&mut self, signal: &NewSignal, now: DateTime<Utc>) -> Result<i64> {
        let values = insert_assignments(signal, now);
        let sql = format!(
            "{} RETURNING id",
            insert_sql(&self.table, &values, Dialect::Postgres)
        );
        let params: Vec<&(dyn ToSql + Sync)> = values
            .iter()
            .map(|(_, v)| v as &(dyn ToSql + Sync))
            .collect();

        let mut tx = self.client.transaction()?;
        let row = tx.query_one(&sql, &params)?;
        let id: i64 = row.try_get(0)?;
        tx.commit()?;
        Ok(id)
    }

    fn get_signal(&mut self, id: i64) -> Result<Option<Signal>> {
        fetch_signal(&mut self.client, &self.table, id)
    }

    fn list_signals(&mut self, filter: &SignalFilter) -> Result<Vec<Signal>> {
        let (sql, params) = list_sql(&self.table, filter, Dialect::Postgres);
        tracing::debug!(sql = %sql, params = ?params, "Listing signals");
        let bound: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        self.client
            .query(&sql, &bound)?
            .iter()
            .map(signal_from_row)
            .collect()
    }

    fn update_signal(
        &mut self,
        id: i64,
        update: &SignalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Signal>> {
        let mut tx = self.client.transaction()?;
        let Some(current) = fetch_signal(&mut tx, &self.table, id)? else {
            return Ok(None);
        };

        let values = update_assignments(&current, update, now);
        let sql = update_sql(&self.table, &values, Dialect::Postgres);
        let mut bound: Vec<&(dyn ToSql + Sync)> = values
            .iter()
            .map(|(_, v)| v as &(dyn ToSql + Sync))
            .collect();
        bound.push(&id);
        tx.execute(&sql, &bound)?;

        let updated = fetch_signal(&mut tx, &self.table, id)?;
        tx.commit()?;
        Ok(updated)
    }
}
