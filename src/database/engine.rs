//! DuckDB-backed local warehouse
//!
//! Runs catalog statements against a DuckDB file or an in-memory database.
//! Redshift-only syntax (`COPY ... credentials`, `diststyle`) is not
//! understood here, so local runs use catalogs written in portable SQL.

use super::executor::SqlExecutor;
use crate::error::{Error, Result};
use crate::types::Row;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;

/// Local DuckDB session
pub struct DuckDbExecutor {
    conn: Connection,
    target: String,
}

impl DuckDbExecutor {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| Error::config(format!("Failed to open DuckDB database: {e}")))?;
        Ok(Self {
            conn,
            target: format!("duckdb:{}", path.display()),
        })
    }

    /// Open a transient in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;
        Ok(Self {
            conn,
            target: "duckdb::memory:".to_string(),
        })
    }

    /// Close the database, flushing a file-backed one
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::DuckDb(e))
    }
}

#[async_trait]
impl SqlExecutor for DuckDbExecutor {
    async fn execute_and_commit(&mut self, statement: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(statement)
            .map_err(|e| Error::statement(statement, e.to_string()))?;
        tx.commit()?;
        Ok(())
    }

    async fn fetch_rows(&mut self, query: &str) -> Result<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(query)
            .map_err(|e| Error::statement(query, e.to_string()))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| Error::statement(query, e.to_string()))?;

        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let column_count = row.as_ref().column_count();
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value: duckdb::types::Value = row.get(i)?;
                values.push(duckdb_value_to_string(value));
            }
            result.push(values);
        }
        Ok(result)
    }

    fn target(&self) -> String {
        self.target.clone()
    }
}

/// Convert a DuckDB value to text, `None` for NULL
fn duckdb_value_to_string(value: duckdb::types::Value) -> Option<String> {
    match value {
        duckdb::types::Value::Null => None,
        duckdb::types::Value::Text(s) => Some(s),
        duckdb::types::Value::Boolean(b) => Some(b.to_string()),
        duckdb::types::Value::TinyInt(i) => Some(i.to_string()),
        duckdb::types::Value::SmallInt(i) => Some(i.to_string()),
        duckdb::types::Value::Int(i) => Some(i.to_string()),
        duckdb::types::Value::BigInt(i) => Some(i.to_string()),
        duckdb::types::Value::HugeInt(i) => Some(i.to_string()),
        duckdb::types::Value::Float(f) => Some(f.to_string()),
        duckdb::types::Value::Double(f) => Some(f.to_string()),
        duckdb::types::Value::Decimal(d) => Some(d.to_string()),
        duckdb::types::Value::Timestamp(unit, i) => {
            let (secs, nsecs) = split_timestamp(unit, i);
            chrono::DateTime::from_timestamp(secs, nsecs)
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
        }
        duckdb::types::Value::Date32(d) => chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163)
            .map(|date| date.format("%Y-%m-%d").to_string()),
        _ => Some(format!("{value:?}")),
    }
}

/// Seconds and non-negative nanoseconds since the epoch
fn split_timestamp(unit: duckdb::types::TimeUnit, value: i64) -> (i64, u32) {
    use duckdb::types::TimeUnit;

    let per_second = match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    };
    let nanos_per_tick = 1_000_000_000 / per_second;
    (
        value.div_euclid(per_second),
        (value.rem_euclid(per_second) * nanos_per_tick) as u32,
    )
}
