//! Warehouse connections
//!
//! The pipeline talks to a `SqlExecutor`. Redshift is reached over the
//! Postgres wire protocol; a DuckDB file can stand in for local runs.

mod engine;
mod executor;
mod postgres;

pub use engine::DuckDbExecutor;
pub use executor::SqlExecutor;
pub use postgres::{connect_options, PostgresExecutor};

use crate::config::DwhConfig;
use crate::error::Result;
use crate::types::Row;
use async_trait::async_trait;
use std::path::Path;

/// Connection chosen for a run
pub enum Warehouse {
    /// Provisioned Redshift cluster
    Redshift(PostgresExecutor),
    /// Local DuckDB database
    Local(DuckDbExecutor),
}

impl Warehouse {
    /// Connect to the local database when a path is given, otherwise to the
    /// cluster named by the configuration
    pub async fn connect(config: &DwhConfig, local: Option<&Path>) -> Result<Self> {
        match local {
            Some(path) => Ok(Self::Local(DuckDbExecutor::open(path)?)),
            None => Ok(Self::Redshift(
                PostgresExecutor::connect(&config.cluster).await?,
            )),
        }
    }

    /// Close the connection
    pub async fn close(self) -> Result<()> {
        match self {
            Self::Redshift(conn) => conn.close().await,
            Self::Local(conn) => conn.close(),
        }
    }
}

#[async_trait]
impl SqlExecutor for Warehouse {
    async fn execute_and_commit(&mut self, statement: &str) -> Result<()> {
        match self {
            Self::Redshift(conn) => conn.execute_and_commit(statement).await,
            Self::Local(conn) => conn.execute_and_commit(statement).await,
        }
    }

    async fn fetch_rows(&mut self, query: &str) -> Result<Vec<Row>> {
        match self {
            Self::Redshift(conn) => conn.fetch_rows(query).await,
            Self::Local(conn) => conn.fetch_rows(query).await,
        }
    }

    fn target(&self) -> String {
        match self {
            Self::Redshift(conn) => conn.target(),
            Self::Local(conn) => conn.target(),
        }
    }
}

#[cfg(test)]
mod tests;
