//! Redshift connection over the Postgres wire protocol

use super::executor::SqlExecutor;
use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::types::Row;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{Connection, Executor, Row as _};

/// Build connection options from the `CLUSTER` section
///
/// Fails when the cluster has not been provisioned yet (no `DWH_ENDPOINT`).
pub fn connect_options(cluster: &ClusterConfig) -> Result<PgConnectOptions> {
    Ok(PgConnectOptions::new()
        .host(cluster.endpoint()?)
        .port(cluster.db_port)
        .username(&cluster.db_user)
        .password(&cluster.db_password)
        .database(&cluster.db_name)
        .ssl_mode(PgSslMode::Prefer))
}

/// Single warehouse session
pub struct PostgresExecutor {
    conn: PgConnection,
    target: String,
}

impl PostgresExecutor {
    /// Open a session against the provisioned cluster
    pub async fn connect(cluster: &ClusterConfig) -> Result<Self> {
        let options = connect_options(cluster)?;
        let target = format!(
            "redshift://{}:{}/{}",
            cluster.endpoint()?,
            cluster.db_port,
            cluster.db_name
        );

        let conn = PgConnection::connect_with(&options).await?;
        tracing::info!("Connected to {target}");
        Ok(Self { conn, target })
    }

    /// Close the session
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

#[async_trait]
impl SqlExecutor for PostgresExecutor {
    async fn execute_and_commit(&mut self, statement: &str) -> Result<()> {
        let mut tx = self.conn.begin().await?;
        (&mut *tx)
            .execute(statement)
            .await
            .map_err(|e| Error::statement(statement, e.to_string()))?;
        tx.commit().await?;
        Ok(())
    }

    async fn fetch_rows(&mut self, query: &str) -> Result<Vec<Row>> {
        // Without bind arguments the query goes over the simple-query protocol
        let rows = (&mut self.conn)
            .fetch_all(query)
            .await
            .map_err(|e| Error::statement(query, e.to_string()))?;

        // Simple-query results arrive in text format, so every column reads as a string
        rows.iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| {
                        row.try_get_unchecked::<Option<String>, _>(i)
                            .map_err(|e| Error::statement(query, e.to_string()))
                    })
                    .collect()
            })
            .collect()
    }

    fn target(&self) -> String {
        self.target.clone()
    }
}
