//! Sequential statement execution

use crate::database::SqlExecutor;
use crate::error::{Error, Result};
use crate::types::Row;
use serde::Serialize;
use tracing::debug;

/// Rows returned by one quality check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Query text
    pub statement: String,
    /// Every returned row
    pub rows: Vec<Row>,
}

/// Run statements in order, committing after each one
///
/// Stops at the first failure. Statements already run stay committed.
pub async fn run_all<E, S>(statements: &[S], executor: &mut E) -> Result<usize>
where
    E: SqlExecutor + ?Sized,
    S: AsRef<str> + Sync,
{
    for statement in statements {
        let statement = statement.as_ref();
        debug!("Executing statement: {statement}");
        executor.execute_and_commit(statement).await?;
    }
    Ok(statements.len())
}

/// Run each quality check and collect its rows
///
/// A check that returns no rows fails the run.
pub async fn run_quality_checks<E, S>(checks: &[S], executor: &mut E) -> Result<Vec<CheckReport>>
where
    E: SqlExecutor + ?Sized,
    S: AsRef<str> + Sync,
{
    let mut reports = Vec::with_capacity(checks.len());

    for check in checks {
        let statement = check.as_ref();
        debug!("Running check: {statement}");

        let rows = executor.fetch_rows(statement).await?;
        if rows.is_empty() {
            return Err(Error::empty_result(statement));
        }

        reports.push(CheckReport {
            statement: statement.to_string(),
            rows,
        });
    }

    Ok(reports)
}
