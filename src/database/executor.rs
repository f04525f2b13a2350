//! Statement executor seam

use crate::error::Result;
use crate::types::Row;
use async_trait::async_trait;

/// One open warehouse connection
///
/// Every call on an executor runs against the same session, in call order.
#[async_trait]
pub trait SqlExecutor: Send {
    /// Execute one statement in its own transaction and commit it
    async fn execute_and_commit(&mut self, statement: &str) -> Result<()>;

    /// Run a query and return every row as text
    async fn fetch_rows(&mut self, query: &str) -> Result<Vec<Row>>;

    /// Connection target for log lines (never includes credentials)
    fn target(&self) -> String;
}
