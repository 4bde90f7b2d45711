//! Boundary between statement building and a database driver.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::QueryResult;

/// Outcome of a statement that returns no rows.
///
/// Mirrors the OK packet a MySQL server sends back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    /// Rows inserted, updated or deleted.
    pub affected_rows: u64,
    /// Auto-increment id generated by an insert.
    pub last_insert_id: Option<u64>,
    /// Number of warnings raised.
    pub warnings: u16,
    /// Server info message, such as `Rows matched: 1  Changed: 1  Warnings: 0`.
    pub info: String,
}

/// Runs rendered SQL.
///
/// Rows are handed back as JSON objects keyed by column name, ready to be
/// deserialized into DTOs.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run a statement that returns rows.
    async fn fetch_all(&self, sql: &str) -> QueryResult<Vec<JsonValue>>;

    /// Run a statement that returns no rows.
    async fn execute(&self, sql: &str) -> QueryResult<ExecResult>;

    /// Run statements in one transaction.
    ///
    /// Commits when all succeed. Rolls back and returns the first error otherwise.
    async fn execute_batch(&self, statements: &[String]) -> QueryResult<Vec<ExecResult>>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    async fn fetch_all(&self, sql: &str) -> QueryResult<Vec<JsonValue>> {
        (**self).fetch_all(sql).await
    }

    async fn execute(&self, sql: &str) -> QueryResult<ExecResult> {
        (**self).execute(sql).await
    }

    async fn execute_batch(&self, statements: &[String]) -> QueryResult<Vec<ExecResult>> {
        (**self).execute_batch(statements).await
    }
}
