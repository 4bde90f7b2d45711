//! MySQL connection wrapper.

use mysql_async::prelude::*;
use mysql_async::{Conn, Row, TxOpts};
use serde_json::Value as JsonValue;
use tabula_query::ExecResult;
use tracing::{debug, info, warn};

use crate::error::{MysqlError, MysqlResult};
use crate::row::row_to_json;

/// A pooled connection running rendered SQL over the text protocol.
pub struct MysqlConnection {
    conn: Conn,
}

impl MysqlConnection {
    /// Create a new connection wrapper.
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// Run a query and return every row as a JSON object.
    pub async fn fetch_json(&mut self, sql: &str) -> MysqlResult<Vec<JsonValue>> {
        debug!(sql = %sql, "Executing query");
        let rows: Vec<Row> = self.conn.query(sql).await?;
        rows.into_iter().map(row_to_json).collect()
    }

    /// Run a statement and return the server's OK packet.
    pub async fn execute(&mut self, sql: &str) -> MysqlResult<ExecResult> {
        debug!(sql = %sql, "Executing statement");
        self.conn.query_drop(sql).await?;
        Ok(ok_result(&self.conn))
    }

    /// Run statements in one transaction.
    ///
    /// The first failing statement rolls the transaction back and its error is returned.
    pub async fn execute_batch(&mut self, statements: &[String]) -> MysqlResult<Vec<ExecResult>> {
        let mut tx = self.conn.start_transaction(TxOpts::default()).await?;
        let mut results = Vec::with_capacity(statements.len());

        for (i, sql) in statements.iter().enumerate() {
            debug!(sql = %sql, index = i, "Executing statement in transaction");
            if let Err(e) = tx.query_drop(sql.as_str()).await {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                warn!(index = i, error = %e, "Transaction rolled back");
                return Err(MysqlError::transaction(format!(
                    "statement {} of {} failed and the transaction was rolled back: {}",
                    i + 1,
                    statements.len(),
                    e
                )));
            }
            results.push(ExecResult {
                affected_rows: tx.affected_rows(),
                last_insert_id: tx.last_insert_id().filter(|id| *id != 0),
                warnings: tx.get_warnings(),
                info: tx.info().into_owned(),
            });
        }

        tx.commit().await?;
        info!(statements = statements.len(), "Transaction committed");
        Ok(results)
    }

    /// Get the inner connection.
    pub fn inner(&self) -> &Conn {
        &self.conn
    }

    /// Get the inner connection mutably.
    pub fn inner_mut(&mut self) -> &mut Conn {
        &mut self.conn
    }

    /// Consume and return the inner connection.
    pub fn into_inner(self) -> Conn {
        self.conn
    }
}

fn ok_result(conn: &Conn) -> ExecResult {
    ExecResult {
        affected_rows: conn.affected_rows(),
        last_insert_id: conn.last_insert_id().filter(|id| *id != 0),
        warnings: conn.get_warnings(),
        info: conn.info().into_owned(),
    }
}
