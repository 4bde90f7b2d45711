//! MySQL executor implementation.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use tabula_query::{ExecResult, Executor, QueryError, QueryResult};

use crate::error::MysqlError;
use crate::pool::MysqlPool;

/// Runs rendered statements on pooled MySQL connections.
///
/// Each call checks a connection out of the pool and returns it when done.
///
/// ```rust,ignore
/// use tabula_mysql::{MysqlExecutor, MysqlPool};
/// use tabula_query::Store;
///
/// let executor = MysqlExecutor::new(MysqlPool::from_env()?);
/// let pets: Store<_, PetsTable, Pet> = Store::with_default_table(executor);
/// let cats = pets.find(|q| q.where_fn(|t| t.species.equals("cat"))).await?;
/// ```
#[derive(Clone)]
pub struct MysqlExecutor {
    pool: MysqlPool,
}

impl MysqlExecutor {
    /// Create a new executor over the given pool.
    pub fn new(pool: MysqlPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &MysqlPool {
        &self.pool
    }
}

fn to_query_error(sql: &str) -> impl FnOnce(MysqlError) -> QueryError + '_ {
    move |err| QueryError::from(err).with_sql(sql)
}

#[async_trait]
impl Executor for MysqlExecutor {
    #[instrument(skip(self), fields(db.system = "mysql"))]
    async fn fetch_all(&self, sql: &str) -> QueryResult<Vec<JsonValue>> {
        let mut conn = self.pool.get().await.map_err(to_query_error(sql))?;
        let rows = conn.fetch_json(sql).await.map_err(to_query_error(sql))?;
        debug!(rows = rows.len(), "Query returned rows");
        Ok(rows)
    }

    #[instrument(skip(self), fields(db.system = "mysql"))]
    async fn execute(&self, sql: &str) -> QueryResult<ExecResult> {
        let mut conn = self.pool.get().await.map_err(to_query_error(sql))?;
        let result = conn.execute(sql).await.map_err(to_query_error(sql))?;
        debug!(affected_rows = result.affected_rows, "Statement executed");
        Ok(result)
    }

    #[instrument(skip(self, statements), fields(db.system = "mysql", count = statements.len()))]
    async fn execute_batch(&self, statements: &[String]) -> QueryResult<Vec<ExecResult>> {
        let mut conn = self.pool.get().await.map_err(QueryError::from)?;
        conn.execute_batch(statements)
            .await
            .map_err(|e| QueryError::from(e).with_context("transaction"))
    }
}
