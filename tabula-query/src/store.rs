//! Typed store over one table.
//!
//! A [`Store`] builds statements for its table, runs them through an
//! [`Executor`] and maps rows to DTOs with serde.
//!
//! # Example
//!
//! ```rust,ignore
//! let store: Store<MysqlExecutor, PetsTable, Pet> = Store::with_default_table(executor);
//!
//! let cats = store
//!     .find(|q| q.where_fn(|t| t.species.equals("cat")))
//!     .await?;
//!
//! // `value` is read from the first row
//! let total: f64 = store
//!     .compute(|q| q.select(|t| vec![t.total.as_field()]), 0.0)
//!     .await?;
//! ```

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::criteria::Criteria;
use crate::error::{QueryError, QueryResult};
use crate::executor::{ExecResult, Executor};
use crate::operations::{Delete, Insert, Query, Statement, Update};
use crate::table::Table;

/// Column read by [`Store::compute`].
pub const COMPUTED_COLUMN: &str = "value";

/// Statement builders and execution for one table and its DTO.
pub struct Store<E, T, D> {
    executor: E,
    table: T,
    _dto: PhantomData<fn() -> D>,
}

impl<E, T, D> Store<E, T, D>
where
    E: Executor,
    T: Table + Clone,
    D: Serialize + DeserializeOwned + Send + Sync,
{
    /// Create a store.
    pub fn new(executor: E, table: T) -> Self {
        Self {
            executor,
            table,
            _dto: PhantomData,
        }
    }

    /// Create a store for a table with a default mapping.
    pub fn with_default_table(executor: E) -> Self
    where
        T: Default,
    {
        Self::new(executor, T::default())
    }

    /// The executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The mapped table.
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Fresh criteria for the table.
    pub fn criteria(&self) -> Criteria<T> {
        Criteria::new(self.table.clone())
    }

    /// Fresh query for the table.
    pub fn query(&self) -> Query<T> {
        Query::new(self.table.clone())
    }

    async fn fetch<F>(&self, build: F) -> QueryResult<Vec<JsonValue>>
    where
        F: FnOnce(Query<T>) -> QueryResult<Query<T>>,
    {
        let sql = build(self.query())?.to_sql()?;
        debug!(table = T::TABLE_NAME, sql = %sql, "fetching rows");
        self.executor
            .fetch_all(&sql)
            .await
            .map_err(|e| e.with_table(T::TABLE_NAME).with_sql(&sql))
    }

    /// Run a query and map every row to a DTO.
    pub async fn find<F>(&self, build: F) -> QueryResult<Vec<D>>
    where
        F: FnOnce(Query<T>) -> QueryResult<Query<T>>,
    {
        self.find_with(build, map_rows).await
    }

    /// Run a query and map rows with a custom mapper.
    pub async fn find_with<F, M, R>(&self, build: F, mapper: M) -> QueryResult<Vec<R>>
    where
        F: FnOnce(Query<T>) -> QueryResult<Query<T>>,
        M: FnOnce(Vec<JsonValue>) -> QueryResult<Vec<R>>,
    {
        let rows = self.fetch(build).await?;
        mapper(rows)
    }

    /// Run a query and map the first row, if any.
    pub async fn find_one<F>(&self, build: F) -> QueryResult<Option<D>>
    where
        F: FnOnce(Query<T>) -> QueryResult<Query<T>>,
    {
        let rows = self.fetch(build).await?;
        rows.into_iter().next().map(map_row).transpose()
    }

    /// Read the `value` column of the first row, or `default` without rows.
    pub async fn compute<F, V>(&self, build: F, default: V) -> QueryResult<V>
    where
        F: FnOnce(Query<T>) -> QueryResult<Query<T>>,
        V: DeserializeOwned,
    {
        let rows = self.fetch(build).await?;
        match rows.into_iter().next() {
            Some(mut row) => match row.get_mut(COMPUTED_COLUMN) {
                Some(value) => serde_json::from_value(value.take())
                    .map_err(|e| QueryError::deserialization(e.to_string()).with_source(e)),
                None => Err(QueryError::deserialization(format!(
                    "first row has no '{}' column",
                    COMPUTED_COLUMN
                ))),
            },
            None => Ok(default),
        }
    }

    /// Insert a DTO, skipping excluded properties.
    pub async fn create(&self, dto: &D, exclude: &[&str]) -> QueryResult<ExecResult> {
        let insert = Insert::from_serialize(self.table.clone(), dto)?.exclude(exclude.iter().copied());
        self.run(&insert).await
    }

    /// Update the rows selected by the builder with the given data.
    pub async fn update<S, F>(&self, data: &S, build: F, exclude: &[&str]) -> QueryResult<ExecResult>
    where
        S: Serialize + ?Sized + Sync,
        F: FnOnce(Update<T>) -> QueryResult<Update<T>>,
    {
        let update = Update::from_serialize(self.table.clone(), data)?.exclude(exclude.iter().copied());
        let update = build(update)?;
        self.run(&update).await
    }

    /// Update the row identified by the DTO's primary key values.
    pub async fn update_by_primary_key(&self, dto: &D, exclude: &[&str]) -> QueryResult<ExecResult> {
        let update = Update::from_serialize(self.table.clone(), dto)?
            .exclude(exclude.iter().copied())
            .where_primary_key()?;
        self.run(&update).await
    }

    /// Delete the rows selected by the builder.
    pub async fn delete<F>(&self, build: F) -> QueryResult<ExecResult>
    where
        F: FnOnce(Delete<T>) -> QueryResult<Delete<T>>,
    {
        let delete = build(Delete::new(self.table.clone()))?;
        self.run(&delete).await
    }

    /// Run an arbitrary command.
    pub async fn execute(&self, sql: &str) -> QueryResult<ExecResult> {
        debug!(sql = %sql, "executing command");
        self.executor.execute(sql).await
    }

    /// Run statements atomically.
    pub async fn transaction(&self, statements: &[&dyn Statement]) -> QueryResult<Vec<ExecResult>> {
        let rendered = statements
            .iter()
            .map(|statement| statement.to_sql())
            .collect::<QueryResult<Vec<_>>>()?;
        crate::tabula_debug!(count = rendered.len(), statements = ?rendered, "running transaction");
        self.executor.execute_batch(&rendered).await
    }

    async fn run(&self, statement: &dyn Statement) -> QueryResult<ExecResult> {
        let sql = statement.to_sql()?;
        debug!(table = T::TABLE_NAME, sql = %sql, "executing statement");
        self.executor
            .execute(&sql)
            .await
            .map_err(|e| e.with_table(T::TABLE_NAME).with_sql(&sql))
    }
}

fn map_row<D: DeserializeOwned>(row: JsonValue) -> QueryResult<D> {
    serde_json::from_value(row).map_err(|e| QueryError::deserialization(e.to_string()).with_source(e))
}

fn map_rows<D: DeserializeOwned>(rows: Vec<JsonValue>) -> QueryResult<Vec<D>> {
    rows.into_iter().map(map_row).collect()
}
