//! `INSERT` builder.

use serde::Serialize;
use tracing::trace;

use crate::error::QueryResult;
use crate::operations::{DataOptions, Statement, assignments};
use crate::sql::quote_identifier;
use crate::table::Table;
use crate::value::Record;

/// An `INSERT` of one row.
///
/// Columns follow the data's property order.
#[derive(Debug, Clone)]
pub struct Insert<T: Table> {
    table: T,
    data: Record,
    options: DataOptions,
}

impl<T: Table> Insert<T> {
    /// Insert a record.
    pub fn new(table: T, data: Record) -> Self {
        Self {
            table,
            data,
            options: DataOptions::default(),
        }
    }

    /// Insert any serializable value, typically a DTO.
    pub fn from_serialize<D: Serialize + ?Sized>(table: T, data: &D) -> QueryResult<Self> {
        Ok(Self::new(table, Record::from_serialize(data)?))
    }

    /// Skip these properties.
    pub fn exclude<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.exclude.extend(properties.into_iter().map(Into::into));
        self
    }

    /// Skip properties without a mapped field instead of failing.
    pub fn ignore_extra_properties(mut self, ignore: bool) -> Self {
        self.options.ignore_extra_properties = ignore;
        self
    }
}

impl<T: Table> Statement for Insert<T> {
    fn to_sql(&self) -> QueryResult<String> {
        let (columns, values): (Vec<_>, Vec<_>) =
            assignments(&self.table, &self.data, &self.options)?.into_iter().unzip();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            quote_identifier(T::TABLE_NAME),
            columns.join(", "),
            values.join(", ")
        );
        trace!(table = T::TABLE_NAME, sql = %sql, "rendered insert");
        Ok(sql)
    }
}
