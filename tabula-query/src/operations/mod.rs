//! Statement builders.
//!
//! - [`Query`] - `SELECT`
//! - [`Insert`] - `INSERT`
//! - [`Update`] - `UPDATE`
//! - [`Delete`] - `DELETE`
//!
//! Every builder renders a complete, `;`-terminated MySQL statement through
//! [`Statement::to_sql`]. Rendering borrows the builder, so it can be repeated.

mod delete;
mod insert;
mod query;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use query::Query;
pub use update::Update;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{QueryError, QueryResult};
use crate::field::{Field, FieldKind};
use crate::sql::escape_literal;
use crate::table::Table;
use crate::value::{IntoDateTime, Record, SqlValue};

/// Something that renders to a single SQL statement.
pub trait Statement: Send + Sync {
    /// Render the statement.
    fn to_sql(&self) -> QueryResult<String>;
}

impl Statement for String {
    fn to_sql(&self) -> QueryResult<String> {
        Ok(self.clone())
    }
}

impl Statement for &str {
    fn to_sql(&self) -> QueryResult<String> {
        Ok((*self).to_string())
    }
}

/// Parse the textual date-time forms serde produces for chrono types.
fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(IntoDateTime::into_date_time)
        })
}

/// Render a data value for a column.
///
/// Date columns receiving a date string are normalized to the date-time
/// literal format. Unparseable strings are kept as they are.
pub(crate) fn prepare_value(field: &Field, value: &SqlValue) -> String {
    match (field.kind(), value) {
        (FieldKind::Date, SqlValue::String(text)) => match parse_date_time(text) {
            Some(dt) => escape_literal(&SqlValue::DateTime(dt)),
            None => escape_literal(value),
        },
        _ => escape_literal(value),
    }
}

/// Options shared by the data-carrying statements.
#[derive(Debug, Clone, Default)]
pub(crate) struct DataOptions {
    pub(crate) exclude: Vec<String>,
    pub(crate) ignore_extra_properties: bool,
}

/// Resolve data properties to `(quoted column, literal)` pairs, in data order.
pub(crate) fn assignments<T: Table>(
    table: &T,
    data: &Record,
    options: &DataOptions,
) -> QueryResult<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(data.len());
    for (property, value) in data.iter() {
        if options.exclude.iter().any(|excluded| excluded == property) {
            continue;
        }
        match table.field(property) {
            Some(field) => pairs.push((field.column(), prepare_value(field, value))),
            None if options.ignore_extra_properties => {}
            None => return Err(QueryError::unmapped_property(T::TABLE_NAME, property)),
        }
    }
    Ok(pairs)
}
