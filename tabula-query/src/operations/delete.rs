//! `DELETE` builder.

use std::fmt;

use tracing::trace;

use crate::criteria::{Criteria, Whereable};
use crate::error::QueryResult;
use crate::operations::Statement;
use crate::sql::quote_identifier;
use crate::table::Table;

/// A `DELETE` of the rows matching its criteria.
///
/// # Example
///
/// ```rust
/// use tabula_query::prelude::*;
///
/// table! {
///     pub struct PetsTable => "pets", primary_key(id) {
///         pub id: NumberField = "id",
///     }
/// }
///
/// let delete = Delete::new(PetsTable::new()).where_fn(|t| t.id.equals(123))?;
/// assert_eq!(delete.to_string(), "DELETE FROM `pets` WHERE `id` = 123;");
/// # Ok::<(), tabula_query::QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Delete<T: Table> {
    criteria: Criteria<T>,
}

impl<T: Table> Delete<T> {
    /// Create a delete for a table.
    pub fn new(table: T) -> Self {
        Self {
            criteria: Criteria::new(table),
        }
    }

    /// Start from existing criteria.
    pub fn from_criteria(criteria: Criteria<T>) -> Self {
        Self { criteria }
    }

    fn render(&self) -> String {
        match self.criteria.to_where_sql() {
            Some(where_sql) => format!(
                "DELETE FROM {} {};",
                quote_identifier(T::TABLE_NAME),
                where_sql
            ),
            None => format!("DELETE FROM {};", quote_identifier(T::TABLE_NAME)),
        }
    }
}

impl<T: Table> Whereable<T> for Delete<T> {
    fn criteria(&self) -> &Criteria<T> {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut Criteria<T> {
        &mut self.criteria
    }
}

impl<T: Table> Statement for Delete<T> {
    fn to_sql(&self) -> QueryResult<String> {
        let sql = self.render();
        trace!(table = T::TABLE_NAME, sql = %sql, "rendered delete");
        Ok(sql)
    }
}

impl<T: Table> fmt::Display for Delete<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
