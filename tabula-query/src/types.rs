//! Ordering types shared by the statement builders.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sql::quote_identifier;

/// Sort order for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortOrder {
    /// Get the SQL keyword for this sort order.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `ORDER BY` entry: a column expression and its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByField {
    /// The column expression to order by.
    pub column: String,
    /// The sort order.
    pub order: SortOrder,
}

impl OrderByField {
    /// Create a new order by field.
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    /// Create an ascending order.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    /// Create a descending order.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }

    /// Write the SQL directly to a buffer.
    ///
    /// ```rust
    /// use tabula_query::types::OrderByField;
    ///
    /// let mut buffer = String::from("ORDER BY ");
    /// OrderByField::desc("created_at").write_sql(&mut buffer);
    /// assert_eq!(buffer, "ORDER BY `created_at` DESC");
    /// ```
    pub fn write_sql(&self, buffer: &mut String) {
        buffer.push_str(&quote_identifier(&self.column));
        buffer.push(' ');
        buffer.push_str(self.order.as_sql());
    }

    /// Generate the SQL for this entry.
    pub fn to_sql(&self) -> String {
        let mut sql = String::with_capacity(self.column.len() + 7);
        self.write_sql(&mut sql);
        sql
    }
}
