//! # tabula-query
//!
//! Typed query builder for MySQL.
//!
//! This crate provides:
//! - Table mappings with typed fields (`table!`)
//! - Conditions and condition groups composed with AND/OR
//! - Criteria normalizing many input shapes into one condition tree
//! - `SELECT` / `INSERT` / `UPDATE` / `DELETE` builders rendering MySQL text
//! - A typed [`Store`](store::Store) running statements through an [`Executor`](executor::Executor)
//!
//! ## Tables
//!
//! ```rust
//! use tabula_query::prelude::*;
//!
//! table! {
//!     /// The `pets` table.
//!     pub struct PetsTable => "pets", primary_key(id) {
//!         pub id: NumberField = "id",
//!         pub species: StringField = "species",
//!         pub birthday: DateField = "birthday",
//!     }
//! }
//!
//! let pets = PetsTable::new();
//! assert_eq!(PetsTable::TABLE_NAME, "pets");
//! assert_eq!(pets.field("species").unwrap().select_expr(), "species");
//! ```
//!
//! ## Conditions
//!
//! Typed fields build conditions; conditions compose into groups:
//!
//! ```rust
//! # use tabula_query::prelude::*;
//! # table! {
//! #     pub struct PetsTable => "pets", primary_key(id) {
//! #         pub id: NumberField = "id",
//! #         pub species: StringField = "species",
//! #     }
//! # }
//! let pets = PetsTable::new();
//! let group = pets.species.equals("cat").or(pets.species.equals("dog"));
//! assert_eq!(group.to_string(), "(`species` = 'cat' OR `species` = 'dog')");
//! ```
//!
//! ## Statements
//!
//! ```rust
//! # use tabula_query::prelude::*;
//! # table! {
//! #     pub struct PetsTable => "pets", primary_key(id) {
//! #         pub id: NumberField = "id",
//! #         pub species: StringField = "species",
//! #     }
//! # }
//! let update = Update::new(PetsTable::new(), record! { "species" => "cat" })
//!     .where_fn(|t| t.id.equals(123))?;
//!
//! assert_eq!(
//!     update.to_sql()?,
//!     "UPDATE `pets` SET `species` = 'cat' WHERE `id` = 123;"
//! );
//! # Ok::<(), tabula_query::QueryError>(())
//! ```
//!
//! ## Logging
//!
//! Rendered statements are traced with `tracing`. See [`logging`] for the
//! `TABULA_DEBUG` environment switches.

pub mod condition;
pub mod criteria;
pub mod error;
pub mod executor;
pub mod field;
pub mod logging;
#[macro_use]
pub mod macros;
pub mod operations;
pub mod sql;
pub mod store;
pub mod table;
pub mod types;
pub mod value;

#[cfg(test)]
mod test_fixtures;

#[doc(hidden)]
pub use tracing as __tracing;

pub use condition::{Condition, ConditionGroup, ConditionMap, Logic, Op, Predicate};
pub use criteria::{Criteria, Criterion, Selection, Whereable};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult};
pub use executor::{ExecResult, Executor};
pub use field::{BooleanField, DateField, Field, FieldKind, FieldSet, NumberField, StringField, TypedField};
pub use operations::{Delete, Insert, Query, Statement, Update};
pub use store::Store;
pub use table::{Table, validate_table};
pub use types::{OrderByField, SortOrder};
pub use value::{IntoDateTime, Operand, Record, SqlValue};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::condition::{Condition, ConditionGroup, ConditionMap, Logic, Op, Predicate};
    pub use crate::criteria::{Criteria, Criterion, Whereable};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::executor::{ExecResult, Executor};
    pub use crate::field::{BooleanField, DateField, Field, NumberField, StringField, TypedField};
    pub use crate::operations::{Delete, Insert, Query, Statement, Update};
    pub use crate::store::Store;
    pub use crate::table::Table;
    pub use crate::types::SortOrder;
    pub use crate::value::{Operand, Record, SqlValue};
    pub use crate::{record, table, where_all, where_any};
}
