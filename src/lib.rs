//! # Tabula
//!
//! A typed MySQL query builder and lightweight store.
//!
//! Tabula provides:
//! - Table mappings declared once with [`table!`]
//! - Typed field conditions composed with AND/OR
//! - `SELECT` / `INSERT` / `UPDATE` / `DELETE` rendering to MySQL text
//! - An async [`Store`](query::Store) running statements on a `mysql_async` pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use serde::{Deserialize, Serialize};
//! use tabula::mysql::{MysqlExecutor, MysqlPool};
//! use tabula::prelude::*;
//!
//! table! {
//!     pub struct PetsTable => "pets", primary_key(id) {
//!         pub id: NumberField = "id",
//!         pub species: StringField = "species",
//!         pub birthday: DateField = "birthday",
//!     }
//! }
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! pub struct Pet {
//!     pub id: i64,
//!     pub species: String,
//!     pub birthday: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QueryError> {
//!     let executor = MysqlExecutor::new(MysqlPool::from_env()?);
//!     let pets: Store<_, PetsTable, Pet> = Store::with_default_table(executor);
//!
//!     let cats = pets
//!         .find(|q| Ok(q.where_fn(|t| t.species.equals("cat"))?.limit(10)))
//!         .await?;
//!
//!     println!("{} cats", cats.len());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Query building, statement rendering and the typed store.
pub mod query {
    pub use tabula_query::*;
}

/// MySQL driver.
#[cfg(feature = "mysql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
pub mod mysql {
    pub use tabula_mysql::*;
}

pub use tabula_query::{record, table, where_all, where_any};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tabula_query::prelude::*;

    #[cfg(feature = "mysql")]
    pub use tabula_mysql::{MysqlConfig, MysqlExecutor, MysqlPool};
}

// Re-export key types at the crate root
pub use tabula_query::{
    Condition, ConditionGroup, Criteria, Delete, ErrorCode, ExecResult, Executor, Insert, Query,
    QueryError, QueryResult, Record, Statement, Store, Table, Update, Whereable,
};
