//! `SELECT` builder.

use std::fmt;

use tracing::trace;

use crate::criteria::{Criteria, Whereable};
use crate::error::{QueryError, QueryResult};
use crate::field::Field;
use crate::operations::Statement;
use crate::sql::quote_identifier;
use crate::table::Table;
use crate::types::{OrderByField, SortOrder};

/// A `SELECT` over one table.
///
/// Clauses render in the order `SELECT .. FROM .. WHERE .. GROUP BY ..
/// ORDER BY .. LIMIT .. OFFSET ..`, skipping the empty ones.
///
/// # Example
///
/// ```rust
/// use tabula_query::prelude::*;
///
/// table! {
///     pub struct PetsTable => "pets", primary_key(id) {
///         pub id: NumberField = "id",
///         pub species: StringField = "species",
///     }
/// }
///
/// let query = Query::new(PetsTable::new())
///     .where_fn(|t| t.species.equals("cat"))?
///     .order_by(|t| &t.id, SortOrder::Desc)
///     .limit(10);
///
/// assert_eq!(
///     query.to_sql()?,
///     "SELECT `id`, `species` FROM `pets` WHERE `species` = 'cat' ORDER BY `id` DESC LIMIT 10;"
/// );
/// # Ok::<(), tabula_query::QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Query<T: Table> {
    criteria: Criteria<T>,
    select: Vec<Field>,
    group_by: Vec<Field>,
    order_by: Vec<OrderByField>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<T: Table> Query<T> {
    /// Select every mapped field of a table.
    pub fn new(table: T) -> Self {
        Self::from_criteria(Criteria::new(table))
    }

    /// Start from existing criteria.
    pub fn from_criteria(criteria: Criteria<T>) -> Self {
        Self {
            criteria,
            select: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// The mapped table.
    pub fn table(&self) -> &T {
        self.criteria.table()
    }

    /// Restrict the projection.
    ///
    /// Duplicates collapse and the projection renders ordered by select
    /// expression. An empty selection is an error.
    pub fn select<F>(mut self, fields: F) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> Vec<&Field>,
    {
        let mut selected: Vec<Field> = fields(self.criteria.table())
            .into_iter()
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(QueryError::invalid_select(T::TABLE_NAME));
        }

        selected.sort_by(|a, b| a.select_expr().cmp(b.select_expr()));
        selected.dedup();
        self.select = selected;
        Ok(self)
    }

    /// Go back to selecting every mapped field.
    pub fn clear_select(mut self) -> Self {
        self.select.clear();
        self
    }

    /// Append one ordering entry.
    pub fn order_by<F, Fld>(mut self, field: F, order: SortOrder) -> Self
    where
        F: FnOnce(&T) -> &Fld,
        Fld: AsRef<Field> + ?Sized,
    {
        let entry = OrderByField::new(field(self.criteria.table()).as_ref().select_expr(), order);
        self.order_by.push(entry);
        self
    }

    /// Append several ordering entries, in the given order.
    pub fn order_by_all<F, I>(mut self, entries: F) -> Self
    where
        F: FnOnce(&T) -> I,
        I: IntoIterator<Item = OrderByField>,
    {
        let entries: Vec<_> = entries(self.criteria.table()).into_iter().collect();
        self.order_by.extend(entries);
        self
    }

    /// Drop every ordering entry.
    pub fn clear_order_by(mut self) -> Self {
        self.order_by.clear();
        self
    }

    /// Replace the grouping list.
    pub fn group_by<F>(mut self, fields: F) -> Self
    where
        F: FnOnce(&T) -> Vec<&Field>,
    {
        let grouped = fields(self.criteria.table()).into_iter().cloned().collect();
        self.group_by = grouped;
        self
    }

    /// Drop the grouping list.
    pub fn clear_group_by(mut self) -> Self {
        self.group_by.clear();
        self
    }

    /// Set `LIMIT`.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Remove `LIMIT`.
    pub fn clear_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Set `OFFSET`.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Remove `OFFSET`.
    pub fn clear_offset(mut self) -> Self {
        self.offset = None;
        self
    }

    fn projection(&self) -> String {
        let fields: Vec<&Field> = if self.select.is_empty() {
            self.criteria.table().fields().sorted()
        } else {
            self.select.iter().collect()
        };

        fields
            .iter()
            .map(|field| field.select_sql())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render(&self) -> String {
        let mut clauses = vec![
            format!("SELECT {}", self.projection()),
            format!("FROM {}", quote_identifier(T::TABLE_NAME)),
        ];

        if let Some(where_sql) = self.criteria.to_where_sql() {
            clauses.push(where_sql);
        }

        if !self.group_by.is_empty() {
            let columns: Vec<_> = self.group_by.iter().map(Field::column).collect();
            clauses.push(format!("GROUP BY {}", columns.join(", ")));
        }

        if !self.order_by.is_empty() {
            let entries: Vec<_> = self.order_by.iter().map(OrderByField::to_sql).collect();
            clauses.push(format!("ORDER BY {}", entries.join(", ")));
        }

        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        let mut sql = clauses.join(" ");
        sql.push(';');
        sql
    }
}

impl<T: Table> Whereable<T> for Query<T> {
    fn criteria(&self) -> &Criteria<T> {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut Criteria<T> {
        &mut self.criteria
    }
}

impl<T: Table> Statement for Query<T> {
    fn to_sql(&self) -> QueryResult<String> {
        let sql = self.render();
        trace!(table = T::TABLE_NAME, sql = %sql, "rendered select");
        Ok(sql)
    }
}

impl<T: Table> fmt::Display for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::TypedField;
    use crate::test_fixtures::{PetsTable, SalesTable};
    use pretty_assertions::assert_eq;

    fn pets() -> Query<PetsTable> {
        Query::new(PetsTable::new())
    }

    #[test]
    fn test_select_all_sorted() {
        assert_eq!(
            pets().to_string(),
            "SELECT `birthday`, `breed`, `gender`, `id`, `species` FROM `pets`;"
        );
    }

    #[test]
    fn test_select_aliases() {
        assert_eq!(
            Query::new(SalesTable::new()).to_string(),
            "SELECT `clientId` AS `owner_id`, `createdAt` AS `created_at`, `petId` AS `pet_id`, `total` FROM `sales`;"
        );
    }

    #[test]
    fn test_select_dedup_and_sort() {
        let query = pets()
            .select(|t| vec![t.species.as_field(), t.id.as_field(), t.species.as_field()])
            .unwrap();
        assert_eq!(query.to_string(), "SELECT `id`, `species` FROM `pets`;");

        let query = query.clear_select();
        assert!(query.to_string().starts_with("SELECT `birthday`"));
    }

    #[test]
    fn test_select_empty_is_error() {
        let err = pets().select(|_| Vec::new()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidSelect);
    }

    #[test]
    fn test_clause_order() {
        let query = pets()
            .select(|t| vec![t.species.as_field()])
            .unwrap()
            .where_fn(|t| t.id.gt(3))
            .unwrap()
            .group_by(|t| vec![t.species.as_field()])
            .order_by(|t| &t.species, SortOrder::Asc)
            .limit(5)
            .offset(10);

        assert_eq!(
            query.to_sql().unwrap(),
            "SELECT `species` FROM `pets` WHERE `id` > 3 GROUP BY `species` ORDER BY `species` ASC LIMIT 5 OFFSET 10;"
        );
    }

    #[test]
    fn test_order_by_appends_group_by_replaces() {
        let query = pets()
            .order_by(|t| &t.species, SortOrder::Asc)
            .order_by_all(|t| [t.birthday.desc(), t.id.asc()])
            .group_by(|t| vec![t.breed.as_field()])
            .group_by(|t| vec![t.gender.as_field(), t.species.as_field()])
            .select(|t| vec![t.gender.as_field()])
            .unwrap();

        assert_eq!(
            query.to_string(),
            "SELECT `gender` FROM `pets` GROUP BY `gender`, `species` ORDER BY `species` ASC, `birthday` DESC, `id` ASC;"
        );
    }

    #[test]
    fn test_clear_clauses() {
        let query = pets()
            .order_by(|t| &t.id, SortOrder::Desc)
            .group_by(|t| vec![t.id.as_field()])
            .limit(1)
            .offset(2)
            .clear_order_by()
            .clear_group_by()
            .clear_limit()
            .clear_offset();

        assert_eq!(query.to_string(), pets().to_string());
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let query = pets().where_name("gender", "male").unwrap();
        assert_eq!(query.to_sql().unwrap(), query.to_sql().unwrap());
    }
}
