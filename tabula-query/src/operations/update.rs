//! `UPDATE` builder.

use serde::Serialize;
use tracing::trace;

use crate::condition::{Condition, Op};
use crate::criteria::{Criteria, Whereable};
use crate::error::{QueryError, QueryResult};
use crate::operations::{DataOptions, Statement, assignments};
use crate::sql::quote_identifier;
use crate::table::Table;
use crate::value::{Operand, Record};

/// An `UPDATE` of the rows matching its criteria.
///
/// The table must declare a primary key.
#[derive(Debug, Clone)]
pub struct Update<T: Table> {
    criteria: Criteria<T>,
    data: Record,
    options: DataOptions,
}

impl<T: Table> Update<T> {
    /// Update with a record.
    pub fn new(table: T, data: Record) -> Self {
        Self {
            criteria: Criteria::new(table),
            data,
            options: DataOptions::default(),
        }
    }

    /// Update with any serializable value, typically a DTO.
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

    /// Match the row by the primary key values carried in the data.
    ///
    /// Key properties are also excluded from the `SET` list.
    pub fn where_primary_key(mut self) -> QueryResult<Self> {
        let mut conditions = Vec::new();
        for (property, field) in self.criteria.table().primary_key_fields()? {
            let value = self.data.get(property).cloned().ok_or_else(|| {
                QueryError::invalid_data(format!(
                    "no value for primary key '{}' of {}",
                    property,
                    T::TABLE_NAME
                ))
                .with_field(property)
            })?;
            conditions.push(Condition::expression(field.select_expr(), Op::Eq, Operand::Scalar(value))?);
            self.options.exclude.push(property.to_string());
        }

        for condition in conditions {
            self = self.where_(condition)?;
        }
        Ok(self)
    }
}

impl<T: Table> Whereable<T> for Update<T> {
    fn criteria(&self) -> &Criteria<T> {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut Criteria<T> {
        &mut self.criteria
    }
}

impl<T: Table> Statement for Update<T> {
    fn to_sql(&self) -> QueryResult<String> {
        if T::PRIMARY_KEY.is_empty() {
            return Err(QueryError::missing_primary_key(T::TABLE_NAME));
        }

        let set: Vec<_> = assignments(self.criteria.table(), &self.data, &self.options)?
            .into_iter()
            .map(|(column, value)| format!("{} = {}", column, value))
            .collect();
        if set.is_empty() {
            return Err(QueryError::empty_update(T::TABLE_NAME));
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            quote_identifier(T::TABLE_NAME),
            set.join(", ")
        );
        if let Some(where_sql) = self.criteria.to_where_sql() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }
        sql.push(';');

        trace!(table = T::TABLE_NAME, sql = %sql, "rendered update");
        Ok(sql)
    }
}
